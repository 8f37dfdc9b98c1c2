//! Multi-lane road with two boundary segments.

use geo::{Coord, Line};
use serde::{Deserialize, Serialize};

use super::error::SimulationError;
use super::geometric_utils::{Segment, lerp};

/// Stand-in for an unbounded road length.
const INFINITY: f32 = 1_000_000.0;

/// A straight vertical road split into equally wide lanes.
///
/// The road owns no vehicles; it only provides lane positions and the two
/// border segments vehicles collide with and sensors read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Road {
    /// Horizontal center of the road.
    pub x: f32,
    /// Total road width.
    pub width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Left edge (`x - width / 2`).
    pub left: f32,
    /// Right edge (`x + width / 2`).
    pub right: f32,
    /// Smallest y covered by the road.
    pub top: f32,
    /// Largest y covered by the road.
    pub bottom: f32,
    borders: [Segment; 2],
}

impl Road {
    /// Creates a road centered on `x`.
    ///
    /// Fails on a zero lane count or a non-positive width.
    pub fn new(x: f32, width: f32, lane_count: usize) -> Result<Self, SimulationError> {
        if lane_count == 0 {
            return Err(SimulationError::Configuration("road needs at least one lane"));
        }
        if width <= 0.0 || !width.is_finite() {
            return Err(SimulationError::Configuration("road width must be positive"));
        }

        let left = x - width / 2.0;
        let right = x + width / 2.0;
        let top = -INFINITY;
        let bottom = INFINITY;

        let borders = [
            Line::new(Coord { x: left, y: top }, Coord { x: left, y: bottom }),
            Line::new(Coord { x: right, y: top }, Coord { x: right, y: bottom }),
        ];

        Ok(Self {
            x,
            width,
            lane_count,
            left,
            right,
            top,
            bottom,
            borders,
        })
    }

    /// Width of a single lane.
    pub fn lane_width(&self) -> f32 {
        self.width / self.lane_count as f32
    }

    /// Horizontal center of lane `lane_index`, clamped into the valid lanes.
    pub fn lane_center(&self, lane_index: i32) -> f32 {
        let last = self.lane_count.saturating_sub(1) as i32;
        let lane = lane_index.clamp(0, last) as f32;
        let lane_width = self.lane_width();
        self.left + lane_width / 2.0 + lane * lane_width
    }

    /// The left and right boundary segments.
    pub fn borders(&self) -> &[Segment] {
        &self.borders
    }

    /// Dashed separators between neighbouring lanes, left to right.
    pub fn lane_dividers(&self) -> Vec<Segment> {
        (1..self.lane_count)
            .map(|i| {
                let x = lerp(self.left, self.right, i as f32 / self.lane_count as f32);
                Line::new(Coord { x, y: self.top }, Coord { x, y: self.bottom })
            })
            .collect()
    }
}
