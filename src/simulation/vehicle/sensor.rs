//! Ray-casting range sensor.
//!
//! A fan of rays is cast from the vehicle's position every update. Each ray
//! reports the nearest road border or traffic edge it crosses, if any.

use geo::{Coord, Line};
use ndarray::Array1;
use serde::Serialize;

use super::super::error::SimulationError;
use super::super::geometric_utils::{
    Intersection, Point, Polygon, Segment, edges, lerp, segment_intersection,
};

/// Range sensor mounted on a vehicle.
///
/// The sensor does not hold on to its vehicle; the vehicle passes its pose in
/// on every [`update`](Self::update).
#[derive(Debug, Clone, Serialize)]
pub struct Sensor {
    ray_count: usize,
    ray_length: f32,
    ray_spread: f32,
    rays: Vec<Segment>,
    readings: Vec<Option<Intersection>>,
}

impl Sensor {
    /// Creates a sensor with `ray_count` rays fanned over `ray_spread` radians.
    pub fn new(ray_count: usize, ray_length: f32, ray_spread: f32) -> Result<Self, SimulationError> {
        if ray_count == 0 {
            return Err(SimulationError::Configuration("sensor needs at least one ray"));
        }
        if ray_length <= 0.0 || !ray_length.is_finite() {
            return Err(SimulationError::Configuration("sensor ray length must be positive"));
        }

        Ok(Self {
            ray_count,
            ray_length,
            ray_spread,
            rays: Vec::with_capacity(ray_count),
            readings: vec![None; ray_count],
        })
    }

    /// Number of rays.
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Length of every ray.
    pub fn ray_length(&self) -> f32 {
        self.ray_length
    }

    /// Angle covered by the fan.
    pub fn ray_spread(&self) -> f32 {
        self.ray_spread
    }

    /// Rays cast by the last update.
    pub fn rays(&self) -> &[Segment] {
        &self.rays
    }

    /// Nearest hit per ray from the last update.
    pub fn readings(&self) -> &[Option<Intersection>] {
        &self.readings
    }

    /// Recasts the rays from `origin` facing `angle` and refreshes the readings.
    pub fn update(&mut self, origin: Point, angle: f32, borders: &[Segment], obstacles: &[Polygon]) {
        self.cast_rays(origin, angle);
        self.readings = self
            .rays
            .iter()
            .map(|ray| Self::reading(ray, borders, obstacles))
            .collect();
    }

    /// Network inputs: `1 - offset` per ray, so closer obstacles give larger
    /// values, and `0` where a ray saw nothing.
    pub fn features(&self) -> Array1<f32> {
        self.readings
            .iter()
            .map(|reading| reading.map_or(0.0, |hit| 1.0 - hit.offset))
            .collect()
    }

    fn cast_rays(&mut self, origin: Point, angle: f32) {
        self.rays.clear();
        for i in 0..self.ray_count {
            let t = if self.ray_count == 1 {
                0.5
            } else {
                i as f32 / (self.ray_count - 1) as f32
            };
            let ray_angle = lerp(self.ray_spread / 2.0, -self.ray_spread / 2.0, t) + angle;

            let end = Coord {
                x: origin.x - ray_angle.sin() * self.ray_length,
                y: origin.y - ray_angle.cos() * self.ray_length,
            };
            self.rays.push(Line::new(origin, end));
        }
    }

    /// Closest crossing along `ray`. Ties keep the first one found, borders
    /// before obstacles, obstacles in slice order.
    fn reading(ray: &Segment, borders: &[Segment], obstacles: &[Polygon]) -> Option<Intersection> {
        let border_hits = borders
            .iter()
            .filter_map(|border| segment_intersection(ray.start, ray.end, border.start, border.end));
        let obstacle_hits = obstacles.iter().flat_map(|polygon| {
            edges(polygon).filter_map(|(c, d)| segment_intersection(ray.start, ray.end, c, d))
        });

        border_hits
            .chain(obstacle_hits)
            .fold(None, |closest: Option<Intersection>, hit| match closest {
                Some(best) if best.offset <= hit.offset => Some(best),
                _ => Some(hit),
            })
    }
}
