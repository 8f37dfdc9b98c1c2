//! Simulation parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{SimulationError, StorageError};
use super::vehicle::{DEFAULT_ACCELERATION, DEFAULT_FRICTION};

/// Lane and vertical position of one baseline traffic vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficSlot {
    /// Lane index (clamped onto the road).
    pub lane: i32,
    /// Starting y.
    pub y: f32,
}

/// Simulation parameters that control the road, vehicles and search.
///
/// Missing fields fall back to [`Params::default`] when loading from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Horizontal center of the road.
    pub road_x: f32,
    /// Total road width.
    pub road_width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Vehicle footprint width.
    pub vehicle_width: f32,
    /// Vehicle footprint length.
    pub vehicle_height: f32,
    /// Speed gained per tick of throttle.
    pub acceleration: f32,
    /// Speed lost per tick.
    pub friction: f32,
    /// Speed cap of candidate vehicles.
    pub ai_max_speed: f32,
    /// Speed cap of traffic vehicles.
    pub traffic_max_speed: f32,
    /// Lane the candidates start in.
    pub start_lane: i32,
    /// Starting y of the candidates.
    pub start_y: f32,
    /// Number of candidate vehicles.
    pub population_size: usize,
    /// Mutation amount applied to every clone but the first.
    pub mutation_amount: f32,
    /// Number of sensor rays (network inputs).
    pub ray_count: usize,
    /// Sensor ray length.
    pub ray_length: f32,
    /// Angle covered by the sensor fan, in radians.
    pub ray_spread: f32,
    /// Hidden layer sizes between the sensor inputs and the four controls.
    pub hidden_layers: Vec<usize>,
    /// Traffic present at the start of every generation.
    pub traffic: Vec<TrafficSlot>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            road_x: 100.0,
            road_width: 180.0,
            lane_count: 3,
            vehicle_width: 30.0,
            vehicle_height: 50.0,
            acceleration: DEFAULT_ACCELERATION,
            friction: DEFAULT_FRICTION,
            ai_max_speed: 3.0,
            traffic_max_speed: 2.0,
            start_lane: 1,
            start_y: 100.0,
            population_size: 100,
            mutation_amount: 0.1,
            ray_count: 5,
            ray_length: 150.0,
            ray_spread: std::f32::consts::FRAC_PI_2,
            hidden_layers: vec![6],
            traffic: vec![
                TrafficSlot { lane: 1, y: -100.0 },
                TrafficSlot { lane: 0, y: -300.0 },
                TrafficSlot { lane: 2, y: -300.0 },
                TrafficSlot { lane: 0, y: -500.0 },
                TrafficSlot { lane: 1, y: -500.0 },
                TrafficSlot { lane: 1, y: -700.0 },
                TrafficSlot { lane: 2, y: -700.0 },
            ],
        }
    }
}

impl Params {
    /// Full layer layout of a candidate network: rays, hidden layers, controls.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.ray_count)
            .chain(self.hidden_layers.iter().copied())
            .chain(std::iter::once(super::vehicle::CONTROL_OUTPUTS))
            .collect()
    }

    /// Rejects degenerate values before anything is built from them.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.lane_count == 0 {
            return Err(SimulationError::Configuration("lane_count must be at least 1"));
        }
        if self.road_width <= 0.0 {
            return Err(SimulationError::Configuration("road_width must be positive"));
        }
        if self.ray_count == 0 {
            return Err(SimulationError::Configuration("ray_count must be at least 1"));
        }
        if self.ray_length <= 0.0 {
            return Err(SimulationError::Configuration("ray_length must be positive"));
        }
        if self.population_size == 0 {
            return Err(SimulationError::Configuration("population_size must be at least 1"));
        }
        if self.vehicle_width <= 0.0 || self.vehicle_height <= 0.0 {
            return Err(SimulationError::Configuration("vehicle dimensions must be positive"));
        }
        check_rate(self.acceleration, "acceleration must be finite and non-negative")?;
        check_rate(self.friction, "friction must be finite and non-negative")?;
        check_speed_cap(self.ai_max_speed)?;
        check_speed_cap(self.traffic_max_speed)?;
        if self.hidden_layers.contains(&0) {
            return Err(SimulationError::Configuration("hidden layers must be non-empty"));
        }
        if !(0.0..=1.0).contains(&self.mutation_amount) {
            return Err(SimulationError::Configuration("mutation_amount must lie in [0, 1]"));
        }
        Ok(())
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads parameters from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let json = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        Ok(params)
    }
}

/// Rejects a negative or non-finite speed cap.
pub fn check_speed_cap(max_speed: f32) -> Result<(), SimulationError> {
    check_rate(max_speed, "max speed must be finite and non-negative")
}

fn check_rate(value: f32, message: &'static str) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::Configuration(message))
    }
}
