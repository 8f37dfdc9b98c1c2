//! Vehicle kinematics, footprint and collision state.

use std::f32::consts::PI;

use geo::Coord;
use ndarray::Array1;
use serde::Serialize;

use super::super::brain::NeuralNetwork;
use super::super::error::SimulationError;
use super::super::geometric_utils::{
    Point, Polygon, Segment, polygon_intersects_segment, polygons_intersect,
};
use super::super::params::check_speed_cap;
use super::controls::{Color, ControlSource, ControlState};
use super::sensor::Sensor;

/// Number of network outputs a vehicle consumes: forward, left, right, reverse.
pub const CONTROL_OUTPUTS: usize = 4;

/// Heading change per tick while steering.
const STEER_RATE: f32 = 0.03;

/// Default acceleration per tick.
pub const DEFAULT_ACCELERATION: f32 = 0.2;

/// Default speed lost to friction per tick.
pub const DEFAULT_FRICTION: f32 = 0.05;

/// A car on the road.
///
/// Angle `0` faces decreasing `y`, i.e. up the road. While the vehicle is
/// intact its polygon is rebuilt from the pose after every move. Once damaged
/// the pose and polygon are frozen for good.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    /// Horizontal position of the center.
    pub x: f32,
    /// Vertical position of the center; decreases as the car drives forward.
    pub y: f32,
    /// Heading in radians.
    pub angle: f32,
    /// Signed speed; negative while reversing.
    pub speed: f32,
    /// Speed gained per tick of forward or reverse input.
    pub acceleration: f32,
    /// Forward speed cap. Reverse is capped at half of it.
    pub max_speed: f32,
    /// Speed lost per tick.
    pub friction: f32,
    /// Footprint width.
    pub width: f32,
    /// Footprint length.
    pub height: f32,
    /// Display colour.
    pub color: Color,
    damaged: bool,
    polygon: Polygon,
    controls: ControlState,
    source: ControlSource,
    sensor: Option<Sensor>,
    brain: Option<NeuralNetwork>,
    activations: Vec<Array1<f32>>,
}

impl Vehicle {
    /// Creates a vehicle without sensor or network.
    ///
    /// `FixedForward` vehicles start with `forward` held; all others start idle.
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        source: ControlSource,
        max_speed: f32,
    ) -> Result<Self, SimulationError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(SimulationError::Configuration("vehicle dimensions must be positive"));
        }
        check_speed_cap(max_speed)?;

        let controls = match source {
            ControlSource::FixedForward => ControlState::forward_only(),
            ControlSource::Manual | ControlSource::NeuralControlled => ControlState::default(),
        };

        let mut vehicle = Self {
            x,
            y,
            angle: 0.0,
            speed: 0.0,
            acceleration: DEFAULT_ACCELERATION,
            max_speed,
            friction: DEFAULT_FRICTION,
            width,
            height,
            color: match source {
                ControlSource::NeuralControlled => Color::CANDIDATE,
                ControlSource::Manual | ControlSource::FixedForward => Color::TRAFFIC,
            },
            damaged: false,
            polygon: [Coord { x, y }; 4],
            controls,
            source,
            sensor: None,
            brain: None,
            activations: Vec::new(),
        };
        vehicle.polygon = vehicle.create_polygon();
        Ok(vehicle)
    }

    /// Creates a network-driven vehicle.
    ///
    /// The network must take one input per sensor ray and produce the four
    /// control outputs.
    pub fn neural(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        max_speed: f32,
        sensor: Sensor,
        brain: NeuralNetwork,
    ) -> Result<Self, SimulationError> {
        brain.ensure_shape(sensor.ray_count(), CONTROL_OUTPUTS)?;
        let mut vehicle = Self::new(x, y, width, height, ControlSource::NeuralControlled, max_speed)?;
        vehicle.sensor = Some(sensor);
        vehicle.brain = Some(brain);
        Ok(vehicle)
    }

    /// Mounts a sensor, e.g. on a manual car whose readings are only displayed.
    ///
    /// Fails if an already fitted network cannot consume the sensor's rays.
    pub fn with_sensor(mut self, sensor: Sensor) -> Result<Self, SimulationError> {
        if let Some(brain) = &self.brain {
            brain.ensure_shape(sensor.ray_count(), CONTROL_OUTPUTS)?;
        }
        self.sensor = Some(sensor);
        Ok(self)
    }

    /// Whether the vehicle has crashed.
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    /// Current footprint.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Current position.
    pub fn position(&self) -> Point {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    /// Inputs applied on the next move.
    pub fn controls(&self) -> ControlState {
        self.controls
    }

    /// Who decides the controls.
    pub fn source(&self) -> ControlSource {
        self.source
    }

    /// The mounted sensor, if any.
    pub fn sensor(&self) -> Option<&Sensor> {
        self.sensor.as_ref()
    }

    /// The fitted network, if any.
    pub fn brain(&self) -> Option<&NeuralNetwork> {
        self.brain.as_ref()
    }

    /// Activations from the last network evaluation: sensor features first,
    /// then each level's outputs. Empty until the network has run.
    pub fn activations(&self) -> &[Array1<f32>] {
        &self.activations
    }

    /// Delivers host input. Only manual vehicles accept it.
    ///
    /// # Returns
    ///
    /// `false` if the vehicle is not manually controlled and the input was ignored.
    pub fn set_controls(&mut self, controls: ControlState) -> bool {
        if self.source != ControlSource::Manual {
            return false;
        }
        self.controls = controls;
        true
    }

    /// Advances the vehicle by one tick.
    ///
    /// An intact vehicle moves, rebuilds its polygon and checks for damage
    /// against `borders` and `obstacles`. A mounted sensor is refreshed either
    /// way; for a network-driven vehicle its readings then replace the controls
    /// for the next tick.
    pub fn update(&mut self, borders: &[Segment], obstacles: &[Polygon]) {
        if !self.damaged {
            self.move_once();
            self.polygon = self.create_polygon();
            self.damaged = self.assess_damage(borders, obstacles);
        }

        let origin = self.position();
        let Some(sensor) = self.sensor.as_mut() else {
            return;
        };
        sensor.update(origin, self.angle, borders, obstacles);

        if let Some(brain) = &self.brain {
            self.activations = brain.feed_forward_traced(&sensor.features());
            if self.source == ControlSource::NeuralControlled {
                if let Some(outputs) = self.activations.last() {
                    self.controls = ControlState::from_outputs(outputs.as_slice().unwrap_or(&[]));
                }
            }
        }
    }

    fn move_once(&mut self) {
        if self.controls.forward {
            self.speed += self.acceleration;
        }
        if self.controls.reverse {
            self.speed -= self.acceleration;
        }

        // Unlike `clamp`, tolerates an inverted range.
        self.speed = self.speed.min(self.max_speed).max(-self.max_speed / 2.0);

        if self.speed > 0.0 {
            self.speed -= self.friction;
        }
        if self.speed < 0.0 {
            self.speed += self.friction;
        }
        if self.speed.abs() < self.friction {
            self.speed = 0.0;
        }

        if self.speed != 0.0 {
            let flip = self.speed.signum();
            if self.controls.left {
                self.angle += STEER_RATE * flip;
            }
            if self.controls.right {
                self.angle -= STEER_RATE * flip;
            }
        }

        self.x -= self.angle.sin() * self.speed;
        self.y -= self.angle.cos() * self.speed;
    }

    fn create_polygon(&self) -> Polygon {
        let radius = self.width.hypot(self.height) / 2.0;
        let alpha = self.width.atan2(self.height);
        let corner = |theta: f32| Coord {
            x: self.x - theta.sin() * radius,
            y: self.y - theta.cos() * radius,
        };

        [
            corner(self.angle - alpha),
            corner(self.angle + alpha),
            corner(PI + self.angle - alpha),
            corner(PI + self.angle + alpha),
        ]
    }

    fn assess_damage(&self, borders: &[Segment], obstacles: &[Polygon]) -> bool {
        borders
            .iter()
            .any(|border| polygon_intersects_segment(&self.polygon, border))
            || obstacles
                .iter()
                .any(|other| polygons_intersect(&self.polygon, other))
    }
}
