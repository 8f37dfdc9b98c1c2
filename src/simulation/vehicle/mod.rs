//! Vehicles: kinematics, controls and the range sensor they carry.

mod car;
mod controls;
mod sensor;

pub use car::{CONTROL_OUTPUTS, DEFAULT_ACCELERATION, DEFAULT_FRICTION, Vehicle};
pub use controls::{Color, ControlSource, ControlState};
pub use sensor::Sensor;
