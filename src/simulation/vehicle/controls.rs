//! Control inputs and the closed set of control sources.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Four directional inputs applied on every move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    /// Accelerate.
    pub forward: bool,
    /// Steer left.
    pub left: bool,
    /// Steer right.
    pub right: bool,
    /// Brake / reverse.
    pub reverse: bool,
}

impl ControlState {
    /// Only `forward` held.
    pub fn forward_only() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Builds a control state from the four network outputs
    /// (forward, left, right, reverse). A unit counts as held when it fired.
    pub fn from_outputs(outputs: &[f32]) -> Self {
        let held = |i: usize| outputs.get(i).is_some_and(|&v| v > 0.5);
        Self {
            forward: held(0),
            left: held(1),
            right: held(2),
            reverse: held(3),
        }
    }
}

/// Who decides a vehicle's [`ControlState`]. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSource {
    /// Driven by host-delivered input.
    Manual,
    /// Always accelerating, never steering.
    FixedForward,
    /// Driven by the vehicle's own network.
    NeuralControlled,
}

/// Display colour handed to the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Default colour of candidate vehicles.
    pub const CANDIDATE: Self = Self::rgb(30, 80, 220);
    /// Default colour of traffic vehicles.
    pub const TRAFFIC: Self = Self::rgb(200, 40, 40);

    /// Creates a colour from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A random opaque colour.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self::rgb(rng.random(), rng.random(), rng.random())
    }
}
