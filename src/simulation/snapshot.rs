//! Read-only view of the simulation handed to a renderer after each tick.

use ndarray::Array1;
use serde::Serialize;

use super::brain::NeuralNetwork;
use super::geometric_utils::Segment;
use super::road::Road;
use super::vehicle::Vehicle;

/// Everything a renderer needs to draw one frame.
///
/// Borrows the world, so it cannot outlive the next tick. Serializes to JSON
/// for out-of-process viewers.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    /// Ticks completed so far.
    pub tick: u64,
    /// The road and its borders.
    pub road: &'a Road,
    /// Separators between lanes.
    pub lane_dividers: Vec<Segment>,
    /// Traffic vehicles, with polygons and damage flags.
    pub traffic: &'a [Vehicle],
    /// Candidate vehicles, with polygons, damage flags and sensor rays.
    pub candidates: &'a [Vehicle],
    /// Index of the best candidate.
    pub best: usize,
    /// Candidates still intact.
    pub alive: usize,
    /// Network of the best candidate.
    pub best_network: Option<&'a NeuralNetwork>,
    /// Per-layer activations of the best candidate's network.
    pub best_activations: &'a [Array1<f32>],
}

impl Snapshot<'_> {
    /// The best candidate.
    pub fn best_vehicle(&self) -> &Vehicle {
        &self.candidates[self.best]
    }
}
