//! Threshold feed-forward network that drives a vehicle.
//!
//! The network is a chain of [`Level`]s with binary outputs. It is never
//! trained by gradients: new candidates are produced by cloning a parent and
//! blending its parameters toward fresh random values with [`NeuralNetwork::mutate`].

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub mod level;

pub use level::{Level, LevelRecord};

use super::error::SimulationError;

/// Ordered stack of levels where each level feeds the next.
///
/// Serializes as a plain list of `{ weights, biases }` records. Deserializing
/// re-checks that consecutive levels chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Level>", into = "Vec<Level>")]
pub struct NeuralNetwork {
    levels: Vec<Level>,
}

impl NeuralNetwork {
    /// Creates a network with random parameters.
    ///
    /// `layer_sizes` lists the unit count of every layer, inputs first, so
    /// `[5, 6, 4]` yields two levels: 5→6 and 6→4.
    pub fn new(layer_sizes: &[usize]) -> Result<Self, SimulationError> {
        if layer_sizes.len() < 2 {
            return Err(SimulationError::Configuration(
                "network needs an input and an output layer",
            ));
        }
        if layer_sizes.contains(&0) {
            return Err(SimulationError::Configuration("network layers must be non-empty"));
        }

        let levels = layer_sizes
            .windows(2)
            .map(|pair| Level::new_random(pair[0], pair[1]))
            .collect();

        Ok(Self { levels })
    }

    /// Wraps existing levels, checking that each level's outputs feed the next.
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, SimulationError> {
        if levels.is_empty() {
            return Err(SimulationError::Configuration("network needs at least one level"));
        }
        if let Some(level) = levels.iter().find(|l| l.weights.ncols() != l.biases.len()) {
            return Err(SimulationError::ShapeMismatch {
                context: "level biases",
                expected: level.weights.ncols(),
                actual: level.biases.len(),
            });
        }
        for pair in levels.windows(2) {
            if pair[0].output_count() != pair[1].input_count() {
                return Err(SimulationError::ShapeMismatch {
                    context: "level chain",
                    expected: pair[0].output_count(),
                    actual: pair[1].input_count(),
                });
            }
        }
        Ok(Self { levels })
    }

    /// The levels, input side first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Size of the input vector the network consumes.
    pub fn input_count(&self) -> usize {
        self.levels.first().map_or(0, Level::input_count)
    }

    /// Size of the output vector the network produces.
    pub fn output_count(&self) -> usize {
        self.levels.last().map_or(0, Level::output_count)
    }

    /// Unit counts per layer, inputs first.
    pub fn topology(&self) -> Vec<usize> {
        std::iter::once(self.input_count())
            .chain(self.levels.iter().map(Level::output_count))
            .collect()
    }

    /// Checks the network against the input and output sizes it must serve.
    pub fn ensure_shape(&self, inputs: usize, outputs: usize) -> Result<(), SimulationError> {
        if self.input_count() != inputs {
            return Err(SimulationError::ShapeMismatch {
                context: "network inputs",
                expected: inputs,
                actual: self.input_count(),
            });
        }
        if self.output_count() != outputs {
            return Err(SimulationError::ShapeMismatch {
                context: "network outputs",
                expected: outputs,
                actual: self.output_count(),
            });
        }
        Ok(())
    }

    /// Runs the inputs through every level and returns the final outputs.
    #[inline]
    pub fn feed_forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for level in &self.levels {
            output = level.feed_forward(&output);
        }
        output
    }

    /// Like [`feed_forward`](Self::feed_forward) but keeps every layer's
    /// activations: the inputs first, then each level's outputs.
    pub fn feed_forward_traced(&self, inputs: &Array1<f32>) -> Vec<Array1<f32>> {
        let mut activations = Vec::with_capacity(self.levels.len() + 1);
        activations.push(inputs.clone());
        for level in &self.levels {
            let next = level.feed_forward(&activations[activations.len() - 1]);
            activations.push(next);
        }
        activations
    }

    /// Mutates all parameters in the network by `amount` (see [`Level::mutate`]).
    pub fn mutate(&mut self, amount: f32) {
        for level in &mut self.levels {
            level.mutate(amount);
        }
    }
}

impl TryFrom<Vec<Level>> for NeuralNetwork {
    type Error = SimulationError;

    fn try_from(levels: Vec<Level>) -> Result<Self, Self::Error> {
        Self::from_levels(levels)
    }
}

impl From<NeuralNetwork> for Vec<Level> {
    fn from(network: NeuralNetwork) -> Self {
        network.levels
    }
}
