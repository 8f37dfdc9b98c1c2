//! One weight-matrix-plus-bias stage of the network.

use ndarray::{Array1, Array2, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use super::super::error::SimulationError;
use super::super::geometric_utils::lerp;

/// A layer of hard-threshold units.
///
/// Output `j` fires (1.0) when the weighted input sum exceeds `biases[j]`,
/// and stays silent (0.0) otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LevelRecord", into = "LevelRecord")]
pub struct Level {
    /// Weight matrix (`input_count` × `output_count`).
    pub weights: Array2<f32>,
    /// Threshold per output unit (`output_count`).
    pub biases: Array1<f32>,
}

impl Level {
    /// Creates a level with every weight and bias drawn uniformly from `[-1, 1]`.
    pub fn new_random(input_count: usize, output_count: usize) -> Self {
        let range = Uniform::new_inclusive(-1.0, 1.0);
        Self {
            weights: Array2::random((input_count, output_count), range),
            biases: Array1::random(output_count, range),
        }
    }

    /// Number of inputs consumed.
    pub fn input_count(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of outputs produced.
    pub fn output_count(&self) -> usize {
        self.biases.len()
    }

    /// Evaluates the level on `inputs`, producing a binary vector.
    #[inline]
    pub fn feed_forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let sums = inputs.dot(&self.weights);
        Zip::from(&sums)
            .and(&self.biases)
            .map_collect(|&sum, &bias| if sum > bias { 1.0 } else { 0.0 })
    }

    /// Blends every parameter toward a fresh uniform draw by `amount`.
    ///
    /// `amount` is clamped into `[0, 1]`; zero leaves the level untouched and
    /// one replaces every parameter.
    pub fn mutate(&mut self, amount: f32) {
        let amount = amount.clamp(0.0, 1.0);
        if amount == 0.0 {
            return;
        }

        let range = Uniform::new_inclusive(-1.0, 1.0);
        let fresh_weights = Array2::random(self.weights.dim(), range);
        let fresh_biases = Array1::random(self.biases.len(), range);

        self.weights
            .zip_mut_with(&fresh_weights, |w, &r| *w = lerp(*w, r, amount));
        self.biases
            .zip_mut_with(&fresh_biases, |b, &r| *b = lerp(*b, r, amount));
    }
}

/// Plain-array form of a [`Level`] used for persistence.
///
/// Weights are stored row-major as `weights[input][output]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRecord {
    /// One row per input, one column per output.
    pub weights: Vec<Vec<f32>>,
    /// One threshold per output.
    pub biases: Vec<f32>,
}

impl From<Level> for LevelRecord {
    fn from(level: Level) -> Self {
        Self {
            weights: level.weights.rows().into_iter().map(|row| row.to_vec()).collect(),
            biases: level.biases.to_vec(),
        }
    }
}

impl TryFrom<LevelRecord> for Level {
    type Error = SimulationError;

    fn try_from(record: LevelRecord) -> Result<Self, Self::Error> {
        let input_count = record.weights.len();
        let output_count = record.biases.len();
        if input_count == 0 || output_count == 0 {
            return Err(SimulationError::Configuration("level has zero-sized dimensions"));
        }
        if let Some(row) = record.weights.iter().find(|row| row.len() != output_count) {
            return Err(SimulationError::ShapeMismatch {
                context: "level weight row",
                expected: output_count,
                actual: row.len(),
            });
        }

        Ok(Self {
            weights: Array2::from_shape_fn((input_count, output_count), |(i, j)| {
                record.weights[i][j]
            }),
            biases: Array1::from_vec(record.biases),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn threshold_is_strict() {
        let level = Level {
            weights: array![[1.0, 0.5], [1.0, 0.5]],
            biases: array![2.0, 0.0],
        };
        // Sums are [2.0, 1.0]; the first unit sits exactly on its bias.
        assert_eq!(level.feed_forward(&array![1.0, 1.0]), array![0.0, 1.0]);
    }

    #[test]
    fn ragged_record_is_rejected() {
        let record = LevelRecord {
            weights: vec![vec![0.1, 0.2], vec![0.3]],
            biases: vec![0.0, 0.0],
        };
        assert_eq!(
            Level::try_from(record),
            Err(SimulationError::ShapeMismatch {
                context: "level weight row",
                expected: 2,
                actual: 1,
            })
        );
    }
}
