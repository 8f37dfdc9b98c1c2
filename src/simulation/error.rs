//! Error types raised by the simulation core.
//!
//! Geometry misses, out-of-range lanes and empty sensor readings are ordinary
//! values, not errors. Only configuration problems detected before the first
//! tick and persistence failures surface here.

use thiserror::Error;

/// Errors raised while constructing or driving a simulation.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// A degenerate configuration value (zero rays, zero lanes, ...).
    #[error("invalid configuration: {0}")]
    Configuration(&'static str),
    /// A network topology that disagrees with the sensor or control layout.
    #[error("shape mismatch in {context}: expected {expected}, found {actual}")]
    ShapeMismatch {
        /// Which dimension disagreed.
        context: &'static str,
        /// Size required by the surrounding configuration.
        expected: usize,
        /// Size actually found.
        actual: usize,
    },
    /// A host command addressed a vehicle index that does not exist.
    #[error("no traffic vehicle at index {0}")]
    UnknownVehicle(usize),
    /// A host tried to steer a vehicle that is not manually controlled.
    #[error("traffic vehicle {0} is not manually controlled")]
    NotManual(usize),
}

/// Errors raised by a [`NetworkStore`](super::storage::NetworkStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The stored blob is not a valid serialized network.
    #[error("malformed network blob: {0}")]
    Json(#[from] serde_json::Error),
    /// The stored network does not fit the live configuration.
    #[error(transparent)]
    Shape(#[from] SimulationError),
}
