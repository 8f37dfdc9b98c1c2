//! Persistence of the single retained "best" network.
//!
//! The blob is the network serialized as a JSON list of levels, each level a
//! `{ "weights": [[..]], "biases": [..] }` object. An absent blob is not an
//! error; it just means there is no prior network to start from.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::brain::NeuralNetwork;
use super::error::StorageError;

/// Load/save/discard access to the retained best network.
pub trait NetworkStore {
    /// Returns the stored network, or `None` if nothing has been saved.
    fn load(&self) -> Result<Option<NeuralNetwork>, StorageError>;

    /// Replaces the stored network.
    fn save(&mut self, network: &NeuralNetwork) -> Result<(), StorageError>;

    /// Forgets the stored network. Discarding an empty store succeeds.
    fn discard(&mut self) -> Result<(), StorageError>;
}

/// Encodes a network as the persisted JSON blob.
pub fn encode(network: &NeuralNetwork) -> Result<String, StorageError> {
    Ok(serde_json::to_string(network)?)
}

/// Decodes a persisted JSON blob, validating its topology.
pub fn decode(blob: &str) -> Result<NeuralNetwork, StorageError> {
    Ok(serde_json::from_str(blob)?)
}

/// Store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store that reads and writes `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NetworkStore for JsonFileStore {
    fn load(&self) -> Result<Option<NeuralNetwork>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => decode(&blob).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, network: &NeuralNetwork) -> Result<(), StorageError> {
        let blob = serde_json::to_string_pretty(network)?;
        fs::write(&self.path, blob)?;
        Ok(())
    }

    fn discard(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// In-memory store, for hosts without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a raw blob, valid or not.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    /// The raw stored blob.
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl NetworkStore for MemoryStore {
    fn load(&self) -> Result<Option<NeuralNetwork>, StorageError> {
        self.blob.as_deref().map(decode).transpose()
    }

    fn save(&mut self, network: &NeuralNetwork) -> Result<(), StorageError> {
        self.blob = Some(encode(network)?);
        Ok(())
    }

    fn discard(&mut self) -> Result<(), StorageError> {
        self.blob = None;
        Ok(())
    }
}
