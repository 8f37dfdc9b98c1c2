#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::array;
use roadevo::simulation::brain::NeuralNetwork;
use roadevo::simulation::error::{SimulationError, StorageError};
use roadevo::simulation::params::{Params, TrafficSlot};
use roadevo::simulation::storage::{JsonFileStore, MemoryStore, NetworkStore, decode, encode};
use tempfile::tempdir;

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("best_network.json"));

    let network = NeuralNetwork::new(&[5, 6, 4]).unwrap();
    store.save(&network).expect("Failed to save network");

    let loaded = store
        .load()
        .expect("Failed to load network")
        .expect("network should be present");

    assert_eq!(loaded, network);

    let inputs = [
        array![0.0, 0.0, 0.0, 0.0, 0.0],
        array![1.0, 0.2, 0.0, 0.9, 0.4],
        array![0.5, 0.5, 0.5, 0.5, 0.5],
    ];
    for input in &inputs {
        assert_eq!(loaded.feed_forward(input), network.feed_forward(input));
    }
}

#[test]
fn test_missing_file_loads_nothing() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_discard_removes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("best_network.json");
    let mut store = JsonFileStore::new(&path);

    store.save(&NeuralNetwork::new(&[2, 4]).unwrap()).unwrap();
    assert!(path.exists());

    store.discard().unwrap();
    assert!(!path.exists());
    assert!(store.load().unwrap().is_none());

    // Discarding twice is fine.
    store.discard().unwrap();
}

#[test]
fn test_invalid_json_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(matches!(store.load(), Err(StorageError::Json(_))));
}

#[test]
fn test_blob_layout() {
    let network = NeuralNetwork::new(&[3, 2]).unwrap();
    let blob = encode(&network).unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

    let levels = value.as_array().expect("blob is a list of levels");
    assert_eq!(levels.len(), 1);
    let weights = levels[0]["weights"].as_array().unwrap();
    assert_eq!(weights.len(), 3);
    assert_eq!(weights[0].as_array().unwrap().len(), 2);
    assert_eq!(levels[0]["biases"].as_array().unwrap().len(), 2);
}

#[test]
fn test_hand_written_blob_decodes() {
    let blob = r#"[{"weights": [[1.0, 0.0], [0.0, 1.0]], "biases": [0.5, 0.5]}]"#;
    let network = decode(blob).unwrap();
    assert_eq!(network.topology(), vec![2, 2]);
    assert_eq!(network.feed_forward(&array![1.0, 0.0]), array![1.0, 0.0]);
}

#[test]
fn test_ragged_weights_are_rejected() {
    let blob = r#"[{"weights": [[1.0, 0.0], [0.0]], "biases": [0.5, 0.5]}]"#;
    assert!(matches!(decode(blob), Err(StorageError::Json(_))));
}

#[test]
fn test_broken_level_chain_is_rejected() {
    let blob = r#"[
        {"weights": [[1.0, 0.0]], "biases": [0.5, 0.5]},
        {"weights": [[1.0], [0.0], [1.0]], "biases": [0.5]}
    ]"#;
    let err = decode(blob).unwrap_err();
    assert!(err.to_string().contains("level chain"), "{err}");
}

#[test]
fn test_memory_store_round_trip() {
    let mut store = MemoryStore::new();
    assert!(store.load().unwrap().is_none());

    let network = NeuralNetwork::new(&[5, 6, 4]).unwrap();
    store.save(&network).unwrap();
    assert!(store.blob().is_some());
    let loaded = store.load().unwrap().expect("network should be present");
    assert_eq!(loaded, network);
    let input = array![0.1, 0.9, 0.0, 0.4, 1.0];
    assert_eq!(loaded.feed_forward(&input), network.feed_forward(&input));

    store.discard().unwrap();
    assert!(store.blob().is_none());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_memory_store_with_corrupt_blob() {
    let store = MemoryStore::with_blob("[[[");
    assert!(store.load().is_err());
}

#[test]
fn test_params_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roadevo.json");

    let params = Params {
        lane_count: 4,
        population_size: 12,
        hidden_layers: vec![8, 5],
        traffic: vec![TrafficSlot { lane: 3, y: -250.0 }],
        ..Params::default()
    };
    params.save_to_file(&path).expect("Failed to save params");

    let loaded = Params::load_from_file(&path).expect("Failed to load params");
    assert_eq!(loaded, params);
    assert_eq!(loaded.layer_sizes(), vec![5, 8, 5, 4]);
}

#[test]
fn test_partial_params_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{"population_size": 7}"#).unwrap();

    let loaded = Params::load_from_file(&path).unwrap();
    assert_eq!(loaded.population_size, 7);
    assert_eq!(loaded.lane_count, Params::default().lane_count);
    assert_eq!(loaded.traffic, Params::default().traffic);
}

#[test]
fn test_invalid_params_are_rejected() {
    let params = Params {
        ray_count: 0,
        ..Params::default()
    };
    assert!(matches!(
        params.validate(),
        Err(SimulationError::Configuration(_))
    ));
}

#[test]
fn test_negative_speeds_and_rates_are_rejected() {
    let invalid = [
        Params {
            ai_max_speed: -2.0,
            ..Params::default()
        },
        Params {
            traffic_max_speed: f32::NAN,
            ..Params::default()
        },
        Params {
            acceleration: -0.2,
            ..Params::default()
        },
        Params {
            friction: f32::INFINITY,
            ..Params::default()
        },
    ];
    for params in &invalid {
        assert!(matches!(
            params.validate(),
            Err(SimulationError::Configuration(_))
        ));
    }
    assert!(Params::default().validate().is_ok());
}
