//! # Roadevo - Evolving Self-Driving Cars
//!
//! A simulation of cars on a multi-lane road, each driven by a small
//! threshold network fed by ray-casting range sensors. Networks are never
//! trained by gradients: the best driver of a generation is kept and its
//! mutated clones form the next one.
//!
//! ## Features
//!
//! - Segment and polygon intersection primitives
//! - Car kinematics with friction, reverse steering and terminal damage
//! - Ray-casting sensor with nearest-hit readings
//! - Hard-threshold feed-forward network with lerp-toward-random mutation
//! - "Keep best, mutate clones" population search
//! - Deterministic tick ordering: traffic first, then candidates
//! - JSON persistence of the best network
//!
//! ## Core Modules
//!
//! - [`simulation::geometric_utils`] - Intersection primitives
//! - [`simulation::road`] - Lane layout and road borders
//! - [`simulation::vehicle`] - Vehicles, controls and sensors
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::evolution`] - Candidate population and best selection
//! - [`simulation::world`] - Tick driver and host control surface

/// Core simulation logic and data structures.
pub mod simulation {
    /// Threshold feed-forward network that drives candidate cars.
    pub mod brain;
    /// Error types.
    pub mod error;
    /// Candidate population and the mutate-clones search.
    pub mod evolution;
    /// Segment and polygon intersection.
    pub mod geometric_utils;
    /// Simulation parameters.
    pub mod params;
    /// Lane layout and road borders.
    pub mod road;
    /// Read-only per-tick view for renderers.
    pub mod snapshot;
    /// Persistence of the best network.
    pub mod storage;
    /// Vehicles, controls and sensors.
    pub mod vehicle;
    /// Tick driver and host control surface.
    pub mod world;
}
