//! Tick driver and the control surface exposed to a host.
//!
//! A [`World`] owns the parameters, the current population and the store of
//! the retained best network. Every host command takes `&mut self`, so traffic
//! edits and speed changes can only land between ticks.

use rand::Rng;
use tracing::{debug, info, warn};

use super::brain::NeuralNetwork;
use super::error::{SimulationError, StorageError};
use super::evolution::Population;
use super::params::Params;
use super::snapshot::Snapshot;
use super::storage::NetworkStore;
use super::vehicle::{Color, ControlSource, ControlState, Sensor, Vehicle};

/// The running simulation.
#[derive(Debug)]
pub struct World<S> {
    params: Params,
    population: Population,
    store: S,
    tick: u64,
}

impl<S: NetworkStore> World<S> {
    /// Builds the first generation.
    ///
    /// A stored network seeds the population; an absent or unreadable one
    /// falls back to random networks. A stored network whose layout does not
    /// match `params` is rejected with [`SimulationError::ShapeMismatch`].
    pub fn new(params: Params, store: S) -> Result<Self, SimulationError> {
        params.validate()?;
        let seed = load_seed(&store);
        let population = Population::new(&params, seed.as_ref())?;

        Ok(Self {
            params,
            population,
            store,
            tick: 0,
        })
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) {
        self.population.step();
        self.tick += 1;
        debug!(
            tick = self.tick,
            best = self.population.best_index(),
            best_y = self.population.best().y,
            alive = self.population.alive_count(),
            "tick"
        );
    }

    /// Starts a new generation from whatever network is currently stored,
    /// with the baseline traffic restored.
    pub fn restart(&mut self) -> Result<(), SimulationError> {
        let seed = load_seed(&self.store);
        self.population = Population::new(&self.params, seed.as_ref())?;
        self.tick = 0;
        Ok(())
    }

    /// Adds a fixed-forward traffic car in `lane`, `y_ahead` units beyond the
    /// foremost traffic car.
    pub fn add_traffic_vehicle(
        &mut self,
        lane: i32,
        y_ahead: f32,
        color: Color,
    ) -> Result<(), SimulationError> {
        let road = self.population.road();
        let mut vehicle = Vehicle::new(
            road.lane_center(lane),
            self.population.front() - y_ahead,
            self.params.vehicle_width,
            self.params.vehicle_height,
            ControlSource::FixedForward,
            self.params.traffic_max_speed,
        )?;
        vehicle.acceleration = self.params.acceleration;
        vehicle.friction = self.params.friction;
        vehicle.color = color;

        self.population.push_traffic(vehicle);
        Ok(())
    }

    /// Adds a traffic car in a random lane with a random colour.
    pub fn add_random_traffic(&mut self, y_ahead: f32) -> Result<(), SimulationError> {
        let lane = rand::rng().random_range(0..self.params.lane_count) as i32;
        self.add_traffic_vehicle(lane, y_ahead, Color::random())
    }

    /// Truncates traffic back to the baseline layout.
    pub fn clear_extra_traffic(&mut self) {
        self.population.clear_extra_traffic();
    }

    /// Delivers host input to a manually driven traffic vehicle.
    pub fn steer(&mut self, index: usize, controls: ControlState) -> Result<(), SimulationError> {
        let vehicle = self
            .population
            .traffic_mut(index)
            .ok_or(SimulationError::UnknownVehicle(index))?;
        if vehicle.set_controls(controls) {
            Ok(())
        } else {
            Err(SimulationError::NotManual(index))
        }
    }

    /// Appends a manually driven traffic vehicle in `lane` at `y` and returns
    /// its index for [`steer`](Self::steer). The vehicle carries a sensor whose
    /// readings are for display only.
    pub fn add_manual_vehicle(&mut self, lane: i32, y: f32) -> Result<usize, SimulationError> {
        let mut vehicle = Vehicle::new(
            self.population.road().lane_center(lane),
            y,
            self.params.vehicle_width,
            self.params.vehicle_height,
            ControlSource::Manual,
            self.params.ai_max_speed,
        )?
        .with_sensor(Sensor::new(
            self.params.ray_count,
            self.params.ray_length,
            self.params.ray_spread,
        )?)?;
        vehicle.acceleration = self.params.acceleration;
        vehicle.friction = self.params.friction;

        self.population.push_traffic(vehicle);
        Ok(self.population.traffic().len() - 1)
    }

    /// Changes the speed cap of the candidates, now and in later generations.
    pub fn set_ai_max_speed(&mut self, max_speed: f32) -> Result<(), SimulationError> {
        self.population.set_ai_max_speed(max_speed)?;
        self.params.ai_max_speed = max_speed;
        Ok(())
    }

    /// Changes the speed cap of the traffic, now and in later generations.
    pub fn set_traffic_max_speed(&mut self, max_speed: f32) -> Result<(), SimulationError> {
        self.population.set_traffic_max_speed(max_speed)?;
        self.params.traffic_max_speed = max_speed;
        Ok(())
    }

    /// Stores the current best candidate's network.
    pub fn save_best(&mut self) -> Result<(), StorageError> {
        let Some(network) = self.population.best().brain() else {
            return Ok(());
        };
        self.store.save(network)?;
        info!(
            tick = self.tick,
            y = self.population.best().y,
            "best network saved"
        );
        Ok(())
    }

    /// Forgets the stored network; the next generation starts from random.
    pub fn discard_best(&mut self) -> Result<(), StorageError> {
        self.store.discard()?;
        info!("stored network discarded");
        Ok(())
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self) -> Snapshot<'_> {
        let best = self.population.best();
        Snapshot {
            tick: self.tick,
            road: self.population.road(),
            lane_dividers: self.population.road().lane_dividers(),
            traffic: self.population.traffic(),
            candidates: self.population.candidates(),
            best: self.population.best_index(),
            alive: self.population.alive_count(),
            best_network: best.brain(),
            best_activations: best.activations(),
        }
    }

    /// Ticks completed in the current generation.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Active parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// The network store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn load_seed<S: NetworkStore>(store: &S) -> Option<NeuralNetwork> {
    match store.load() {
        Ok(Some(network)) => {
            info!(topology = ?network.topology(), "seeding from stored network");
            Some(network)
        }
        Ok(None) => {
            info!("no stored network, starting from random");
            None
        }
        Err(err) => {
            warn!(error = %err, "stored network unreadable, starting from random");
            None
        }
    }
}
