//! Candidate population and the "keep best, mutate clones" search.
//!
//! There is no fitness function beyond forward progress and no crossover.
//! A generation is seeded either with fresh random networks or with clones of
//! the retained best network; every clone but the first is mutated, which
//! keeps the search local around the last known-good driver.

use tracing::info;

use super::brain::NeuralNetwork;
use super::error::SimulationError;
use super::geometric_utils::Polygon;
use super::params::{Params, check_speed_cap};
use super::road::Road;
use super::vehicle::{Color, ControlSource, Sensor, Vehicle};

/// Candidates, traffic and the road they share.
///
/// Damaged candidates stay in the population; they stop moving but still
/// take part in best selection.
#[derive(Debug, Clone)]
pub struct Population {
    road: Road,
    candidates: Vec<Vehicle>,
    traffic: Vec<Vehicle>,
    baseline_traffic: usize,
    best: usize,
}

impl Population {
    /// Builds a generation on a fresh road.
    ///
    /// With a `seed` network every candidate gets a clone of it; candidate 0
    /// keeps it as-is and the rest are mutated by `params.mutation_amount`.
    /// Without one every candidate gets a random network.
    pub fn new(params: &Params, seed: Option<&NeuralNetwork>) -> Result<Self, SimulationError> {
        params.validate()?;
        if let Some(network) = seed {
            ensure_topology(network, &params.layer_sizes())?;
        }

        let road = Road::new(params.road_x, params.road_width, params.lane_count)?;
        let candidates = spawn_candidates(params, &road, seed)?;
        let traffic = spawn_traffic(params, &road)?;

        info!(
            candidates = candidates.len(),
            traffic = traffic.len(),
            seeded = seed.is_some(),
            "population initialized"
        );

        Ok(Self {
            road,
            candidates,
            baseline_traffic: traffic.len(),
            traffic,
            best: 0,
        })
    }

    /// Advances every vehicle by one tick.
    ///
    /// Traffic moves first, against the borders only. Its polygons are then
    /// frozen into an obstacle snapshot that every candidate is advanced
    /// against. Finally the best candidate is re-selected.
    pub fn step(&mut self) {
        let borders = self.road.borders();

        for vehicle in &mut self.traffic {
            vehicle.update(borders, &[]);
        }

        let obstacles: Vec<Polygon> = self.traffic.iter().map(|v| *v.polygon()).collect();

        for candidate in &mut self.candidates {
            candidate.update(borders, &obstacles);
        }

        self.best = best_index(self.candidates.iter().map(|c| c.y)).unwrap_or(0);
    }

    /// The shared road.
    pub fn road(&self) -> &Road {
        &self.road
    }

    /// All candidates, damaged ones included.
    pub fn candidates(&self) -> &[Vehicle] {
        &self.candidates
    }

    /// All traffic vehicles.
    pub fn traffic(&self) -> &[Vehicle] {
        &self.traffic
    }

    /// Mutable traffic vehicle, for delivering manual input.
    pub fn traffic_mut(&mut self, index: usize) -> Option<&mut Vehicle> {
        self.traffic.get_mut(index)
    }

    /// Index of the candidate furthest up the road.
    pub fn best_index(&self) -> usize {
        self.best
    }

    /// The candidate furthest up the road.
    pub fn best(&self) -> &Vehicle {
        &self.candidates[self.best]
    }

    /// Number of candidates that have not crashed.
    pub fn alive_count(&self) -> usize {
        self.candidates.iter().filter(|c| !c.is_damaged()).count()
    }

    /// Smallest traffic y, or the best candidate's y when there is no traffic.
    pub fn front(&self) -> f32 {
        self.traffic
            .iter()
            .map(|v| v.y)
            .reduce(f32::min)
            .unwrap_or(self.best().y)
    }

    /// Appends a traffic vehicle. Only call between ticks.
    pub fn push_traffic(&mut self, vehicle: Vehicle) {
        self.traffic.push(vehicle);
        info!(traffic = self.traffic.len(), "traffic vehicle added");
    }

    /// Drops every traffic vehicle added after construction.
    pub fn clear_extra_traffic(&mut self) {
        self.traffic.truncate(self.baseline_traffic);
        info!(traffic = self.traffic.len(), "extra traffic cleared");
    }

    /// Sets the speed cap of every candidate.
    pub fn set_ai_max_speed(&mut self, max_speed: f32) -> Result<(), SimulationError> {
        check_speed_cap(max_speed)?;
        for candidate in &mut self.candidates {
            candidate.max_speed = max_speed;
        }
        Ok(())
    }

    /// Sets the speed cap of every traffic vehicle.
    pub fn set_traffic_max_speed(&mut self, max_speed: f32) -> Result<(), SimulationError> {
        check_speed_cap(max_speed)?;
        for vehicle in &mut self.traffic {
            vehicle.max_speed = max_speed;
        }
        Ok(())
    }
}

/// Index of the smallest y. Ties go to the earliest index; `None` when empty.
pub fn best_index(ys: impl IntoIterator<Item = f32>) -> Option<usize> {
    ys.into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, y)| match best {
            Some((_, best_y)) if best_y <= y => best,
            _ => Some((i, y)),
        })
        .map(|(i, _)| i)
}

/// Checks a seed network against the layer layout the configuration asks for.
fn ensure_topology(network: &NeuralNetwork, expected: &[usize]) -> Result<(), SimulationError> {
    let actual = network.topology();
    if actual.len() != expected.len() {
        return Err(SimulationError::ShapeMismatch {
            context: "network layer count",
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    if let Some((&want, &got)) = expected.iter().zip(&actual).find(|(want, got)| want != got) {
        return Err(SimulationError::ShapeMismatch {
            context: "network layer size",
            expected: want,
            actual: got,
        });
    }
    Ok(())
}

fn spawn_candidates(
    params: &Params,
    road: &Road,
    seed: Option<&NeuralNetwork>,
) -> Result<Vec<Vehicle>, SimulationError> {
    let x = road.lane_center(params.start_lane);
    let layer_sizes = params.layer_sizes();

    (0..params.population_size)
        .map(|i| -> Result<Vehicle, SimulationError> {
            let brain = match seed {
                Some(parent) => {
                    let mut clone = parent.clone();
                    if i > 0 {
                        clone.mutate(params.mutation_amount);
                    }
                    clone
                }
                None => NeuralNetwork::new(&layer_sizes)?,
            };
            let sensor = Sensor::new(params.ray_count, params.ray_length, params.ray_spread)?;

            let mut vehicle = Vehicle::neural(
                x,
                params.start_y,
                params.vehicle_width,
                params.vehicle_height,
                params.ai_max_speed,
                sensor,
                brain,
            )?;
            vehicle.acceleration = params.acceleration;
            vehicle.friction = params.friction;
            Ok(vehicle)
        })
        .collect()
}

fn spawn_traffic(params: &Params, road: &Road) -> Result<Vec<Vehicle>, SimulationError> {
    params
        .traffic
        .iter()
        .map(|slot| -> Result<Vehicle, SimulationError> {
            let mut vehicle = Vehicle::new(
                road.lane_center(slot.lane),
                slot.y,
                params.vehicle_width,
                params.vehicle_height,
                ControlSource::FixedForward,
                params.traffic_max_speed,
            )?;
            vehicle.acceleration = params.acceleration;
            vehicle.friction = params.friction;
            vehicle.color = Color::random();
            Ok(vehicle)
        })
        .collect()
}
