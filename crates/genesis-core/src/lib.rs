//! Project Genesis Simulation Library
//!
//! A small closed population of agents that move on a grid, draw from a
//! shared market, age, bond, reproduce, spread belief and occasionally leave
//! the simulation for good. Each agent learns per-state action values with a
//! single-step bandit update.

use bevy_ecs::system::Resource;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub mod actions;
pub mod components;
pub mod config;
pub mod events;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use actions::Action;
pub use components::*;
pub use config::Config;
pub use events::{EventSink, NullSink, TickEvents};
pub use simulation::Simulation;

/// Seeded random number generator owned by the simulation.
///
/// Every random draw in a run comes from this one source, in a fixed order,
/// so a seed fully determines the run.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}
