//! World Components
//!
//! Grid positions, the shared market resource pool, and the world itself.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;

/// A cell on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two cells
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// When the market pool regenerates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationMode {
    /// Once at the end of every tick
    #[default]
    PerTick,
    /// At the end of every resolved action
    PerAction,
}

/// The single shared renewable resource. Level stays within `[0, max]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePool {
    level: f64,
    max: f64,
    regeneration_rate: f64,
}

impl ResourcePool {
    pub fn new(level: f64, max: f64, regeneration_rate: f64) -> Self {
        let max = max.max(0.0);
        Self {
            level: level.clamp(0.0, max),
            max,
            regeneration_rate,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Take `amount` from the pool if at least that much is available.
    pub fn withdraw(&mut self, amount: f64) -> bool {
        if self.level >= amount {
            self.level = (self.level - amount).clamp(0.0, self.max);
            true
        } else {
            false
        }
    }

    /// Add one regeneration step, capped at the maximum.
    pub fn regenerate(&mut self) {
        self.level = (self.level + self.regeneration_rate).clamp(0.0, self.max);
    }
}

/// The grid, its market cell and the resource pool
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub grid_size: i32,
    pub market: Position,
    pub pool: ResourcePool,
    pub regeneration: RegenerationMode,
}

impl World {
    pub fn new(grid_size: i32, market: Position, pool: ResourcePool) -> Self {
        Self {
            grid_size,
            market,
            pool,
            regeneration: RegenerationMode::PerTick,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        let pool = ResourcePool::new(
            config.initial_resource,
            config.resource_max,
            config.regeneration_rate,
        );
        let mut world = Self::new(
            config.grid_size,
            Position::new(config.market_x, config.market_y),
            pool,
        );
        world.regeneration = config.regeneration;
        world
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        (0..self.grid_size).contains(&position.x) && (0..self.grid_size).contains(&position.y)
    }

    pub fn is_market(&self, position: Position) -> bool {
        position == self.market
    }

    pub fn resource_level(&self) -> f64 {
        self.pool.level()
    }
}
