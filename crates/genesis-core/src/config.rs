//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without recompiling.
//! Every section falls back to its defaults, so a partial file is valid.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::components::world::RegenerationMode;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub world: WorldConfig,
    pub agents: AgentConfig,
    pub learning: LearningConfig,
}

/// Run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub ticks: u64,
    pub seed: u64,
    /// Directory receiving snapshots, events and the run summary
    pub output_dir: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 1000,
            seed: 42,
            output_dir: "out".to_string(),
        }
    }
}

/// Grid and market parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width and height of the square grid
    pub grid_size: i32,
    pub market_x: i32,
    pub market_y: i32,
    pub resource_max: f64,
    pub initial_resource: f64,
    /// Amount added to the pool on each regeneration
    pub regeneration_rate: f64,
    pub regeneration: RegenerationMode,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            market_x: 5,
            market_y: 5,
            resource_max: 1000.0,
            initial_resource: 1000.0,
            regeneration_rate: 10.0,
            regeneration: RegenerationMode::PerTick,
        }
    }
}

/// Agent lifecycle parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_health: f64,
    /// Capacity of each agent's value memory
    pub memory_cap: usize,
    /// Survived ticks per year of age
    pub ticks_per_year: u64,
    /// Ticks a dependent needs before it matures
    pub maturation_ticks: u64,
    /// Age assigned on maturation
    pub juvenile_age: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            memory_cap: 500,
            ticks_per_year: 365,
            maturation_ticks: 365,
            juvenile_age: 10,
        }
    }
}

/// Decision and learning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Step size of the bandit update
    pub learning_rate: f64,
    /// Value assumed for state-action keys never seen before
    pub default_utility: f64,
    /// Actions sampled per exploitation decision
    pub sample_size: usize,
    pub sustenance_weight: f64,
    /// Multiplied by 100 to form the personal-goal bonus
    pub purpose_weight: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            default_utility: 10.0,
            sample_size: 5,
            sustenance_weight: 1.0,
            purpose_weight: 0.2,
        }
    }
}

impl LearningConfig {
    /// Bonus added to an action the agent's personal goal rewards.
    pub fn purpose_bonus(&self) -> f64 {
        self.purpose_weight * 100.0
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_TUNING_PATH, e);
            Self::default()
        })
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.grid_size <= 0 {
            return Err(ConfigError::Invalid("world.grid_size must be positive".into()));
        }
        if !(0..world.grid_size).contains(&world.market_x)
            || !(0..world.grid_size).contains(&world.market_y)
        {
            return Err(ConfigError::Invalid("market must lie inside the grid".into()));
        }
        if world.resource_max < 0.0 || world.regeneration_rate < 0.0 {
            return Err(ConfigError::Invalid(
                "resource_max and regeneration_rate must be non-negative".into(),
            ));
        }
        if self.agents.max_health <= 0.0 {
            return Err(ConfigError::Invalid("agents.max_health must be positive".into()));
        }
        if self.agents.ticks_per_year == 0 {
            return Err(ConfigError::Invalid("agents.ticks_per_year must be positive".into()));
        }
        let rate = self.learning.learning_rate;
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(ConfigError::Invalid("learning.learning_rate must be in (0, 1]".into()));
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulation.ticks, 1000);
        assert_eq!(config.world.grid_size, 10);
        assert_eq!(config.agents.memory_cap, 500);
        assert_eq!(config.learning.purpose_bonus(), 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [world]
            grid_size = 20
            regeneration = "per_action"

            [learning]
            learning_rate = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.world.grid_size, 20);
        assert_eq!(config.world.regeneration, RegenerationMode::PerAction);
        assert_eq!(config.world.market_x, 5);
        assert_eq!(config.learning.learning_rate, 0.25);
        assert_eq!(config.learning.default_utility, 10.0);
        assert_eq!(config.agents.ticks_per_year, 365);
    }

    #[test]
    fn test_shipped_tuning_file_matches_defaults() {
        let config = Config::from_toml_str(include_str!("../../../tuning.toml")).unwrap();
        let defaults = Config::default();
        assert_eq!(config.simulation.seed, defaults.simulation.seed);
        assert_eq!(config.world.regeneration, RegenerationMode::PerTick);
        assert_eq!(config.world.resource_max, defaults.world.resource_max);
        assert_eq!(config.agents.maturation_ticks, defaults.agents.maturation_ticks);
        assert_eq!(config.learning.sample_size, defaults.learning.sample_size);
    }

    #[test]
    fn test_market_outside_grid_is_rejected() {
        let err = Config::from_toml_str("[world]\ngrid_size = 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_learning_rate_is_rejected() {
        let err = Config::from_toml_str("[learning]\nlearning_rate = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Config::from_toml_str("[world\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.toml");
        fs::write(&path, "[simulation]\nticks = 50\nseed = 7\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.simulation.ticks, 50);
        assert_eq!(config.simulation.seed, 7);
    }
}
