//! Snapshot Types
//!
//! Per-tick snapshot records and the end-of-run summary.
//!
//! `TickSnapshot` is the contract between the simulation core and any
//! downstream persistence or plotting tool: one record per tick, in tick order.

use serde::{Deserialize, Serialize};

/// Population-level state at the end of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    /// Live agents after births and removals were applied
    pub population: usize,
    /// Cumulative number of agents that exited the simulation
    pub exited: usize,
    pub resource_level: f64,
    /// Mean TiR score of the live population; 0.0 when empty
    #[serde(rename = "avg_TiR")]
    pub avg_tir: f64,
}

impl TickSnapshot {
    /// Serializes the snapshot to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_ticks: u64,
    pub seed: u64,
    pub final_population: usize,
    pub peak_population: usize,
    pub total_births: usize,
    pub total_deaths: usize,
    pub total_exits: usize,
    pub final_resource_level: f64,
    #[serde(rename = "final_avg_TiR")]
    pub final_avg_tir: f64,
}

impl RunSummary {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Fold one tick snapshot into the summary.
    pub fn record(&mut self, snapshot: &TickSnapshot) {
        self.total_ticks = snapshot.tick;
        self.final_population = snapshot.population;
        self.peak_population = self.peak_population.max(snapshot.population);
        self.total_exits = snapshot.exited;
        self.final_resource_level = snapshot.resource_level;
        self.final_avg_tir = snapshot.avg_tir;
    }
}
