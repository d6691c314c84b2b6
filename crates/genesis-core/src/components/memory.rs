//! Value Memory
//!
//! Per-agent table of learned utilities keyed by a coarse state-action key.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::actions::Action;

use super::world::Position;

/// Sustenance and reputation are bucketed at this midpoint
pub const STAT_MIDPOINT: f64 = 50.0;

/// Coarse state abstraction used for learning: where the agent stands,
/// two stat buckets, and the action taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateActionKey {
    pub position: Position,
    /// Sustenance above the midpoint
    pub well_fed: bool,
    /// Reputation above the midpoint
    pub well_regarded: bool,
    pub action: Action,
}

impl StateActionKey {
    pub fn new(position: Position, sustenance: f64, reputation: f64, action: Action) -> Self {
        Self {
            position,
            well_fed: sustenance > STAT_MIDPOINT,
            well_regarded: reputation > STAT_MIDPOINT,
            action,
        }
    }
}

/// Learned utility per state-action key.
///
/// Ordered storage keeps pruning reproducible for a given seed.
#[derive(Debug, Clone)]
pub struct ValueMemory {
    values: BTreeMap<StateActionKey, f64>,
    capacity: usize,
    default_value: f64,
}

impl ValueMemory {
    pub fn new(capacity: usize, default_value: f64) -> Self {
        Self {
            values: BTreeMap::new(),
            capacity,
            default_value,
        }
    }

    /// Learned value, or the optimistic default for an unseen key
    pub fn value(&self, key: &StateActionKey) -> f64 {
        self.values.get(key).copied().unwrap_or(self.default_value)
    }

    pub fn set(&mut self, key: StateActionKey, value: f64) {
        self.values.insert(key, value);
    }

    pub fn contains(&self, key: &StateActionKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Evict uniformly random entries until the table fits its capacity.
    ///
    /// Returns the number of entries removed.
    pub fn prune<R: Rng>(&mut self, rng: &mut R) -> usize {
        if self.values.len() <= self.capacity {
            return 0;
        }
        let remove_count = self.values.len() - self.capacity;
        let keys: Vec<StateActionKey> = self.values.keys().copied().collect();
        for index in rand::seq::index::sample(rng, keys.len(), remove_count).iter() {
            self.values.remove(&keys[index]);
        }
        remove_count
    }
}
