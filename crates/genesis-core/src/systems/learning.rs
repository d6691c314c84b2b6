//! Learning Update
//!
//! Single-step bandit update of an agent's value memory.

use crate::components::memory::{StateActionKey, ValueMemory};

/// Move `old` toward `reward` by `rate`.
pub fn bandit_update(old: f64, reward: f64, rate: f64) -> f64 {
    old + rate * (reward - old)
}

/// Update the stored value for `key` (the default when unseen) and return it.
pub fn apply_update(memory: &mut ValueMemory, key: StateActionKey, reward: f64, rate: f64) -> f64 {
    let updated = bandit_update(memory.value(&key), reward, rate);
    memory.set(key, updated);
    updated
}
