//! Belief System
//!
//! Belief sharing between two agents, and the ideological shock an exit
//! sends through the rest of the population.

use genesis_events::EventCategory;

use crate::components::agent::{clamp_stat, Agent, MAX_STAT};
use crate::events::EventSink;

/// Fixed constants of the influence formula and the exit shock
pub mod belief_constants {
    /// Fraction of the TiR difference transferred per act, before influence
    pub const PERSUASION_RATE: f64 = 0.15;
    /// Added to reputation before scaling it into an influence factor
    pub const REPUTATION_OFFSET: f64 = 50.0;
    /// Shifts at or below this magnitude are negligible
    pub const SIGNIFICANT_SHIFT: f64 = 2.0;
    /// Reward per point of significant shift
    pub const SHIFT_REWARD_FACTOR: f64 = 5.0;
    /// Agents below this TiR are shaken by an exit
    pub const SHOCK_SUSCEPTIBILITY: f64 = 50.0;
    /// TiR lost by a shaken agent
    pub const SHOCK_TIR_LOSS: f64 = 20.0;
}

use belief_constants::*;

impl Agent {
    /// Reputation-scaled multiplier on how persuasive this agent is
    pub fn influence_factor(&self) -> f64 {
        (self.reputation + REPUTATION_OFFSET) / 100.0
    }

    /// Pull `target`'s TiR toward this agent's.
    ///
    /// Returns the reward: five times the shift when it is significant, else zero.
    pub fn share_belief(&self, target: &mut Agent, tick: u64, sink: &mut dyn EventSink) -> f64 {
        let difference = self.tir - target.tir;
        let change = difference * PERSUASION_RATE * self.influence_factor();
        target.tir = clamp_stat(target.tir + change, MAX_STAT);

        if change.abs() > SIGNIFICANT_SHIFT {
            let direction = if change > 0.0 { "Compliance" } else { "Rebellion" };
            sink.record(self.event(
                tick,
                EventCategory::CulturalAct,
                format!("Persuaded {} towards {}. Δ={:.2}", target.name, direction, change),
            ));
            change.abs() * SHIFT_REWARD_FACTOR
        } else {
            sink.record(self.event(
                tick,
                EventCategory::CulturalAct,
                "Shared beliefs; negligible effect.",
            ));
            0.0
        }
    }

    /// React to `exiting` leaving the simulation.
    ///
    /// Only other active agents below the susceptibility threshold are
    /// shaken: confidence jumps to the maximum and TiR drops. Returns
    /// whether this agent was affected.
    pub fn absorb_exit_shock(&mut self, exiting: &Agent, tick: u64, sink: &mut dyn EventSink) -> bool {
        if self.id == exiting.id || !self.is_active() || self.tir >= SHOCK_SUSCEPTIBILITY {
            return false;
        }
        self.self_confidence = MAX_STAT;
        self.tir = (self.tir - SHOCK_TIR_LOSS).max(0.0);
        sink.record(self.event(
            tick,
            EventCategory::Ideology,
            format!("{}'s exit changed TiR and confidence", exiting.name),
        ));
        true
    }
}
