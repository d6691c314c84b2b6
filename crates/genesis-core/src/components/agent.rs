//! Agent Components
//!
//! An agent's identity, vital stats, life stage, goal and value memory.

use bevy_ecs::prelude::*;
use genesis_events::{ActorRef, EventCategory, SimEvent};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::Action;

use super::memory::ValueMemory;
use super::world::Position;

/// Upper bound for every stat except health
pub const MAX_STAT: f64 = 100.0;

/// Starting values for a freshly constructed agent
pub mod initial_stats {
    pub const MOOD: f64 = 80.0;
    pub const SELF_CONFIDENCE: f64 = 70.0;
    pub const REPUTATION: f64 = 50.0;
    pub const TIR: f64 = 50.0;
    pub const MEMORY_CAP: usize = 500;
    pub const DEFAULT_UTILITY: f64 = 10.0;
}

/// Clamp a stat into `[0, max]`.
pub fn clamp_stat(value: f64, max: f64) -> f64 {
    value.clamp(0.0, max)
}

/// Unique identifier for an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Draw a random (v4) id from the simulation RNG
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let bytes: [u8; 16] = rng.gen();
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Life stage of an agent still in the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifeStage {
    /// Newborn; cannot act until it matures
    Dependent,
    #[default]
    Single,
    Partnered,
    /// Lost a bonded partner
    Grieving,
}

/// Why an agent left the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Departure {
    Deceased,
    Exited,
}

/// Personal goal label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PersonalGoal {
    #[default]
    AcquireWealthAndStatus,
    FindLoveAndPartner,
    DiscoverTrueLimits,
    RecoveryAndSolitude,
}

impl PersonalGoal {
    /// Goals a newborn can be given
    pub const CHILD_GOALS: [PersonalGoal; 3] = [
        PersonalGoal::AcquireWealthAndStatus,
        PersonalGoal::FindLoveAndPartner,
        PersonalGoal::DiscoverTrueLimits,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PersonalGoal::AcquireWealthAndStatus => "Acquire Wealth and Status",
            PersonalGoal::FindLoveAndPartner => "Find Love and a Partner",
            PersonalGoal::DiscoverTrueLimits => "Discover the World's True Limits",
            PersonalGoal::RecoveryAndSolitude => "Recovery and Solitude",
        }
    }

    /// Whether pursuing this goal favors the given action
    pub fn rewards(&self, action: Action) -> bool {
        matches!(
            (self, action),
            (PersonalGoal::DiscoverTrueLimits, Action::AttemptExit)
        )
    }
}

/// A single member of the population
#[derive(Component, Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// Free-form label
    pub gender: String,
    pub position: Position,

    pub age_years: u32,
    pub turns_survived: u64,
    pub stage: LifeStage,
    pub partner: Option<AgentId>,
    pub progeny_count: u32,
    pub goal: PersonalGoal,
    pub last_action: Option<Action>,
    /// Set once the agent dies or exits; it is dropped from the population
    /// at the end of the tick
    pub departure: Option<Departure>,

    // Vital stats, all within [0, MAX_STAT] except health
    pub health: f64,
    pub sustenance: f64,
    pub mood: f64,
    pub self_confidence: f64,
    pub reputation: f64,
    /// Ideological alignment; low values mean dissent
    pub tir: f64,

    pub memory: ValueMemory,
    max_health: f64,
}

impl Agent {
    /// Create an agent with default stats: full health and sustenance,
    /// single, default goal, TiR 50.
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        gender: impl Into<String>,
        age_years: u32,
        position: Position,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            gender: gender.into(),
            position,
            age_years,
            turns_survived: 0,
            stage: LifeStage::Single,
            partner: None,
            progeny_count: 0,
            goal: PersonalGoal::default(),
            last_action: None,
            departure: None,
            health: MAX_STAT,
            sustenance: MAX_STAT,
            mood: initial_stats::MOOD,
            self_confidence: initial_stats::SELF_CONFIDENCE,
            reputation: initial_stats::REPUTATION,
            tir: initial_stats::TIR,
            memory: ValueMemory::new(initial_stats::MEMORY_CAP, initial_stats::DEFAULT_UTILITY),
            max_health: MAX_STAT,
        }
    }

    pub fn with_stage(mut self, stage: LifeStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_goal(mut self, goal: PersonalGoal) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_tir(mut self, tir: f64) -> Self {
        self.tir = clamp_stat(tir, MAX_STAT);
        self
    }

    /// Replace the value memory with an empty one of the given shape
    pub fn with_memory(mut self, capacity: usize, default_value: f64) -> Self {
        self.memory = ValueMemory::new(capacity, default_value);
        self
    }

    /// Set the health cap; health starts full at the new cap
    pub fn with_max_health(mut self, max_health: f64) -> Self {
        self.max_health = max_health.max(0.0);
        self.health = self.max_health;
        self
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn is_dependent(&self) -> bool {
        self.stage == LifeStage::Dependent
    }

    /// Still part of the population this tick
    pub fn is_active(&self) -> bool {
        self.departure.is_none()
    }

    pub fn is_partner_of(&self, other: &Agent) -> bool {
        self.partner == Some(other.id)
    }

    /// Probability of ignoring learned values and acting at random
    pub fn exploration_rate(&self) -> f64 {
        (1.0 - self.self_confidence / MAX_STAT).clamp(0.0, 1.0)
    }

    pub fn change_health(&mut self, delta: f64) {
        self.health = clamp_stat(self.health + delta, self.max_health);
    }

    pub fn change_sustenance(&mut self, delta: f64) {
        self.sustenance = clamp_stat(self.sustenance + delta, MAX_STAT);
    }

    pub fn change_mood(&mut self, delta: f64) {
        self.mood = clamp_stat(self.mood + delta, MAX_STAT);
    }

    pub fn change_reputation(&mut self, delta: f64) {
        self.reputation = clamp_stat(self.reputation + delta, MAX_STAT);
    }

    /// Pull every stat back into its bounds
    pub fn clamp_stats(&mut self) {
        self.health = clamp_stat(self.health, self.max_health);
        self.sustenance = clamp_stat(self.sustenance, MAX_STAT);
        self.mood = clamp_stat(self.mood, MAX_STAT);
        self.self_confidence = clamp_stat(self.self_confidence, MAX_STAT);
        self.reputation = clamp_stat(self.reputation, MAX_STAT);
        self.tir = clamp_stat(self.tir, MAX_STAT);
    }

    /// True when every stat lies within its declared bounds
    pub fn stats_in_bounds(&self) -> bool {
        let within = |v: f64, max: f64| (0.0..=max).contains(&v);
        within(self.health, self.max_health)
            && within(self.sustenance, MAX_STAT)
            && within(self.mood, MAX_STAT)
            && within(self.self_confidence, MAX_STAT)
            && within(self.reputation, MAX_STAT)
            && within(self.tir, MAX_STAT)
    }

    pub fn actor_ref(&self) -> ActorRef {
        ActorRef::new(self.id.0, self.name.clone(), self.age_years, self.turns_survived)
    }

    /// Build an event about this agent
    pub fn event(&self, tick: u64, category: EventCategory, message: impl Into<String>) -> SimEvent {
        SimEvent::new(tick, category, message).with_actor(self.actor_ref())
    }
}
