//! Event Types
//!
//! Structured events emitted by the simulation core, tagged by category.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event categories emitted by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Decision,
    Movement,
    MovementFail,
    Resource,
    ResourceFail,
    Maintenance,
    Relationship,
    Reproduction,
    CulturalAct,
    Exit,
    ExistentialFail,
    Ideology,
    Mortality,
    Trauma,
    CommunityLoss,
    CommunityEvent,
    AgeUp,
    Milestone,
    Optimization,
    YearSummary,
}

impl EventCategory {
    /// Upper-case tag used when rendering an event as a log line.
    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Decision => "DECISION",
            EventCategory::Movement => "MOVE",
            EventCategory::MovementFail => "MOVEMENT FAIL",
            EventCategory::Resource => "RESOURCE",
            EventCategory::ResourceFail => "RESOURCE FAIL",
            EventCategory::Maintenance => "MAINTENANCE",
            EventCategory::Relationship => "RELATIONSHIP",
            EventCategory::Reproduction => "REPRODUCTION",
            EventCategory::CulturalAct => "CULTURAL ACT",
            EventCategory::Exit => "EXIT",
            EventCategory::ExistentialFail => "EXISTENTIAL FAIL",
            EventCategory::Ideology => "IDEOLOGY",
            EventCategory::Mortality => "MORTALITY",
            EventCategory::Trauma => "TRAUMA",
            EventCategory::CommunityLoss => "COMMUNITY LOSS",
            EventCategory::CommunityEvent => "COMMUNITY EVENT",
            EventCategory::AgeUp => "AGE UP",
            EventCategory::Milestone => "MILESTONE",
            EventCategory::Optimization => "OPTIMIZATION",
            EventCategory::YearSummary => "YEAR",
        }
    }

    /// Whether the event changes the shape of the population or its beliefs.
    ///
    /// Routine per-action chatter (moves, market trips, decisions) is not notable.
    pub fn is_notable(&self) -> bool {
        matches!(
            self,
            EventCategory::Reproduction
                | EventCategory::Relationship
                | EventCategory::Exit
                | EventCategory::Ideology
                | EventCategory::Mortality
                | EventCategory::Trauma
                | EventCategory::CommunityEvent
                | EventCategory::Milestone
                | EventCategory::YearSummary
        )
    }

    /// Returns all category variants.
    pub fn all() -> &'static [EventCategory] {
        &[
            EventCategory::Decision,
            EventCategory::Movement,
            EventCategory::MovementFail,
            EventCategory::Resource,
            EventCategory::ResourceFail,
            EventCategory::Maintenance,
            EventCategory::Relationship,
            EventCategory::Reproduction,
            EventCategory::CulturalAct,
            EventCategory::Exit,
            EventCategory::ExistentialFail,
            EventCategory::Ideology,
            EventCategory::Mortality,
            EventCategory::Trauma,
            EventCategory::CommunityLoss,
            EventCategory::CommunityEvent,
            EventCategory::AgeUp,
            EventCategory::Milestone,
            EventCategory::Optimization,
            EventCategory::YearSummary,
        ]
    }
}

/// The agent an event is about, captured at emission time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRef {
    pub agent_id: Uuid,
    pub name: String,
    pub age_years: u32,
    pub turns_survived: u64,
}

impl ActorRef {
    pub fn new(agent_id: Uuid, name: impl Into<String>, age_years: u32, turns_survived: u64) -> Self {
        Self {
            agent_id,
            name: name.into(),
            age_years,
            turns_survived,
        }
    }
}

/// A single structured event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Tick on which the event happened
    pub tick: u64,
    pub category: EventCategory,
    /// Agent the event is about; absent for population-wide events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorRef>,
    pub message: String,
}

impl SimEvent {
    /// Create a population-wide event.
    pub fn new(tick: u64, category: EventCategory, message: impl Into<String>) -> Self {
        Self {
            tick,
            category,
            actor: None,
            message: message.into(),
        }
    }

    /// Attach the agent the event is about.
    pub fn with_actor(mut self, actor: ActorRef) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Checks if a specific agent is the subject of this event.
    pub fn involves_agent(&self, agent_id: &Uuid) -> bool {
        self.actor.as_ref().map_or(false, |a| &a.agent_id == agent_id)
    }

    /// Render as a single human-readable log line.
    pub fn render(&self) -> String {
        match &self.actor {
            Some(actor) => format!(
                "[{}][age={}][turns={}] {}: {}",
                actor.name,
                actor.age_years,
                actor.turns_survived,
                self.category.label(),
                self.message
            ),
            None => format!("{}: {}", self.category.label(), self.message),
        }
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
