//! Environment System
//!
//! Resolves one agent action against the grid, the market and an optional
//! target. Every branch is infallible: an impossible action is a failed
//! action with a negative reward.

use genesis_events::EventCategory;
use rand::Rng;

use crate::actions::Action;
use crate::components::agent::{Agent, AgentId};
use crate::components::world::{RegenerationMode, World};
use crate::events::EventSink;

/// Fixed costs, effects and rewards of each action
pub mod payoffs {
    /// Paid by every acting agent before its action resolves
    pub const BASE_SUSTENANCE_COST: f64 = 0.5;
    pub const BASE_HEALTH_COST: f64 = 0.02;

    pub const MOVE_REWARD: f64 = 1.0;
    pub const BOUNDARY_PENALTY: f64 = -5.0;

    /// Drawn from the pool per market visit; also the minimum level required
    pub const MARKET_COST: f64 = 50.0;
    pub const MARKET_SUSTENANCE: f64 = 65.0;
    pub const MARKET_HEALTH: f64 = 8.0;
    pub const MARKET_REPUTATION: f64 = 5.0;
    pub const MARKET_REWARD: f64 = 70.0;
    pub const MARKET_FAIL_SUSTENANCE: f64 = 10.0;
    pub const MARKET_FAIL_PENALTY: f64 = -15.0;

    pub const REST_HEALTH: f64 = 8.0;
    pub const REST_SUSTENANCE: f64 = 15.0;
    pub const REST_MOOD: f64 = 5.0;
    pub const REST_REWARD: f64 = 20.0;

    /// Reflection, theft, alliances, relationships and reproduction
    pub const SOCIAL_REWARD: f64 = 10.0;

    pub const EXIT_SUSTENANCE_COST: f64 = 50.0;
    pub const EXIT_HEALTH_COST: f64 = 10.0;
    /// Only agents below this TiR can leave
    pub const EXIT_TIR_THRESHOLD: f64 = 10.0;
    pub const EXIT_PROBABILITY: f64 = 0.05;
    pub const EXIT_REWARD: f64 = 1000.0;
    pub const EXIT_FAIL_MOOD: f64 = 25.0;
    pub const EXIT_FAIL_PENALTY: f64 = -100.0;
}

use payoffs::*;

/// A reproduction request collected during the sweep; the orchestrator
/// builds the child once the acting pair is known to be intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthRequest {
    pub parent: AgentId,
    pub partner: AgentId,
}

/// Outcome of one resolved action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub exited: bool,
    pub reward: f64,
}

impl Resolution {
    fn reward(reward: f64) -> Self {
        Self { exited: false, reward }
    }
}

/// Apply `action` for `agent`, possibly involving `target`.
///
/// Reproduction with a target pushes a [`BirthRequest`] onto `births`. The
/// only random draw is the exit gate, taken only when the agent's TiR is
/// below the exit threshold.
#[allow(clippy::too_many_arguments)]
pub fn resolve_action<R: Rng>(
    world: &mut World,
    agent: &mut Agent,
    target: Option<&mut Agent>,
    action: Action,
    births: &mut Vec<BirthRequest>,
    rng: &mut R,
    tick: u64,
    sink: &mut dyn EventSink,
) -> Resolution {
    agent.change_sustenance(-BASE_SUSTENANCE_COST);
    agent.change_health(-BASE_HEALTH_COST);
    agent.last_action = Some(action);

    let resolution = match action {
        Action::MoveNorth | Action::MoveSouth | Action::MoveEast | Action::MoveWest => {
            resolve_move(world, agent, action, tick, sink)
        }
        Action::GoToMarket => resolve_market(world, agent, tick, sink),
        Action::MeditateAndSleep => {
            agent.change_health(REST_HEALTH);
            agent.change_sustenance(REST_SUSTENANCE);
            agent.change_mood(REST_MOOD);
            sink.record(agent.event(tick, EventCategory::Maintenance, "Meditated and slept"));
            Resolution::reward(REST_REWARD)
        }
        Action::ReflectDeeply | Action::CommitTheft | Action::BuildAlliance => {
            Resolution::reward(SOCIAL_REWARD)
        }
        Action::SeekRelationship => {
            if let Some(other) = target {
                if agent.can_bond_with(other) {
                    agent.bond_with(other, tick, sink);
                }
            }
            Resolution::reward(SOCIAL_REWARD)
        }
        Action::AttemptReproduction => {
            if let Some(other) = target {
                births.push(BirthRequest {
                    parent: agent.id,
                    partner: other.id,
                });
                sink.record(agent.event(
                    tick,
                    EventCategory::Reproduction,
                    format!("Attempted reproduction with {}", other.name),
                ));
            }
            Resolution::reward(SOCIAL_REWARD)
        }
        Action::ShareBelief => match target {
            Some(other) if other.position == agent.position => {
                Resolution::reward(agent.share_belief(other, tick, sink))
            }
            _ => Resolution::reward(0.0),
        },
        Action::AttemptExit => resolve_exit(agent, rng, tick, sink),
    };

    if world.regeneration == RegenerationMode::PerAction {
        world.pool.regenerate();
    }
    agent.clamp_stats();
    resolution
}

fn resolve_move(
    world: &World,
    agent: &mut Agent,
    action: Action,
    tick: u64,
    sink: &mut dyn EventSink,
) -> Resolution {
    let Some(direction) = action.direction() else {
        return Resolution::reward(0.0);
    };

    let proposed = direction.step_from(agent.position);
    if world.in_bounds(proposed) {
        agent.position = proposed;
        sink.record(agent.event(tick, EventCategory::Movement, format!("Moved to {}", proposed)));
        Resolution::reward(MOVE_REWARD)
    } else {
        sink.record(agent.event(tick, EventCategory::MovementFail, "Boundary hit"));
        Resolution::reward(BOUNDARY_PENALTY)
    }
}

fn resolve_market(world: &mut World, agent: &mut Agent, tick: u64, sink: &mut dyn EventSink) -> Resolution {
    if world.is_market(agent.position) && world.pool.withdraw(MARKET_COST) {
        agent.change_sustenance(MARKET_SUSTENANCE);
        agent.change_health(MARKET_HEALTH);
        agent.change_reputation(MARKET_REPUTATION);
        sink.record(agent.event(
            tick,
            EventCategory::Resource,
            format!("Used market (remaining: {:.0})", world.pool.level()),
        ));
        Resolution::reward(MARKET_REWARD)
    } else {
        agent.change_sustenance(-MARKET_FAIL_SUSTENANCE);
        sink.record(agent.event(tick, EventCategory::ResourceFail, "Market not available"));
        Resolution::reward(MARKET_FAIL_PENALTY)
    }
}

fn resolve_exit<R: Rng>(agent: &mut Agent, rng: &mut R, tick: u64, sink: &mut dyn EventSink) -> Resolution {
    agent.change_sustenance(-EXIT_SUSTENANCE_COST);
    agent.change_health(-EXIT_HEALTH_COST);

    if agent.tir < EXIT_TIR_THRESHOLD && rng.gen::<f64>() < EXIT_PROBABILITY {
        sink.record(agent.event(tick, EventCategory::Exit, format!("{} has exited the grid", agent.name)));
        Resolution {
            exited: true,
            reward: EXIT_REWARD,
        }
    } else {
        agent.change_mood(-EXIT_FAIL_MOOD);
        sink.record(agent.event(tick, EventCategory::ExistentialFail, "Exit attempt failed"));
        Resolution::reward(EXIT_FAIL_PENALTY)
    }
}
