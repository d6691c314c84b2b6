//! Turn Systems
//!
//! The ECS systems that make up one tick, in the order the schedule chains
//! them: advance the clock, sweep every agent, apply removals, spawn the
//! newborns, regenerate the pool, then report. Population changes are only
//! collected during the sweep; removals and births land in later systems, so
//! the sweep never mutates the set of entities it walks.
//!
//! Agents are swept in spawn order (`SpawnSeq`), never in query order.

use bevy_ecs::prelude::{Commands, Component, Entity, Query, Res, ResMut, Resource};
use genesis_events::{EventCategory, RunSummary, SimEvent, TickSnapshot};
use rand::rngs::SmallRng;
use serde::Serialize;

use crate::components::agent::{Agent, AgentId, Departure};
use crate::components::memory::StateActionKey;
use crate::components::world::{RegenerationMode, World};
use crate::config::Config;
use crate::events::{EventSink, TickEvents};
use crate::systems::environment::{resolve_action, Resolution};
use crate::systems::learning::apply_update;
use crate::systems::policy::decide_action;
use crate::SimRng;

/// TiR above which an agent counts as compliant in yearly summaries
pub const COMPLIANT_TIR: f64 = 60.0;
/// TiR below which an agent counts as a rebel in yearly summaries
pub const REBEL_TIR: f64 = 40.0;

/// Position of an agent in the population's insertion order
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpawnSeq(pub u64);

/// Resource: hands out increasing spawn sequence numbers
#[derive(Resource, Debug, Default)]
pub struct SpawnCounter(u64);

impl SpawnCounter {
    pub fn issue(&mut self) -> SpawnSeq {
        let seq = SpawnSeq(self.0);
        self.0 += 1;
        seq
    }
}

/// Resource: number of the tick in progress (or last completed)
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct TickClock {
    pub tick: u64,
}

/// An agent that left the simulation voluntarily
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitRecord {
    pub tick: u64,
    pub agent_id: AgentId,
    pub name: String,
    pub age_years: u32,
    pub turns_survived: u64,
    pub tir: f64,
}

impl ExitRecord {
    pub fn new(tick: u64, agent: &Agent) -> Self {
        Self {
            tick,
            agent_id: agent.id,
            name: agent.name.clone(),
            age_years: agent.age_years,
            turns_survived: agent.turns_survived,
            tir: agent.tir,
        }
    }
}

/// Resource: every exit so far, in order
#[derive(Resource, Debug, Default)]
pub struct ExitLog {
    pub records: Vec<ExitRecord>,
}

/// Resource: children born during the sweep, spawned after removals
#[derive(Resource, Debug, Default)]
pub struct PendingBirths(pub Vec<Agent>);

/// Resource: the run summary folded from every snapshot
#[derive(Resource, Debug, Default)]
pub struct RunStats(pub RunSummary);

/// Resource: snapshot of the last completed tick
#[derive(Resource, Debug)]
pub struct LatestSnapshot(pub TickSnapshot);

impl Default for LatestSnapshot {
    fn default() -> Self {
        Self(TickSnapshot {
            tick: 0,
            population: 0,
            exited: 0,
            resource_level: 0.0,
            avg_tir: 0.0,
        })
    }
}

/// Mutable view over every agent, used by the sweep and removals
pub type AgentQuery<'w, 's> = Query<'w, 's, (Entity, &'static SpawnSeq, &'static mut Agent)>;
/// Read-only view over every agent, used for reporting
pub type AgentView<'w, 's> = Query<'w, 's, (&'static SpawnSeq, &'static Agent)>;

fn spawn_order(agents: &AgentQuery) -> Vec<Entity> {
    let mut order: Vec<(SpawnSeq, Entity)> = agents.iter().map(|(entity, seq, _)| (*seq, entity)).collect();
    order.sort_unstable_by_key(|(seq, _)| *seq);
    order.into_iter().map(|(_, entity)| entity).collect()
}

/// Agents of a read-only view, in spawn order
pub fn in_spawn_order<'a>(agents: &'a AgentView) -> Vec<&'a Agent> {
    let mut ordered: Vec<(&SpawnSeq, &Agent)> = agents.iter().collect();
    ordered.sort_unstable_by_key(|(seq, _)| **seq);
    ordered.into_iter().map(|(_, agent)| agent).collect()
}

/// Mean TiR, 0 for an empty population
pub fn average_tir(agents: &[&Agent]) -> f64 {
    if agents.is_empty() {
        return 0.0;
    }
    agents.iter().map(|a| a.tir).sum::<f64>() / agents.len() as f64
}

pub fn advance_clock(mut clock: ResMut<TickClock>) {
    clock.tick += 1;
}

/// Everything one agent's turn may touch besides the agents themselves
struct Sweep<'a> {
    tick: u64,
    config: &'a Config,
    world: &'a mut World,
    rng: &'a mut SmallRng,
    sink: &'a mut TickEvents,
    exits: &'a mut ExitLog,
    newborns: &'a mut Vec<Agent>,
}

/// Give every active agent its turn, in spawn order.
///
/// Dependents only count toward maturity. Everyone else decays first and, if
/// still alive, decides, acts and learns.
#[allow(clippy::too_many_arguments)]
pub fn agent_sweep(
    clock: Res<TickClock>,
    config: Res<Config>,
    mut world: ResMut<World>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<TickEvents>,
    mut exits: ResMut<ExitLog>,
    mut pending: ResMut<PendingBirths>,
    mut agents: AgentQuery,
) {
    let order = spawn_order(&agents);
    let mut sweep = Sweep {
        tick: clock.tick,
        config: &config,
        world: &mut world,
        rng: &mut rng.0,
        sink: &mut events,
        exits: &mut exits,
        newborns: &mut pending.0,
    };

    for &entity in &order {
        {
            let Ok((_, _, mut agent)) = agents.get_mut(entity) else {
                continue;
            };
            if !agent.is_active() {
                continue;
            }
            if agent.is_dependent() {
                agent.advance_dependency(&sweep.config.agents, sweep.tick, sweep.sink);
                continue;
            }
            if agent.apply_aging_and_decay(&sweep.config.agents, sweep.rng, sweep.tick, sweep.sink) {
                continue;
            }
        }
        act(entity, &order, &mut agents, &mut sweep);
    }
}

/// Decide, resolve and learn for one non-dependent agent
fn act(actor: Entity, order: &[Entity], agents: &mut AgentQuery, sweep: &mut Sweep) {
    let targets: Vec<Entity> = order
        .iter()
        .copied()
        .filter(|&other| other != actor && agents.get(other).is_ok_and(|(_, _, a)| a.can_be_targeted()))
        .collect();

    let Ok((_, _, agent)) = agents.get(actor) else {
        return;
    };
    let decision = decide_action(sweep.rng, agent, &targets, &sweep.config.learning);
    if decision.explored {
        sweep.sink.record(agent.event(
            sweep.tick,
            EventCategory::Decision,
            format!("Exploring with {}", decision.action),
        ));
    }
    // The update goes to the state the agent acted from
    let key = StateActionKey::new(agent.position, agent.sustenance, agent.reputation, decision.action);
    let learning_rate = sweep.config.learning.learning_rate;

    let mut births = Vec::new();
    let exiting = match decision.target {
        Some(target) => {
            let Ok([(_, _, mut agent), (_, _, mut other)]) = agents.get_many_mut([actor, target]) else {
                return;
            };
            let resolution = resolve_action(
                sweep.world,
                &mut agent,
                Some(&mut *other),
                decision.action,
                &mut births,
                sweep.rng,
                sweep.tick,
                sweep.sink,
            );
            learn(&mut agent, key, resolution, learning_rate)
        }
        None => {
            let Ok((_, _, mut agent)) = agents.get_mut(actor) else {
                return;
            };
            let resolution = resolve_action(
                sweep.world,
                &mut agent,
                None,
                decision.action,
                &mut births,
                sweep.rng,
                sweep.tick,
                sweep.sink,
            );
            learn(&mut agent, key, resolution, learning_rate)
        }
    };

    if let Some(exiting) = exiting {
        sweep.exits.records.push(ExitRecord::new(sweep.tick, &exiting));
        for &other in order {
            if let Ok((_, _, mut agent)) = agents.get_mut(other) {
                agent.absorb_exit_shock(&exiting, sweep.tick, sweep.sink);
            }
        }
    }

    for request in births {
        let Some(target) = decision.target else {
            break;
        };
        let Ok([(_, _, mut parent), (_, _, partner)]) = agents.get_many_mut([actor, target]) else {
            continue;
        };
        if parent.id != request.parent || partner.id != request.partner {
            continue;
        }
        let child = parent.create_child(&partner, sweep.rng, sweep.tick, sweep.sink);
        sweep.newborns.push(child);
    }
}

/// Apply the update and mark an exit; returns a copy of the agent if it left
fn learn(agent: &mut Agent, key: StateActionKey, resolution: Resolution, learning_rate: f64) -> Option<Agent> {
    apply_update(&mut agent.memory, key, resolution.reward, learning_rate);
    if !resolution.exited {
        return None;
    }
    agent.departure = Some(Departure::Exited);
    Some(agent.clone())
}

/// Despawn every departed agent; survivors grieve each one in removal order
pub fn apply_removals(
    mut commands: Commands,
    clock: Res<TickClock>,
    mut events: ResMut<TickEvents>,
    mut stats: ResMut<RunStats>,
    mut agents: AgentQuery,
) {
    let (departed, survivors): (Vec<Entity>, Vec<Entity>) = spawn_order(&agents)
        .into_iter()
        .partition(|&entity| agents.get(entity).is_ok_and(|(_, _, a)| !a.is_active()));

    for entity in departed {
        let Ok((_, _, gone)) = agents.get(entity) else {
            continue;
        };
        let gone = gone.clone();
        for &survivor in &survivors {
            if let Ok((_, _, mut agent)) = agents.get_mut(survivor) {
                agent.grieve_loss(&gone, clock.tick, &mut *events);
            }
        }

        let cause = match gone.departure {
            Some(Departure::Exited) => "exited",
            _ => {
                stats.0.total_deaths += 1;
                "deceased"
            }
        };
        events.record(SimEvent::new(
            clock.tick,
            EventCategory::CommunityEvent,
            format!("{} removed ({})", gone.name, cause),
        ));
        commands.entity(entity).despawn();
    }
}

/// Newborns join after removals, so they never grieve this tick's losses
pub fn spawn_newborns(
    mut commands: Commands,
    mut pending: ResMut<PendingBirths>,
    mut counter: ResMut<SpawnCounter>,
    mut stats: ResMut<RunStats>,
) {
    for child in pending.0.drain(..) {
        commands.spawn((child, counter.issue()));
        stats.0.total_births += 1;
    }
}

pub fn regenerate_pool(mut world: ResMut<World>) {
    if world.regeneration == RegenerationMode::PerTick {
        world.pool.regenerate();
    }
}

/// Emit the yearly population summary on year boundaries
pub fn year_summary(
    config: Res<Config>,
    clock: Res<TickClock>,
    mut events: ResMut<TickEvents>,
    agents: AgentView,
) {
    let ticks_per_year = config.agents.ticks_per_year;
    if ticks_per_year == 0 || clock.tick % ticks_per_year != 0 {
        return;
    }

    let population = in_spawn_order(&agents);
    let compliant = population.iter().filter(|a| a.tir > COMPLIANT_TIR).count();
    let rebel = population.iter().filter(|a| a.tir < REBEL_TIR).count();
    let avg_age = if population.is_empty() {
        0.0
    } else {
        population.iter().map(|a| a.age_years as f64).sum::<f64>() / population.len() as f64
    };
    events.record(SimEvent::new(
        clock.tick,
        EventCategory::YearSummary,
        format!(
            "Year {} | Pop {} | AvgAge {:.1} | C={} R={}",
            clock.tick / ticks_per_year,
            population.len(),
            avg_age,
            compliant,
            rebel
        ),
    ));
}

pub fn record_snapshot(
    world: Res<World>,
    clock: Res<TickClock>,
    exits: Res<ExitLog>,
    mut stats: ResMut<RunStats>,
    mut latest: ResMut<LatestSnapshot>,
    agents: AgentView,
) {
    let population = in_spawn_order(&agents);
    let snapshot = TickSnapshot {
        tick: clock.tick,
        population: population.len(),
        exited: exits.records.len(),
        resource_level: world.resource_level(),
        avg_tir: average_tir(&population),
    };
    stats.0.record(&snapshot);
    latest.0 = snapshot;
}
