//! Turn Orchestrator
//!
//! Owns the ECS world holding the population and the shared resources, and
//! the schedule that advances it one tick at a time.

use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs, Schedule};
use bevy_ecs::world::{Mut, World as EcsWorld};
use genesis_events::{RunSummary, TickSnapshot};

use crate::components::agent::Agent;
use crate::components::world::World;
use crate::config::{Config, ConfigError};
use crate::events::{EventSink, TickEvents};
use crate::setup::founding_population;
use crate::systems::turn::{
    advance_clock, agent_sweep, apply_removals, average_tir, record_snapshot, regenerate_pool,
    spawn_newborns, year_summary, ExitLog, ExitRecord, LatestSnapshot, PendingBirths, RunStats,
    SpawnCounter, SpawnSeq, TickClock,
};
use crate::SimRng;

/// The world, its population and the seeded RNG that drives them
pub struct Simulation {
    ecs: EcsWorld,
    schedule: Schedule,
}

impl Simulation {
    /// An empty world built from `config`, seeded with `config.simulation.seed`
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.simulation.seed;

        let mut ecs = EcsWorld::new();
        ecs.insert_resource(World::from_config(&config.world));
        ecs.insert_resource(SimRng::seed_from_u64(seed));
        ecs.insert_resource(RunStats(RunSummary::new(seed)));
        ecs.insert_resource(config);
        ecs.init_resource::<TickClock>();
        ecs.init_resource::<SpawnCounter>();
        ecs.init_resource::<TickEvents>();
        ecs.init_resource::<ExitLog>();
        ecs.init_resource::<PendingBirths>();
        ecs.init_resource::<LatestSnapshot>();

        // One thread keeps the RNG draw order fixed
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                advance_clock,
                agent_sweep,
                apply_removals,
                spawn_newborns,
                regenerate_pool,
                year_summary,
                record_snapshot,
            )
                .chain(),
        );

        Ok(Self { ecs, schedule })
    }

    /// A world populated with the three founders
    pub fn with_founders(config: Config) -> Result<Self, ConfigError> {
        let mut sim = Self::new(config)?;
        let founders = sim.ecs.resource_scope(|ecs, mut rng: Mut<SimRng>| {
            founding_population(&mut rng.0, ecs.resource::<Config>())
        });
        for agent in founders {
            sim.add_agent(agent);
        }
        Ok(sim)
    }

    /// Spawn `agent` after everyone already present
    pub fn add_agent(&mut self, agent: Agent) {
        let seq = self.ecs.resource_mut::<SpawnCounter>().issue();
        self.ecs.spawn((agent, seq));
    }

    pub fn config(&self) -> &Config {
        self.ecs.resource::<Config>()
    }

    pub fn world(&self) -> &World {
        self.ecs.resource::<World>()
    }

    pub fn world_mut(&mut self) -> Mut<'_, World> {
        self.ecs.resource_mut::<World>()
    }

    /// The live population in spawn order
    pub fn agents(&self) -> Vec<&Agent> {
        let mut agents: Vec<(SpawnSeq, &Agent)> = self
            .ecs
            .iter_entities()
            .filter_map(|entity| Some((*entity.get::<SpawnSeq>()?, entity.get::<Agent>()?)))
            .collect();
        agents.sort_unstable_by_key(|(seq, _)| *seq);
        agents.into_iter().map(|(_, agent)| agent).collect()
    }

    /// Apply `f` to every live agent
    pub fn update_agents(&mut self, mut f: impl FnMut(&mut Agent)) {
        let mut query = self.ecs.query::<&mut Agent>();
        for mut agent in query.iter_mut(&mut self.ecs) {
            f(&mut *agent);
        }
    }

    /// Number of ticks completed so far
    pub fn clock(&self) -> u64 {
        self.ecs.resource::<TickClock>().tick
    }

    pub fn exit_log(&self) -> &[ExitRecord] {
        &self.ecs.resource::<ExitLog>().records
    }

    pub fn summary(&self) -> &RunSummary {
        &self.ecs.resource::<RunStats>().0
    }

    /// Mean TiR of the live population, 0 when empty
    pub fn average_tir(&self) -> f64 {
        average_tir(&self.agents())
    }

    /// Advance one tick, forward its events to `sink` and return its snapshot
    pub fn step(&mut self, sink: &mut dyn EventSink) -> TickSnapshot {
        self.schedule.run(&mut self.ecs);
        for event in self.ecs.resource_mut::<TickEvents>().drain() {
            sink.record(event);
        }
        self.ecs.resource::<LatestSnapshot>().0.clone()
    }

    /// Run `ticks` ticks, handing every snapshot to `on_tick`
    pub fn run(
        &mut self,
        ticks: u64,
        sink: &mut dyn EventSink,
        mut on_tick: impl FnMut(&TickSnapshot),
    ) -> &RunSummary {
        for _ in 0..ticks {
            let snapshot = self.step(sink);
            on_tick(&snapshot);
        }
        self.summary()
    }
}
