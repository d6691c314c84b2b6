//! Project Genesis
//!
//! Runs the population simulation from the three founders and writes
//! per-tick snapshots, the event log and a run summary to disk.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use genesis_core::config::{Config, DEFAULT_TUNING_PATH};
use genesis_core::events::{trace_event, EventLogger, TickEvents};
use genesis_core::output::{write_summary, SnapshotWriter, EVENTS_FILE, SNAPSHOTS_FILE, SUMMARY_FILE};
use genesis_core::Simulation;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "project_genesis")]
#[command(about = "A closed population of learning agents on a bounded grid")]
struct Args {
    /// Random seed for reproducibility (overrides the tuning file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate (overrides the tuning file)
    #[arg(long)]
    ticks: Option<u64>,

    /// Tuning file; when omitted, tuning.toml is used if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory (overrides the tuning file)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Could not load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load_or_default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    let out_dir = args
        .out
        .unwrap_or_else(|| PathBuf::from(&config.simulation.output_dir));

    println!("Project Genesis");
    println!("===============");
    println!("Seed: {}", config.simulation.seed);
    println!("Ticks: {}", config.simulation.ticks);
    println!(
        "Tuning: {}",
        args.config
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| DEFAULT_TUNING_PATH.to_string())
    );
    println!("Output: {}", out_dir.display());
    println!();

    if let Err(e) = fs::create_dir_all(&out_dir) {
        tracing::error!("Could not create output directory {}: {}", out_dir.display(), e);
        return ExitCode::FAILURE;
    }

    let mut event_logger = EventLogger::new(out_dir.join(EVENTS_FILE)).unwrap_or_else(|e| {
        tracing::warn!("Could not create event log: {}. Events will not be written.", e);
        EventLogger::null()
    });
    let mut snapshot_writer = match SnapshotWriter::new(out_dir.join(SNAPSHOTS_FILE)) {
        Ok(writer) => Some(writer),
        Err(e) => {
            tracing::warn!("Could not create snapshot file: {}", e);
            None
        }
    };

    let ticks = config.simulation.ticks;
    let mut sim = match Simulation::with_founders(config) {
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!("Cannot start simulation: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(population = sim.agents().len(), "Simulation start");

    let mut tick_events = TickEvents::new();
    for _ in 0..ticks {
        let snapshot = sim.step(&mut tick_events);

        let events = tick_events.drain();
        for event in &events {
            trace_event(event);
        }
        if let Err(e) = event_logger.log_batch(&events) {
            tracing::warn!(tick = snapshot.tick, "Failed to write events: {}", e);
        }
        if let Some(writer) = snapshot_writer.as_mut() {
            if let Err(e) = writer.write(&snapshot) {
                tracing::warn!(tick = snapshot.tick, "Failed to write snapshot: {}", e);
            }
        }
    }

    if let Err(e) = event_logger.flush() {
        tracing::warn!("Failed to flush event log: {}", e);
    }
    if let Some(writer) = snapshot_writer.as_mut() {
        if let Err(e) = writer.flush() {
            tracing::warn!("Failed to flush snapshots: {}", e);
        }
    }

    let summary = sim.summary();
    if let Err(e) = write_summary(summary, out_dir.join(SUMMARY_FILE)) {
        tracing::warn!("Could not write run summary: {}", e);
    }

    tracing::info!("Simulation finished");
    println!();
    println!("Simulation complete!");
    println!("  Ticks: {}", summary.total_ticks);
    println!("  Final population: {} (peak {})", summary.final_population, summary.peak_population);
    println!("  Births: {}", summary.total_births);
    println!("  Deaths: {}", summary.total_deaths);
    println!("  Exits: {}", summary.total_exits);
    println!("  Resource level: {:.1}", summary.final_resource_level);
    println!("  Average TiR: {:.2}", summary.final_avg_tir);
    println!("  Events logged: {}", event_logger.event_count());

    ExitCode::SUCCESS
}
