//! Snapshot Output
//!
//! Writes one `TickSnapshot` per line and the final run summary.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use genesis_events::{RunSummary, TickSnapshot};

use super::OutputError;

/// File names inside the output directory
pub const SNAPSHOTS_FILE: &str = "snapshots.jsonl";
pub const EVENTS_FILE: &str = "events.jsonl";
pub const SUMMARY_FILE: &str = "summary.json";

/// Appends tick snapshots to a JSONL file
pub struct SnapshotWriter {
    writer: BufWriter<File>,
    snapshot_count: u64,
}

impl SnapshotWriter {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            snapshot_count: 0,
        })
    }

    pub fn write(&mut self, snapshot: &TickSnapshot) -> Result<(), OutputError> {
        writeln!(self.writer, "{}", snapshot.to_jsonl()?)?;
        self.snapshot_count += 1;
        Ok(())
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshot_count
    }

    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write the run summary as pretty JSON (overwrites)
pub fn write_summary(summary: &RunSummary, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshots_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOTS_FILE);

        let mut writer = SnapshotWriter::new(&path).unwrap();
        for tick in 1..=3 {
            writer
                .write(&TickSnapshot {
                    tick,
                    population: 3,
                    exited: 0,
                    resource_level: 1000.0,
                    avg_tir: 50.0,
                })
                .unwrap();
        }
        writer.flush().unwrap();
        assert_eq!(writer.snapshot_count(), 3);

        let content = fs::read_to_string(&path).unwrap();
        let ticks: Vec<u64> = content
            .lines()
            .map(|l| TickSnapshot::from_jsonl(l).unwrap().tick)
            .collect();
        assert_eq!(ticks, vec![1, 2, 3]);
    }

    #[test]
    fn test_summary_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SUMMARY_FILE);

        let mut summary = RunSummary::new(42);
        summary.total_births = 2;
        write_summary(&summary, &path).unwrap();

        let parsed: RunSummary = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, summary);
    }
}
