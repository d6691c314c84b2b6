//! Output Generation
//!
//! Per-tick snapshot files and the end-of-run summary.

pub mod snapshot;

pub use snapshot::{write_summary, SnapshotWriter, SNAPSHOTS_FILE, SUMMARY_FILE, EVENTS_FILE};

use thiserror::Error;

/// Error writing simulation output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
