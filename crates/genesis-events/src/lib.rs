//! Shared event and snapshot types for the Project Genesis simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is the contract between the simulation core and anything that
//! persists, prints or plots its output.

pub mod event;
pub mod snapshot;

pub use event::{ActorRef, EventCategory, SimEvent};
pub use snapshot::{RunSummary, TickSnapshot};
