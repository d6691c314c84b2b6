//! Event Emission
//!
//! The sink interface the core reports through, and a JSONL event logger.

pub mod logger;
pub mod sink;

pub use genesis_events::{EventCategory, SimEvent};
pub use logger::EventLogger;
pub use sink::{trace_event, EventSink, NullSink, TickEvents};
