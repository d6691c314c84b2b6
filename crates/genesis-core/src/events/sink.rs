//! Event Sinks
//!
//! The core never owns logging state. Every operation that reports something
//! takes an `EventSink` and records structured events into it.

use bevy_ecs::prelude::*;
use genesis_events::{EventCategory, SimEvent};

/// Receiver for events emitted by the core
pub trait EventSink {
    fn record(&mut self, event: SimEvent);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: SimEvent) {}
}

/// Resource: collects the events of one tick for later reporting
#[derive(Resource, Debug, Default)]
pub struct TickEvents {
    pub events: Vec<SimEvent>,
}

impl TickEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, category: EventCategory) -> usize {
        self.events.iter().filter(|e| e.category == category).count()
    }

    pub fn of_category(&self, category: EventCategory) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(move |e| e.category == category)
    }
}

impl EventSink for TickEvents {
    fn record(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}

/// Forward an event to `tracing`: notable events at info, chatter at debug
pub fn trace_event(event: &SimEvent) {
    if event.category.is_notable() {
        tracing::info!(tick = event.tick, "{}", event.render());
    } else {
        tracing::debug!(tick = event.tick, "{}", event.render());
    }
}
