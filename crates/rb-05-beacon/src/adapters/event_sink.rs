//! Event sinks.

use crate::events::BeaconEvent;
use crate::ports::EventSink;
use parking_lot::Mutex;

/// Records events in publication order.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<BeaconEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub fn events(&self) -> Vec<BeaconEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<BeaconEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Names of recorded events, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(BeaconEvent::name).collect()
    }

    /// How many events named `name` were published.
    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }

    pub fn last(&self) -> Option<BeaconEvent> {
        self.events.lock().last().cloned()
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, event: BeaconEvent) {
        self.events.lock().push(event);
    }
}

/// Writes each event as a JSON payload on the `beacon::events` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn publish(&self, event: BeaconEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::info!(
                target: "beacon::events",
                event = event.name(),
                payload = %payload,
                "beacon event"
            ),
            Err(e) => tracing::warn!(
                target: "beacon::events",
                event = event.name(),
                error = %e,
                "failed to serialize beacon event"
            ),
        }
    }
}
