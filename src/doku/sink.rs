//! Event sinks
//!
//! The scanner delivers events synchronously and in order to a single
//! [EventSink] per parse call. Renderers, tree builders and reference
//! collectors all live behind this trait; the scanner only requires that the
//! sink accept each event kind.

use crate::doku::event::Event;

/// Consumer of the ordered event stream.
pub trait EventSink {
    fn event(&mut self, event: Event);
}

/// Sink that buffers every event. Used by tests and by the CLI.
#[derive(Debug, Default)]
pub struct EventCollector {
    pub events: Vec<Event>,
}

impl EventCollector {
    pub fn new() -> Self {
        EventCollector::default()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl EventSink for EventCollector {
    fn event(&mut self, event: Event) {
        self.events.push(event);
    }
}
