use crate::core::event::{Event, EventType};
use log::{debug, info};

/// Receiver for telemetry events.
///
/// Persistence and reporting live behind this trait; the kitchen core only
/// calls `record` and never looks at the outcome.
pub trait TelemetrySink: Send {
    fn record(&mut self, event: &dyn Event);
}

/// Keeps every event in memory. Used by tests and by hosts that batch their
/// own persistence.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<Box<dyn Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Box<dyn Event>] {
        &self.events
    }

    pub fn of_type(&self, event_type: EventType) -> Vec<&dyn Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .map(|e| e.as_ref())
            .collect()
    }

    pub fn count(&self, event_type: EventType) -> usize {
        self.events.iter().filter(|e| e.event_type() == event_type).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TelemetrySink for MemorySink {
    fn record(&mut self, event: &dyn Event) {
        self.events.push(event.clone_event());
    }
}

/// Writes each event through the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn record(&mut self, event: &dyn Event) {
        let mut fields: Vec<String> = event
            .data()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        fields.sort();
        info!(
            "[Telemetry] session {} t={}ms {} from {}: {}",
            event.session_id(),
            event.timestamp(),
            event.event_type(),
            event.source_id(),
            fields.join(", ")
        );
    }
}

/// Forwards every event to several sinks in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn TelemetrySink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Box<dyn TelemetrySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TelemetrySink for FanoutSink {
    fn record(&mut self, event: &dyn Event) {
        debug!("[Telemetry] fanning {} out to {} sinks", event.event_type(), self.sinks.len());
        for sink in &mut self.sinks {
            sink.record(event);
        }
    }
}
