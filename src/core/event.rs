use super::types::{ComponentId, Millis};
use std::collections::HashMap;
use std::fmt::Debug;

pub type EventType = &'static str;
pub type EventId = String;

/// Field value carried in an event payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EventValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl EventValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            EventValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            EventValue::Float(f) => Some(*f),
            EventValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventValue::Int(i) => write!(f, "{}", i),
            EventValue::Float(v) => write!(f, "{}", v),
            EventValue::String(s) => write!(f, "{}", s),
            EventValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A telemetry event emitted by a kitchen component.
///
/// Events are fire-and-forget: the core builds them at the moment something
/// happens and hands them to a [`crate::telemetry::TelemetrySink`]. Sinks read
/// the typed payload through [`Event::data`] so they never need to downcast.
pub trait Event: Debug + Send {
    fn id(&self) -> &EventId;
    fn event_type(&self) -> EventType;
    fn source_id(&self) -> &ComponentId;
    fn session_id(&self) -> u64;
    /// Game-clock time the event was raised at.
    fn timestamp(&self) -> Millis;
    fn data(&self) -> HashMap<String, EventValue>;
    fn clone_event(&self) -> Box<dyn Event>;
}

impl Clone for Box<dyn Event> {
    fn clone(&self) -> Self {
        self.clone_event()
    }
}
