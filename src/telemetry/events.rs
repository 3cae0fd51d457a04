//! Telemetry events raised by the kitchen core.

use crate::core::event::{Event, EventId, EventType, EventValue};
use crate::core::types::{ComponentId, Millis};
use std::collections::HashMap;
use uuid::Uuid;

pub const MISTAKE_EVENT: EventType = "MistakeEvent";
pub const INGREDIENT_USAGE_EVENT: EventType = "IngredientUsageEvent";
pub const ORDER_PLACED_EVENT: EventType = "OrderPlacedEvent";
pub const ORDER_EXPIRED_EVENT: EventType = "OrderExpiredEvent";
pub const ORDER_COMPLETED_EVENT: EventType = "OrderCompletedEvent";
pub const SESSION_END_EVENT: EventType = "SessionEndEvent";

/// Mistake categories the core reports.
pub mod mistake_kind {
    pub const NO_ORDERS: &str = "no_orders";
    pub const WRONG_DISH: &str = "wrong_dish";
    pub const THROW_AWAY: &str = "throw away";
}

/// Common header shared by every event.
#[derive(Debug, Clone)]
pub struct EventHeader {
    pub id: EventId,
    pub source_id: ComponentId,
    pub session_id: u64,
    pub timestamp: Millis,
}

impl EventHeader {
    pub fn new(prefix: &str, source_id: &ComponentId, session_id: u64, timestamp: Millis) -> Self {
        Self {
            id: format!("{}_{}", prefix, Uuid::new_v4()),
            source_id: source_id.clone(),
            session_id,
            timestamp,
        }
    }
}

macro_rules! impl_event_header {
    ($ty:ty, $event_type:expr) => {
        impl Event for $ty {
            fn id(&self) -> &EventId {
                &self.header.id
            }

            fn event_type(&self) -> EventType {
                $event_type
            }

            fn source_id(&self) -> &ComponentId {
                &self.header.source_id
            }

            fn session_id(&self) -> u64 {
                self.header.session_id
            }

            fn timestamp(&self) -> Millis {
                self.header.timestamp
            }

            fn data(&self) -> HashMap<String, EventValue> {
                self.payload()
            }

            fn clone_event(&self) -> Box<dyn Event> {
                Box::new(self.clone())
            }
        }
    };
}

#[derive(Debug, Clone)]
pub struct MistakeEvent {
    pub header: EventHeader,
    pub kind: String,
    pub info: String,
}

impl MistakeEvent {
    pub fn new(header: EventHeader, kind: &str, info: impl Into<String>) -> Self {
        Self {
            header,
            kind: kind.to_string(),
            info: info.into(),
        }
    }

    fn payload(&self) -> HashMap<String, EventValue> {
        let mut data = HashMap::new();
        data.insert("mistake_type".to_string(), EventValue::String(self.kind.clone()));
        data.insert("info".to_string(), EventValue::String(self.info.clone()));
        data
    }
}

impl_event_header!(MistakeEvent, MISTAKE_EVENT);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageAction {
    Taken,
    Returned,
}

impl UsageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageAction::Taken => "Taken",
            UsageAction::Returned => "Returned",
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngredientUsageEvent {
    pub header: EventHeader,
    /// Running record number within the session, starting at 1.
    pub record_id: u64,
    pub ingredient: String,
    pub action: UsageAction,
    pub quantity: u32,
}

impl IngredientUsageEvent {
    pub fn new(header: EventHeader, record_id: u64, ingredient: String, action: UsageAction) -> Self {
        Self {
            header,
            record_id,
            ingredient,
            action,
            quantity: 1,
        }
    }

    fn payload(&self) -> HashMap<String, EventValue> {
        let mut data = HashMap::new();
        data.insert("id".to_string(), EventValue::Int(self.record_id as i64));
        data.insert("ingredient".to_string(), EventValue::String(self.ingredient.clone()));
        data.insert("action".to_string(), EventValue::String(self.action.as_str().to_string()));
        data.insert("quantity".to_string(), EventValue::Int(self.quantity as i64));
        data
    }
}

impl_event_header!(IngredientUsageEvent, INGREDIENT_USAGE_EVENT);

#[derive(Debug, Clone)]
pub struct OrderPlacedEvent {
    pub header: EventHeader,
    pub order_id: String,
    pub dish: String,
}

impl OrderPlacedEvent {
    fn payload(&self) -> HashMap<String, EventValue> {
        let mut data = HashMap::new();
        data.insert("order_id".to_string(), EventValue::String(self.order_id.clone()));
        data.insert("dish_type".to_string(), EventValue::String(self.dish.clone()));
        data
    }
}

impl_event_header!(OrderPlacedEvent, ORDER_PLACED_EVENT);

#[derive(Debug, Clone)]
pub struct OrderExpiredEvent {
    pub header: EventHeader,
    pub order_id: String,
    pub dish: String,
    /// Points deducted; zero once the session is over.
    pub penalty: i64,
}

impl OrderExpiredEvent {
    fn payload(&self) -> HashMap<String, EventValue> {
        let mut data = HashMap::new();
        data.insert("order_id".to_string(), EventValue::String(self.order_id.clone()));
        data.insert("dish_type".to_string(), EventValue::String(self.dish.clone()));
        data.insert("penalty".to_string(), EventValue::Int(self.penalty));
        data
    }
}

impl_event_header!(OrderExpiredEvent, ORDER_EXPIRED_EVENT);

#[derive(Debug, Clone)]
pub struct OrderCompletedEvent {
    pub header: EventHeader,
    pub order_id: String,
    pub dish: String,
    pub preparation_seconds: f64,
    pub points: u32,
}

impl OrderCompletedEvent {
    fn payload(&self) -> HashMap<String, EventValue> {
        let mut data = HashMap::new();
        data.insert("order_id".to_string(), EventValue::String(self.order_id.clone()));
        data.insert("dish_type".to_string(), EventValue::String(self.dish.clone()));
        data.insert(
            "preparation_time_seconds".to_string(),
            EventValue::Float(self.preparation_seconds),
        );
        data.insert("points".to_string(), EventValue::Int(self.points as i64));
        data
    }
}

impl_event_header!(OrderCompletedEvent, ORDER_COMPLETED_EVENT);

#[derive(Debug, Clone)]
pub struct SessionEndEvent {
    pub header: EventHeader,
    /// Wall-clock start, `%Y-%m-%d %H:%M:%S`.
    pub session_start: String,
    pub total_score: i64,
    /// Successful serves per menu item, in menu order.
    pub successes: Vec<(String, u32)>,
}

impl SessionEndEvent {
    pub fn successes_for(&self, dish: &str) -> u32 {
        self.successes
            .iter()
            .find(|(name, _)| name == dish)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    fn payload(&self) -> HashMap<String, EventValue> {
        let mut data = HashMap::new();
        data.insert("session_start".to_string(), EventValue::String(self.session_start.clone()));
        data.insert("total_score".to_string(), EventValue::Int(self.total_score));
        for (dish, count) in &self.successes {
            data.insert(dish.clone(), EventValue::Int(*count as i64));
        }
        data
    }
}

impl_event_header!(SessionEndEvent, SESSION_END_EVENT);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ids_are_unique() {
        let source = "order_queue".to_string();
        let a = MistakeEvent::new(EventHeader::new("mistake", &source, 1, 0), "wrong_dish", "x");
        let b = MistakeEvent::new(EventHeader::new("mistake", &source, 1, 0), "wrong_dish", "x");
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("mistake_"));
    }

    #[test]
    fn test_session_end_payload_lists_each_dish() {
        let source = "order_queue".to_string();
        let event = SessionEndEvent {
            header: EventHeader::new("session_end", &source, 3, 240_000),
            session_start: "2026-01-01 10:00:00".to_string(),
            total_score: 41,
            successes: vec![("sandwich".to_string(), 2), ("egg fried".to_string(), 0)],
        };
        let data = event.data();
        assert_eq!(data.get("total_score"), Some(&EventValue::Int(41)));
        assert_eq!(data.get("sandwich"), Some(&EventValue::Int(2)));
        assert_eq!(event.successes_for("egg fried"), 0);
        assert_eq!(event.successes_for("pork fried"), 0);
        assert_eq!(event.session_id(), 3);
        assert_eq!(event.event_type(), SESSION_END_EVENT);
    }

    #[test]
    fn test_clone_event_keeps_payload() {
        let source = "fridge".to_string();
        let event = IngredientUsageEvent::new(
            EventHeader::new("usage", &source, 2, 10),
            1,
            "egg".to_string(),
            UsageAction::Taken,
        );
        let boxed: Box<dyn Event> = event.clone_event();
        assert_eq!(boxed.data().get("action").and_then(|v| v.as_str()), Some("Taken"));
        assert_eq!(boxed.id(), event.id());
    }
}
