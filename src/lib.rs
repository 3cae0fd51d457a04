pub mod components;
pub mod config;
pub mod core;
pub mod telemetry;

// Re-export commonly used types
pub use crate::components::{
    Composition, Direction, GroceryBag, Ingredient, IngredientKind, Inventory, OrderQueue,
    ServingCounter, Station, StationKind, Waste,
};
pub use crate::config::KitchenConfig;
pub use crate::core::context::{SessionState, TickContext};
pub use crate::core::engine::{KitchenEngine, KitchenLayout, TickSummary};
pub use crate::core::event::{Event, EventId, EventType, EventValue};
pub use crate::core::types::{ComponentId, Millis, Position};
pub use crate::telemetry::{CsvLogSink, FanoutSink, LogSink, MemorySink, TelemetrySink};
