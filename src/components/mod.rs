pub mod composition;
pub mod groceries;
pub mod ingredient;
pub mod inventory;
pub mod order_queue;
pub mod serving;
pub mod station;
pub mod waste;

pub use composition::{Composition, Recipe};
pub use groceries::GroceryBag;
pub use ingredient::{Category, Ingredient, IngredientKind};
pub use inventory::{Actor, Direction, Inventory};
pub use order_queue::{Order, OrderQueue, OrderView, PreparationRecord};
pub use serving::{ServeFeedback, ServingCounter};
pub use station::{Station, StationKind, StationSlot, TransformRule};
pub use waste::Waste;
