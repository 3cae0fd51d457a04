use crate::components::composition::Recipe;
use crate::components::station::TransformRule;
use crate::core::types::{Millis, Position};
use serde::{Deserialize, Serialize};

/// Raw kinds a fresh session starts with, one of each.
pub const STARTING_STOCK: [&str; 10] = [
    "lamb", "bread", "leek", "egg", "chicken", "lettuce", "tomato", "cheese", "fish", "pork",
];

/// Dishes customers can order.
pub const MENU_ITEMS: [&str; 7] = [
    "sandwich",
    "egg fried",
    "chicken fried",
    "lamb fried",
    "chicken drumstick fried",
    "fish fried",
    "pork fried",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// `None` leaves stations uncapped.
    pub max_slots: Option<usize>,
    pub pan_rules: Vec<TransformRule>,
    pub cutting_board_rules: Vec<TransformRule>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            max_slots: None,
            pan_rules: TransformRule::pan_defaults(),
            cutting_board_rules: TransformRule::cutting_board_defaults(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Manhattan reach from the actor to the fridge.
    pub reach: u32,
    /// Items per row in the fridge grid; vertical moves step by this.
    pub row_width: usize,
    /// Where returned ingredients are parked.
    pub slot_position: Position,
    pub starting_stock: Vec<(String, u32)>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            reach: 200,
            row_width: 4,
            slot_position: Position::new(10, 10),
            starting_stock: STARTING_STOCK
                .iter()
                .map(|tag| (tag.to_string(), 1))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateConfig {
    pub capacity: usize,
    pub recipes: Vec<Recipe>,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            recipes: vec![Recipe::sandwich()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    pub max_orders: usize,
    /// Chance per update that a new order is placed while below `max_orders`.
    pub spawn_probability: f64,
    pub order_duration_ms: Millis,
    pub base_points: u32,
    pub expiry_penalty: i64,
    pub menu_items: Vec<String>,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            max_orders: 3,
            spawn_probability: 0.05,
            order_duration_ms: 60_000,
            base_points: 10,
            expiry_penalty: 5,
            menu_items: MENU_ITEMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingConfig {
    /// A submit is refused once more than this many plates are waiting.
    pub max_queued: usize,
    pub plate_spacing: i32,
    pub feedback_window_ms: Millis,
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            max_queued: 3,
            plate_spacing: 25,
            feedback_window_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenConfig {
    pub stations: StationConfig,
    pub inventory: InventoryConfig,
    pub plate: PlateConfig,
    pub orders: OrderConfig,
    pub serving: ServingConfig,
    pub session_length_ms: Millis,
    pub random_seed: Option<u64>,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            stations: StationConfig::default(),
            inventory: InventoryConfig::default(),
            plate: PlateConfig::default(),
            orders: OrderConfig::default(),
            serving: ServingConfig::default(),
            session_length_ms: 240_000,
            random_seed: None,
        }
    }
}

impl KitchenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_random_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_session_length(mut self, length_ms: Millis) -> Self {
        self.session_length_ms = length_ms;
        self
    }

    pub fn with_max_orders(mut self, max_orders: usize) -> Self {
        self.orders.max_orders = max_orders;
        self
    }

    pub fn with_spawn_probability(mut self, probability: f64) -> Self {
        self.orders.spawn_probability = probability;
        self
    }

    pub fn with_order_duration(mut self, duration_ms: Millis) -> Self {
        self.orders.order_duration_ms = duration_ms;
        self
    }

    pub fn with_menu_items(mut self, items: Vec<String>) -> Self {
        self.orders.menu_items = items;
        self
    }

    pub fn with_station_capacity(mut self, max_slots: Option<usize>) -> Self {
        self.stations.max_slots = max_slots;
        self
    }

    pub fn with_starting_stock(mut self, stock: Vec<(String, u32)>) -> Self {
        self.inventory.starting_stock = stock;
        self
    }

    pub fn with_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.plate.recipes = recipes;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.session_length_ms == 0 {
            return Err("Session length must be greater than 0".to_string());
        }

        if self.orders.max_orders == 0 {
            return Err("Order queue must allow at least one order".to_string());
        }

        if !(0.0..=1.0).contains(&self.orders.spawn_probability) {
            return Err(format!(
                "Spawn probability must be within [0, 1], got {}",
                self.orders.spawn_probability
            ));
        }

        if self.orders.order_duration_ms == 0 {
            return Err("Order duration must be greater than 0".to_string());
        }

        if self.orders.menu_items.is_empty() {
            return Err("Menu must list at least one dish".to_string());
        }

        if self.plate.capacity == 0 {
            return Err("Plate capacity must be greater than 0".to_string());
        }

        if let Some(recipe) = self.plate.recipes.iter().find(|r| r.required.is_empty()) {
            return Err(format!("Recipe for '{}' has no required ingredients", recipe.output));
        }

        if self.inventory.row_width == 0 {
            return Err("Inventory row width must be greater than 0".to_string());
        }

        if self.stations.max_slots == Some(0) {
            return Err("Station capacity must be greater than 0 when set".to_string());
        }

        Ok(())
    }
}
