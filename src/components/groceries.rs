//! Grocery delivery that restocks the fridge.

use crate::components::ingredient::Ingredient;
use crate::components::inventory::Inventory;
use crate::core::types::Position;
use log::{info, warn};

/// What a fresh bag holds.
pub const GROCERY_CONTENTS: [&str; 9] = [
    "lamb", "bread", "egg", "chicken", "tomato", "lettuce", "cheese", "pork", "fish",
];

#[derive(Debug, Clone)]
pub struct GroceryBag {
    position: Position,
    items: Vec<Ingredient>,
}

impl GroceryBag {
    pub fn new(position: Position) -> Self {
        Self::with_contents(position, &GROCERY_CONTENTS)
    }

    pub fn with_contents(position: Position, tags: &[&str]) -> Self {
        let items = tags
            .iter()
            .map(|tag| Ingredient::from_tag(tag, position))
            .collect();
        Self { position, items }
    }

    /// Restocks the fridge with every item and empties the bag. Items the
    /// fridge refuses (it is closed) are dropped. Returns how many landed.
    pub fn deliver(&mut self, inventory: &mut Inventory) -> usize {
        let mut delivered = 0;
        for item in self.items.drain(..) {
            match inventory.restock(item) {
                Ok(()) => delivered += 1,
                Err(item) => warn!("[GroceryBag] fridge closed, {} dropped", item.tag()),
            }
        }
        info!("[GroceryBag] delivered {} items", delivered);
        delivered
    }

    pub fn items(&self) -> &[Ingredient] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::inventory::Actor;
    use crate::config::InventoryConfig;

    struct StandingChef;

    impl Actor for StandingChef {
        fn position(&self) -> Position {
            Position::new(0, 0)
        }

        fn resync_movement(&mut self) {}
    }

    #[test]
    fn test_delivery_restocks_open_fridge() {
        let mut fridge = Inventory::new("fridge".to_string(), Position::new(0, 0), &InventoryConfig::default());
        fridge.toggle(&mut StandingChef);

        let mut bag = GroceryBag::new(Position::new(300, 0));
        assert_eq!(bag.deliver(&mut fridge), 9);
        assert!(bag.is_empty());
        assert_eq!(fridge.quantity("egg"), 2);
        assert_eq!(fridge.quantity("leek"), 1);
    }

    #[test]
    fn test_delivery_to_closed_fridge_is_lost() {
        let mut fridge = Inventory::new("fridge".to_string(), Position::new(0, 0), &InventoryConfig::default());

        let mut bag = GroceryBag::with_contents(Position::new(300, 0), &["egg", "fish"]);
        assert_eq!(bag.deliver(&mut fridge), 0);
        assert!(bag.is_empty());
        assert_eq!(fridge.quantity("egg"), 1);
    }
}
