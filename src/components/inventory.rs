use crate::components::ingredient::{Ingredient, IngredientKind};
use crate::config::InventoryConfig;
use crate::core::context::TickContext;
use crate::core::types::{ComponentId, Position};
use crate::telemetry::events::{EventHeader, IngredientUsageEvent, UsageAction};
use log::{debug, info};

/// The character standing at the fridge. Implemented by the movement layer.
pub trait Actor {
    fn position(&self) -> Position;
    /// Re-read held movement keys; input is suppressed while the fridge is open.
    fn resync_movement(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Quantity-tracked ingredient store (the fridge).
///
/// Entries keep insertion order so the selection cursor walks a stable grid.
/// An entry disappears when its quantity reaches zero.
#[derive(Debug)]
pub struct Inventory {
    component_id: ComponentId,
    position: Position,
    reach: u32,
    row_width: usize,
    slot_position: Position,
    starting_stock: Vec<(IngredientKind, u32)>,
    stock: Vec<(IngredientKind, u32)>,
    cursor: usize,
    open: bool,
    usage_records: u64,
}

impl Inventory {
    pub fn new(component_id: ComponentId, position: Position, config: &InventoryConfig) -> Self {
        let starting_stock: Vec<(IngredientKind, u32)> = config
            .starting_stock
            .iter()
            .filter(|(_, quantity)| *quantity > 0)
            .map(|(tag, quantity)| (IngredientKind::from_tag(tag), *quantity))
            .collect();
        Self {
            component_id,
            position,
            reach: config.reach,
            row_width: config.row_width,
            slot_position: config.slot_position,
            stock: starting_stock.clone(),
            starting_stock,
            cursor: 0,
            open: false,
            usage_records: 0,
        }
    }

    /// Opens or closes the fridge when the actor is within reach. Whenever the
    /// fridge ends up closed the actor's movement is re-synced.
    pub fn toggle(&mut self, actor: &mut dyn Actor) -> bool {
        let distance = self.position.manhattan_distance(&actor.position());
        if distance <= self.reach {
            self.open = !self.open;
            debug!(
                "[Inventory {}] {} (actor {}px away)",
                self.component_id,
                if self.open { "opened" } else { "closed" },
                distance
            );
        } else {
            debug!(
                "[Inventory {}] actor out of reach ({}px > {}px)",
                self.component_id, distance, self.reach
            );
        }

        if !self.open {
            actor.resync_movement();
        }
        self.open
    }

    pub fn move_selection(&mut self, direction: Direction) {
        let count = self.stock.len();
        if !self.open || count == 0 {
            return;
        }
        let step = match direction {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Up => -(self.row_width as i64),
            Direction::Down => self.row_width as i64,
        };
        self.cursor = (self.cursor as i64 + step).rem_euclid(count as i64) as usize;
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.stock.len() {
            self.cursor = self.stock.len().saturating_sub(1);
        }
    }

    /// Removes one of the selected kind and returns a fresh instance of it.
    pub fn take(&mut self, ctx: &mut TickContext<'_>) -> Option<Ingredient> {
        if !self.open || self.stock.is_empty() {
            return None;
        }
        self.clamp_cursor();

        let (kind, quantity) = &mut self.stock[self.cursor];
        *quantity -= 1;
        let kind = kind.clone();
        if *quantity == 0 {
            self.stock.remove(self.cursor);
            self.clamp_cursor();
        }

        self.record_usage(&kind, UsageAction::Taken, ctx);
        info!(
            "[Inventory {}] took {} ({} kinds left)",
            self.component_id,
            kind,
            self.stock.len()
        );
        Some(Ingredient::new(kind, self.position))
    }

    /// Stores an ingredient the player returns. Only works while open;
    /// otherwise the ingredient is handed back untouched.
    pub fn put(&mut self, ingredient: Ingredient, ctx: &mut TickContext<'_>) -> Result<(), Ingredient> {
        let kind = self.store(ingredient)?;
        self.record_usage(&kind, UsageAction::Returned, ctx);
        Ok(())
    }

    /// Stores a delivered ingredient. Same rules as [`Inventory::put`] but no
    /// usage is recorded.
    pub fn restock(&mut self, ingredient: Ingredient) -> Result<(), Ingredient> {
        self.store(ingredient).map(|_| ())
    }

    fn store(&mut self, mut ingredient: Ingredient) -> Result<IngredientKind, Ingredient> {
        if !self.open {
            return Err(ingredient);
        }
        ingredient.set_position(self.slot_position);
        let kind = ingredient.kind().clone();
        match self.stock.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, quantity)) => *quantity += 1,
            None => self.stock.push((kind.clone(), 1)),
        }
        debug!(
            "[Inventory {}] stored {} at slot {}",
            self.component_id,
            kind,
            ingredient.position()
        );
        Ok(kind)
    }

    fn record_usage(&mut self, kind: &IngredientKind, action: UsageAction, ctx: &mut TickContext<'_>) {
        self.usage_records += 1;
        let header = EventHeader::new("usage", &self.component_id, ctx.session_id(), ctx.now);
        ctx.emit(Box::new(IngredientUsageEvent::new(
            header,
            self.usage_records,
            kind.tag(),
            action,
        )));
    }

    /// Closes the fridge and restores the starting stock.
    pub fn reset(&mut self) {
        self.open = false;
        self.cursor = 0;
        self.usage_records = 0;
        self.stock = self.starting_stock.clone();
        info!(
            "[Inventory {}] reset to {} kinds",
            self.component_id,
            self.stock.len()
        );
    }

    /// `(tag, quantity)` pairs in display order.
    pub fn snapshot(&self) -> Vec<(String, u32)> {
        self.stock.iter().map(|(kind, q)| (kind.tag(), *q)).collect()
    }

    pub fn quantity(&self, tag: &str) -> u32 {
        let kind = IngredientKind::from_tag(tag);
        self.stock
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, q)| *q)
            .unwrap_or(0)
    }

    pub fn selected(&self) -> Option<&IngredientKind> {
        self.stock.get(self.cursor).map(|(kind, _)| kind)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn component_id(&self) -> &ComponentId {
        &self.component_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::SessionState;
    use crate::telemetry::{MemorySink, INGREDIENT_USAGE_EVENT};

    struct Chef {
        position: Position,
        resyncs: u32,
    }

    impl Actor for Chef {
        fn position(&self) -> Position {
            self.position
        }

        fn resync_movement(&mut self) {
            self.resyncs += 1;
        }
    }

    fn fridge(stock: &[(&str, u32)]) -> Inventory {
        let config = InventoryConfig {
            starting_stock: stock.iter().map(|(t, q)| (t.to_string(), *q)).collect(),
            ..InventoryConfig::default()
        };
        Inventory::new("fridge".to_string(), Position::new(1000, 100), &config)
    }

    fn opened(stock: &[(&str, u32)]) -> Inventory {
        let mut inventory = fridge(stock);
        let mut chef = Chef { position: Position::new(1000, 150), resyncs: 0 };
        assert!(inventory.toggle(&mut chef));
        inventory
    }

    #[test]
    fn test_toggle_respects_reach() {
        let mut inventory = fridge(&[("egg", 1)]);
        let mut far = Chef { position: Position::new(850, 160), resyncs: 0 };
        assert!(!inventory.toggle(&mut far));
        assert_eq!(far.resyncs, 1);

        let mut near = Chef { position: Position::new(900, 200), resyncs: 0 };
        assert!(inventory.toggle(&mut near));
        assert_eq!(near.resyncs, 0);
        assert!(!inventory.toggle(&mut near));
        assert_eq!(near.resyncs, 1);
    }

    #[test]
    fn test_take_requires_open_fridge() {
        let session = SessionState::new(1, 0);
        let mut sink = MemorySink::new();
        let mut ctx = TickContext::new(0, &session, &mut sink);
        let mut inventory = fridge(&[("egg", 1)]);
        assert!(inventory.take(&mut ctx).is_none());
        assert_eq!(inventory.quantity("egg"), 1);
    }

    #[test]
    fn test_take_decrements_and_drops_empty_entries() {
        let session = SessionState::new(3, 0);
        let mut sink = MemorySink::new();
        let mut inventory = opened(&[("egg", 1), ("lamb", 2)]);
        {
            let mut ctx = TickContext::new(10, &session, &mut sink);
            let egg = inventory.take(&mut ctx).unwrap();
            assert_eq!(egg.tag(), "egg");
            assert_eq!(egg.position(), Position::new(1000, 100));
        }
        assert_eq!(inventory.snapshot(), vec![("lamb".to_string(), 2)]);
        assert_eq!(inventory.cursor(), 0);

        let events = sink.of_type(INGREDIENT_USAGE_EVENT);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].session_id(), 3);
        assert_eq!(events[0].data().get("action").and_then(|v| v.as_str()), Some("Taken"));
    }

    #[test]
    fn test_cursor_clamps_after_last_entry_removed() {
        let session = SessionState::new(1, 0);
        let mut sink = MemorySink::new();
        let mut ctx = TickContext::new(0, &session, &mut sink);
        let mut inventory = opened(&[("egg", 1), ("lamb", 1), ("fish", 1)]);
        inventory.move_selection(Direction::Left);
        assert_eq!(inventory.cursor(), 2);
        assert_eq!(inventory.take(&mut ctx).map(|i| i.tag()), Some("fish".to_string()));
        assert_eq!(inventory.cursor(), 1);
        assert_eq!(inventory.selected().map(|k| k.tag()), Some("lamb".to_string()));
    }

    #[test]
    fn test_empty_inventory_take_is_noop() {
        let session = SessionState::new(1, 0);
        let mut sink = MemorySink::new();
        let mut ctx = TickContext::new(0, &session, &mut sink);
        let mut inventory = opened(&[]);
        assert!(inventory.take(&mut ctx).is_none());
        inventory.move_selection(Direction::Down);
        assert_eq!(inventory.cursor(), 0);
        assert!(inventory.snapshot().is_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_move_selection_wraps_by_row() {
        let stock: Vec<(&str, u32)> = vec![
            ("lamb", 1), ("bread", 1), ("leek", 1), ("egg", 1), ("chicken", 1), ("lettuce", 1),
        ];
        let mut inventory = opened(&stock);
        inventory.move_selection(Direction::Down);
        assert_eq!(inventory.cursor(), 4);
        inventory.move_selection(Direction::Down);
        assert_eq!(inventory.cursor(), 2);
        inventory.move_selection(Direction::Up);
        assert_eq!(inventory.cursor(), 4);
        inventory.move_selection(Direction::Right);
        inventory.move_selection(Direction::Right);
        assert_eq!(inventory.cursor(), 0);
    }

    #[test]
    fn test_put_then_take_is_net_zero() {
        let session = SessionState::new(1, 0);
        let mut sink = MemorySink::new();
        let mut ctx = TickContext::new(0, &session, &mut sink);
        let mut inventory = opened(&[("bread", 2)]);

        inventory
            .put(Ingredient::from_tag("tomato", Position::new(5, 5)), &mut ctx)
            .unwrap();
        assert_eq!(inventory.quantity("tomato"), 1);
        inventory.move_selection(Direction::Right);
        assert_eq!(inventory.take(&mut ctx).map(|i| i.tag()), Some("tomato".to_string()));
        assert_eq!(inventory.snapshot(), vec![("bread".to_string(), 2)]);
    }

    #[test]
    fn test_put_while_closed_hands_back() {
        let session = SessionState::new(1, 0);
        let mut sink = MemorySink::new();
        let mut ctx = TickContext::new(0, &session, &mut sink);
        let mut inventory = fridge(&[]);
        let returned = inventory
            .put(Ingredient::from_tag("egg", Position::new(5, 5)), &mut ctx)
            .unwrap_err();
        assert_eq!(returned.position(), Position::new(5, 5));
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_restock_stores_without_usage_record() {
        let mut inventory = opened(&[("egg", 1)]);
        inventory
            .restock(Ingredient::from_tag("egg", Position::new(300, 0)))
            .unwrap();
        inventory
            .restock(Ingredient::from_tag("fish", Position::new(300, 0)))
            .unwrap();
        assert_eq!(
            inventory.snapshot(),
            vec![("egg".to_string(), 2), ("fish".to_string(), 1)]
        );

        let mut closed = fridge(&[]);
        assert!(closed
            .restock(Ingredient::from_tag("egg", Position::new(0, 0)))
            .is_err());

        // record numbering only counts player actions
        let session = SessionState::new(1, 0);
        let mut sink = MemorySink::new();
        let mut ctx = TickContext::new(0, &session, &mut sink);
        inventory.take(&mut ctx);
        let usage = sink.of_type(INGREDIENT_USAGE_EVENT);
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].data().get("id").and_then(|v| v.as_int()), Some(1));
    }

    #[test]
    fn test_reset_restores_starting_stock() {
        let session = SessionState::new(1, 0);
        let mut sink = MemorySink::new();
        let mut ctx = TickContext::new(0, &session, &mut sink);
        let mut inventory = opened(&[("egg", 1), ("cheese", 1)]);
        inventory.take(&mut ctx);
        inventory.move_selection(Direction::Right);
        inventory.reset();
        assert!(!inventory.is_open());
        assert_eq!(inventory.cursor(), 0);
        assert_eq!(
            inventory.snapshot(),
            vec![("egg".to_string(), 1), ("cheese".to_string(), 1)]
        );
    }
}
