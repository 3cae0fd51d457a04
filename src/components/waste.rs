//! Trash bin. Everything thrown away is counted as a mistake.

use crate::components::composition::Composition;
use crate::components::ingredient::Ingredient;
use crate::components::order_queue::OrderQueue;
use crate::core::context::TickContext;
use crate::core::types::{ComponentId, Position};
use crate::telemetry::events::mistake_kind;
use log::info;

pub struct Waste {
    component_id: ComponentId,
    position: Position,
    discarded: Vec<String>,
}

impl Waste {
    pub fn new(component_id: ComponentId, position: Position) -> Self {
        Self {
            component_id,
            position,
            discarded: Vec::new(),
        }
    }

    /// Throws an ingredient away and books a `throw away` mistake on `orders`.
    pub fn discard(&mut self, ingredient: Ingredient, orders: &mut OrderQueue, ctx: &mut TickContext<'_>) {
        let tag = ingredient.tag();
        info!("[Waste {}] threw away {}", self.component_id, tag);
        orders.log_mistake(mistake_kind::THROW_AWAY, format!("served: {}", tag), ctx);
        self.discarded.push(tag);
    }

    /// Throws away a whole plate, one mistake per ingredient on it.
    pub fn discard_plate(
        &mut self,
        mut plate: Composition,
        orders: &mut OrderQueue,
        ctx: &mut TickContext<'_>,
    ) -> usize {
        let count = plate.len();
        while let Some(ingredient) = plate.remove_last() {
            self.discard(ingredient, orders, ctx);
        }
        count
    }

    /// Tags thrown away this session, oldest first.
    pub fn discarded(&self) -> &[String] {
        &self.discarded
    }

    pub fn reset(&mut self) {
        self.discarded.clear();
    }

    pub fn position(&self) -> Position {
        self.position
    }
}
