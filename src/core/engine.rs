use crate::components::composition::Composition;
use crate::components::groceries::GroceryBag;
use crate::components::ingredient::Ingredient;
use crate::components::inventory::{Actor, Direction, Inventory};
use crate::components::order_queue::{OrderQueue, OrderView};
use crate::components::serving::{ServeFeedback, ServingCounter};
use crate::components::station::{Station, StationKind};
use crate::components::waste::Waste;
use crate::config::KitchenConfig;
use crate::core::context::{SessionState, TickContext};
use crate::core::types::{Millis, Position};
use crate::telemetry::TelemetrySink;
use log::{debug, info, warn};

/// Where each fixture sits on screen.
#[derive(Debug, Clone)]
pub struct KitchenLayout {
    pub pans: Vec<Position>,
    pub cutting_boards: Vec<Position>,
    pub fridge: Position,
    pub plate: Position,
    pub serving: Position,
    pub waste: Position,
}

impl Default for KitchenLayout {
    fn default() -> Self {
        Self {
            pans: vec![Position::new(300, 100), Position::new(400, 100)],
            cutting_boards: vec![Position::new(500, 100)],
            fridge: Position::new(50, 50),
            plate: Position::new(300, 300),
            serving: Position::new(600, 300),
            waste: Position::new(50, 400),
        }
    }
}

/// What happened during one [`KitchenEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    pub transformed: usize,
    pub served: Option<ServeFeedback>,
    pub session_ended: bool,
}

/// Owns every fixture of one kitchen and drives them from the host's clock.
///
/// Each `tick` advances the stations, then the order queue, then the serving
/// counter, so an order that expires on a tick can never be matched on it.
/// Intent methods build the [`TickContext`] for the caller.
pub struct KitchenEngine<S: TelemetrySink> {
    config: KitchenConfig,
    session: SessionState,
    telemetry: S,
    stations: Vec<Station>,
    inventory: Inventory,
    plate: Composition,
    serving: ServingCounter,
    orders: OrderQueue,
    waste: Waste,
}

impl<S: TelemetrySink> KitchenEngine<S> {
    pub fn new(config: KitchenConfig, telemetry: S, session_id: u64, now: Millis) -> Result<Self, String> {
        Self::with_layout(config, KitchenLayout::default(), telemetry, session_id, now)
    }

    pub fn with_layout(
        config: KitchenConfig,
        layout: KitchenLayout,
        telemetry: S,
        session_id: u64,
        now: Millis,
    ) -> Result<Self, String> {
        config.validate()?;

        let pans = layout.pans.iter().enumerate().map(|(i, position)| {
            Station::new(
                format!("pan_{}", i + 1),
                StationKind::Pan,
                *position,
                config.stations.pan_rules.clone(),
            )
        });
        let boards = layout.cutting_boards.iter().enumerate().map(|(i, position)| {
            Station::new(
                format!("cutting_board_{}", i + 1),
                StationKind::CuttingBoard,
                *position,
                config.stations.cutting_board_rules.clone(),
            )
        });
        let stations: Vec<Station> = pans
            .chain(boards)
            .map(|station| station.with_max_slots(config.stations.max_slots))
            .collect();

        let inventory = Inventory::new("fridge".to_string(), layout.fridge, &config.inventory);
        let plate = Composition::new(layout.plate, config.plate.capacity, config.plate.recipes.clone());
        let serving = ServingCounter::new("serving".to_string(), layout.serving, config.serving.clone());
        let orders = OrderQueue::new("order_queue".to_string(), config.orders.clone(), config.random_seed)?;
        let waste = Waste::new("waste".to_string(), layout.waste);

        info!(
            "[KitchenEngine] session {} starts with {} stations, {} menu items",
            session_id,
            stations.len(),
            config.orders.menu_items.len()
        );

        Ok(Self {
            session: SessionState::new(session_id, now),
            config,
            telemetry,
            stations,
            inventory,
            plate,
            serving,
            orders,
            waste,
        })
    }

    /// Advances every fixture to `now`.
    pub fn tick(&mut self, now: Millis) -> TickSummary {
        let mut summary = TickSummary::default();
        {
            let mut ctx = TickContext::new(now, &self.session, &mut self.telemetry);
            for station in &mut self.stations {
                summary.transformed += station.tick(&ctx);
            }
            self.orders.update(&mut ctx);
            summary.served = self.serving.tick(&mut ctx, &mut self.orders);
        }

        if !self.session.is_over() && self.session.elapsed(now) >= self.config.session_length_ms {
            self.session.mark_over();
            let mut ctx = TickContext::new(now, &self.session, &mut self.telemetry);
            self.orders.end_session(&mut ctx);
            summary.session_ended = true;
        }
        summary
    }

    /// Starts a fresh session: every fixture is cleared together.
    pub fn reset(&mut self, now: Millis) {
        self.session = self.session.next(now);
        for station in &mut self.stations {
            station.clear();
        }
        self.inventory.reset();
        self.plate.clear();
        self.serving.reset();
        self.orders.reset();
        self.waste.reset();
        info!("[KitchenEngine] reset into session {}", self.session.id());
    }

    pub fn toggle_inventory(&mut self, actor: &mut dyn Actor) -> bool {
        self.inventory.toggle(actor)
    }

    pub fn move_selection(&mut self, direction: Direction) {
        self.inventory.move_selection(direction);
    }

    pub fn take_from_inventory(&mut self, now: Millis) -> Option<Ingredient> {
        let mut ctx = TickContext::new(now, &self.session, &mut self.telemetry);
        self.inventory.take(&mut ctx)
    }

    pub fn return_to_inventory(&mut self, ingredient: Ingredient, now: Millis) -> Result<(), Ingredient> {
        let mut ctx = TickContext::new(now, &self.session, &mut self.telemetry);
        self.inventory.put(ingredient, &mut ctx)
    }

    pub fn deliver_groceries(&mut self, bag: &mut GroceryBag) -> usize {
        bag.deliver(&mut self.inventory)
    }

    pub fn place_on_station(&mut self, index: usize, ingredient: Ingredient, now: Millis) -> Result<(), Ingredient> {
        match self.stations.get_mut(index) {
            Some(station) => station.place(ingredient, now),
            None => {
                warn!("[KitchenEngine] no station at index {}", index);
                Err(ingredient)
            }
        }
    }

    pub fn take_from_station(&mut self, index: usize) -> Option<Ingredient> {
        self.stations.get_mut(index)?.take_ready()
    }

    /// Adds to the plate resting in the kitchen. A full plate hands the
    /// ingredient back.
    pub fn add_to_plate(&mut self, ingredient: Ingredient) -> Result<(), Ingredient> {
        if self.plate.is_full() {
            return Err(ingredient);
        }
        self.plate.add(ingredient);
        Ok(())
    }

    pub fn pick_up_plate(&mut self) -> Option<Composition> {
        self.plate.pick_up()
    }

    pub fn submit_plate(&mut self, plate: Composition) -> Result<(), Composition> {
        self.serving.submit(plate)
    }

    pub fn discard(&mut self, ingredient: Ingredient, now: Millis) {
        let mut ctx = TickContext::new(now, &self.session, &mut self.telemetry);
        self.waste.discard(ingredient, &mut self.orders, &mut ctx);
    }

    pub fn discard_plate(&mut self, plate: Composition, now: Millis) -> usize {
        let mut ctx = TickContext::new(now, &self.session, &mut self.telemetry);
        self.waste.discard_plate(plate, &mut self.orders, &mut ctx)
    }

    pub fn pending_orders(&self, now: Millis) -> Vec<OrderView> {
        self.orders.pending(now)
    }

    pub fn score(&self) -> i64 {
        self.orders.score()
    }

    /// Milliseconds left in the session, zero once it is over.
    pub fn time_left(&self, now: Millis) -> Millis {
        self.config
            .session_length_ms
            .saturating_sub(self.session.elapsed(now))
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    /// Index of the first station of `kind`.
    pub fn find_station(&self, kind: StationKind) -> Option<usize> {
        let index = self.stations.iter().position(|s| s.kind() == kind);
        debug!("[KitchenEngine] first {:?} station: {:?}", kind, index);
        index
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn plate(&self) -> &Composition {
        &self.plate
    }

    pub fn serving(&self) -> &ServingCounter {
        &self.serving
    }

    pub fn orders(&self) -> &OrderQueue {
        &self.orders
    }

    /// Places an order for `dish` right away, for scripted shifts.
    pub fn place_order(&mut self, dish: &str, now: Millis) -> bool {
        let mut ctx = TickContext::new(now, &self.session, &mut self.telemetry);
        self.orders.add_order(dish, &mut ctx)
    }

    pub fn waste(&self) -> &Waste {
        &self.waste
    }

    pub fn telemetry(&self) -> &S {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut S {
        &mut self.telemetry
    }

    pub fn into_telemetry(self) -> S {
        self.telemetry
    }
}
