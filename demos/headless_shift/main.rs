use kitchen_rush::components::inventory::Actor;
use kitchen_rush::{
    Composition, Direction, FanoutSink, GroceryBag, Ingredient, KitchenConfig, KitchenEngine,
    LogSink, Millis, Position, StationKind,
};
use kitchen_rush::telemetry::CsvLogSink;
use std::path::PathBuf;

/// Clock step between engine ticks.
const STEP_MS: Millis = 100;
/// Longest the bot waits on a station before giving up.
const STATION_PATIENCE_MS: Millis = 10_000;

/// A chef parked next to the fridge for the whole shift.
struct Bot;

impl Actor for Bot {
    fn position(&self) -> Position {
        Position::new(60, 60)
    }

    fn resync_movement(&mut self) {}
}

struct Shift {
    engine: KitchenEngine<FanoutSink>,
    now: Millis,
}

impl Shift {
    fn advance(&mut self, duration: Millis) {
        let until = self.now + duration;
        while self.now < until {
            self.now += STEP_MS;
            let summary = self.engine.tick(self.now);
            if let Some(feedback) = summary.served {
                println!(
                    "  t={:>6}ms served: {} (+{})",
                    self.now,
                    if feedback.success { "ok" } else { "miss" },
                    feedback.points
                );
            }
        }
    }

    fn session_over(&self) -> bool {
        self.engine.session().is_over()
    }

    /// Selects `tag` in the fridge and takes one, restocking first if needed.
    fn take(&mut self, tag: &str) -> Option<Ingredient> {
        if self.engine.inventory().quantity(tag) == 0 {
            let mut bag = GroceryBag::new(Position::new(120, 50));
            self.engine.deliver_groceries(&mut bag);
        }
        if self.engine.inventory().quantity(tag) == 0 {
            return None;
        }
        while self.engine.inventory().selected().map(|k| k.tag()).as_deref() != Some(tag) {
            self.engine.move_selection(Direction::Right);
        }
        self.engine.take_from_inventory(self.now)
    }

    /// Leaves `ingredient` on the first station of `kind` until it is ready.
    fn process(&mut self, kind: StationKind, ingredient: Ingredient) -> Option<Ingredient> {
        let station = self.engine.find_station(kind)?;
        self.engine.place_on_station(station, ingredient, self.now).ok()?;
        let deadline = self.now + STATION_PATIENCE_MS;
        while self.now < deadline {
            self.advance(STEP_MS);
            if let Some(ready) = self.engine.take_from_station(station) {
                return Some(ready);
            }
        }
        None
    }

    fn prepare(&mut self, raw: &str, steps: &[StationKind]) -> Option<Ingredient> {
        let mut item = self.take(raw)?;
        for kind in steps {
            item = self.process(*kind, item)?;
        }
        Some(item)
    }

    fn cook(&mut self, dish: &str) -> Option<Composition> {
        let parts: Vec<(&str, Vec<StationKind>)> = match dish {
            "sandwich" => ["bread", "cheese", "lettuce", "tomato"]
                .iter()
                .map(|raw| (*raw, vec![StationKind::CuttingBoard]))
                .collect(),
            "chicken drumstick fried" => {
                vec![("chicken", vec![StationKind::CuttingBoard, StationKind::Pan])]
            }
            fried => vec![(fried.strip_suffix(" fried")?, vec![StationKind::Pan])],
        };

        for (raw, steps) in parts {
            let item = self.prepare(raw, &steps)?;
            if let Err(item) = self.engine.add_to_plate(item) {
                self.engine.discard(item, self.now);
                return None;
            }
        }
        self.engine.pick_up_plate()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let log_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("kitchen_logs"));

    let config = KitchenConfig::new().with_random_seed(Some(42));
    config.validate()?;

    let csv = CsvLogSink::new(log_dir.clone(), config.orders.menu_items.clone())?;
    let session_id = csv.next_session_id();
    let sink = FanoutSink::new()
        .with_sink(Box::new(LogSink))
        .with_sink(Box::new(csv));

    println!("Starting headless shift {} (logs in {})", session_id, log_dir.display());
    println!("  Session length: {}s", config.session_length_ms / 1000);
    println!("  Menu: {}", config.orders.menu_items.join(", "));

    let engine = KitchenEngine::new(config, sink, session_id, 0)?;
    let mut shift = Shift { engine, now: 0 };
    shift.engine.toggle_inventory(&mut Bot);

    while !shift.session_over() {
        let next = shift.engine.pending_orders(shift.now).first().map(|o| o.name.clone());
        let Some(dish) = next else {
            shift.advance(STEP_MS);
            continue;
        };

        match shift.cook(&dish) {
            Some(plate) => {
                if let Err(plate) = shift.engine.submit_plate(plate) {
                    shift.engine.discard_plate(plate, shift.now);
                }
            }
            None => {
                if let Some(leftover) = shift.engine.pick_up_plate() {
                    shift.engine.discard_plate(leftover, shift.now);
                }
            }
        }
        shift.advance(STEP_MS);
    }

    let orders = shift.engine.orders();
    println!("\nShift over");
    println!("  Final score: {}", orders.score());
    println!("  Mistakes: {}", orders.mistakes());
    for dish in &shift.engine.config().orders.menu_items {
        println!(
            "  {:<24} ordered {:>2}, served {:>2}",
            dish,
            orders.appearances(dish),
            orders.successes(dish)
        );
    }
    Ok(())
}
