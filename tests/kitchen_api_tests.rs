use kitchen_rush::components::inventory::Actor;
use kitchen_rush::config::InventoryConfig;
use kitchen_rush::telemetry::{INGREDIENT_USAGE_EVENT, MISTAKE_EVENT, ORDER_COMPLETED_EVENT};
use kitchen_rush::{
    Composition, Direction, Ingredient, Inventory, KitchenConfig, KitchenEngine, MemorySink,
    Position, SessionState, Station, StationKind, TickContext,
};

/// Chef standing right next to the fridge.
struct Chef {
    position: Position,
}

impl Actor for Chef {
    fn position(&self) -> Position {
        self.position
    }

    fn resync_movement(&mut self) {}
}

fn quiet_config() -> KitchenConfig {
    KitchenConfig::new()
        .with_spawn_probability(0.0)
        .with_random_seed(Some(11))
}

fn fridge_with(stock: &[(&str, u32)]) -> Inventory {
    let config = InventoryConfig {
        starting_stock: stock.iter().map(|(tag, q)| (tag.to_string(), *q)).collect(),
        ..InventoryConfig::default()
    };
    Inventory::new("fridge".to_string(), Position::new(0, 0), &config)
}

fn at_origin(tag: &str) -> Ingredient {
    Ingredient::from_tag(tag, Position::new(0, 0))
}

#[test]
fn test_unknown_kind_never_changes_on_a_station() {
    let session = SessionState::new(1, 0);
    let mut sink = MemorySink::new();
    let mut pan = Station::pan("pan".to_string(), Position::new(0, 0));
    pan.place(at_origin("leek"), 0).unwrap();

    for now in [0, 1, 8_000, 1_000_000] {
        let ctx = TickContext::new(now, &session, &mut sink);
        assert_eq!(pan.tick(&ctx), 0);
    }
    assert_eq!(pan.slots()[0].ingredient.tag(), "leek");
    assert!(pan.take_ready().is_none());
}

#[test]
fn test_transformed_slot_is_a_fixed_point() {
    let session = SessionState::new(1, 0);
    let mut sink = MemorySink::new();
    let mut pan = Station::pan("pan".to_string(), Position::new(0, 0));
    pan.place(at_origin("chicken"), 0).unwrap();

    let ctx = TickContext::new(8_000, &session, &mut sink);
    assert_eq!(pan.tick(&ctx), 1);
    for now in [8_001, 16_000, 100_000] {
        let ctx = TickContext::new(now, &session, &mut sink);
        assert_eq!(pan.tick(&ctx), 0);
    }
    assert_eq!(pan.take_ready().map(|i| i.tag()), Some("chicken fried".to_string()));
}

#[test]
fn test_take_from_empty_inventory_changes_nothing() {
    let session = SessionState::new(1, 0);
    let mut sink = MemorySink::new();
    let mut fridge = fridge_with(&[]);
    let mut chef = Chef { position: Position::new(5, 5) };
    fridge.toggle(&mut chef);

    let mut ctx = TickContext::new(0, &session, &mut sink);
    assert!(fridge.take(&mut ctx).is_none());
    assert!(fridge.is_empty());
    assert_eq!(fridge.cursor(), 0);
    assert_eq!(sink.count(INGREDIENT_USAGE_EVENT), 0);
}

#[test]
fn test_put_then_take_is_net_zero() {
    let session = SessionState::new(1, 0);
    let mut sink = MemorySink::new();
    let mut fridge = fridge_with(&[("egg", 2), ("fish", 1)]);
    let mut chef = Chef { position: Position::new(5, 5) };
    fridge.toggle(&mut chef);
    let before = fridge.snapshot();

    let mut ctx = TickContext::new(0, &session, &mut sink);
    fridge.put(at_origin("fish"), &mut ctx).unwrap();
    fridge.move_selection(Direction::Right);
    let taken = fridge.take(&mut ctx).unwrap();

    assert_eq!(taken.tag(), "fish");
    assert_eq!(fridge.snapshot(), before);
}

#[test]
fn test_sixth_add_is_refused() {
    let mut plate = Composition::new(Position::new(0, 0), 5, Vec::new());
    let tags = ["leek", "egg fried", "fish fried", "leek", "bread sliced"];
    for tag in tags {
        assert!(plate.add(at_origin(tag)));
    }
    assert!(!plate.add(at_origin("pork fried")));
    assert_eq!(plate.tags(), tags.map(String::from).to_vec());
}

#[test]
fn test_sandwich_collapses_in_any_order() {
    let orders = [
        ["bread sliced", "cheese sliced", "lettuce sliced", "tomato sliced"],
        ["tomato sliced", "lettuce sliced", "cheese sliced", "bread sliced"],
        ["cheese sliced", "bread sliced", "tomato sliced", "lettuce sliced"],
    ];
    for order in orders {
        let mut plate = Composition::new(
            Position::new(40, 40),
            5,
            vec![kitchen_rush::components::Recipe::sandwich()],
        );
        for (i, tag) in order.iter().enumerate() {
            plate.add(at_origin(tag));
            if i < 3 {
                assert_eq!(plate.len(), i + 1);
            }
        }
        assert_eq!(plate.tags(), vec!["sandwich".to_string()]);
        assert_eq!(plate.ingredients()[0].position(), Position::new(40, 40));
    }
}

#[test]
fn test_serving_matches_oldest_order_first() {
    let mut engine = KitchenEngine::new(quiet_config(), MemorySink::new(), 1, 0).unwrap();
    engine.place_order("sandwich", 0);
    engine.place_order("egg fried", 1_000);
    engine.place_order("sandwich", 2_000);

    let mut plate = Composition::new(Position::new(0, 0), 5, Vec::new());
    plate.add(at_origin("sandwich"));
    engine.submit_plate(plate).unwrap();
    engine.tick(3_000);

    let pending: Vec<String> = engine.pending_orders(3_000).into_iter().map(|o| o.name).collect();
    assert_eq!(pending, vec!["egg fried".to_string(), "sandwich".to_string()]);
    let remaining: Vec<u64> = engine.pending_orders(3_000).iter().map(|o| o.remaining_ms).collect();
    assert_eq!(remaining, vec![58_000, 59_000]);
}

#[test]
fn test_score_includes_whole_seconds_left() {
    let mut engine = KitchenEngine::new(quiet_config(), MemorySink::new(), 1, 0).unwrap();
    engine.place_order("pork fried", 0);

    let mut plate = Composition::new(Position::new(0, 0), 5, Vec::new());
    plate.add(at_origin("pork fried"));
    engine.submit_plate(plate).unwrap();
    let summary = engine.tick(47_500);

    assert_eq!(summary.served.map(|fb| fb.points), Some(22));
    assert_eq!(engine.score(), 22);
    assert_eq!(engine.telemetry().count(ORDER_COMPLETED_EVENT), 1);
}

#[test]
fn test_expiry_costs_five_points_once() {
    let mut engine = KitchenEngine::new(quiet_config(), MemorySink::new(), 1, 0).unwrap();
    engine.place_order("lamb fried", 0);

    engine.tick(59_999);
    assert_eq!(engine.score(), 0);
    engine.tick(60_000);
    assert_eq!(engine.score(), -5);
    engine.tick(60_500);
    engine.tick(120_000);
    assert_eq!(engine.score(), -5);
    assert!(engine.orders().is_empty());
}

#[test]
fn test_egg_from_fridge_to_pan() {
    let config = quiet_config().with_starting_stock(vec![("egg".to_string(), 1)]);
    let mut engine = KitchenEngine::new(config, MemorySink::new(), 1, 0).unwrap();
    let mut chef = Chef { position: Position::new(60, 60) };
    assert!(engine.toggle_inventory(&mut chef));

    let egg = engine.take_from_inventory(100).unwrap();
    assert_eq!(egg.tag(), "egg");
    assert!(engine.inventory().snapshot().is_empty());

    let pan = engine.find_station(StationKind::Pan).unwrap();
    engine.place_on_station(pan, egg, 100).unwrap();
    assert!(engine.station(pan).unwrap().is_ready_to_pick());

    engine.tick(101);
    let fried = engine.take_from_station(pan).unwrap();
    assert_eq!(fried.tag(), "egg fried");
}

#[test]
fn test_full_shift_round_trip() {
    let mut engine = KitchenEngine::new(quiet_config(), MemorySink::new(), 4, 0).unwrap();
    let mut chef = Chef { position: Position::new(60, 60) };
    engine.toggle_inventory(&mut chef);
    engine.place_order("sandwich", 0);

    let board = engine.find_station(StationKind::CuttingBoard).unwrap();
    for tag in ["bread", "cheese", "lettuce", "tomato"] {
        while engine.inventory().selected().map(|k| k.tag()) != Some(tag.to_string()) {
            engine.move_selection(Direction::Right);
        }
        let raw = engine.take_from_inventory(1_000).unwrap();
        engine.place_on_station(board, raw, 1_000).unwrap();
    }
    engine.tick(1_001);
    while let Some(sliced) = engine.take_from_station(board) {
        engine.add_to_plate(sliced).unwrap();
    }
    assert_eq!(engine.plate().tags(), vec!["sandwich".to_string()]);

    let plate = engine.pick_up_plate().unwrap();
    assert!(engine.plate().is_empty());
    engine.submit_plate(plate).unwrap();
    let summary = engine.tick(10_000);

    assert_eq!(summary.served.map(|fb| fb.points), Some(60));
    assert!(engine.serving().feedback_visible(10_500));
    assert_eq!(engine.telemetry().count(INGREDIENT_USAGE_EVENT), 4);
    assert_eq!(engine.telemetry().count(MISTAKE_EVENT), 0);
    assert!(engine
        .telemetry()
        .events()
        .iter()
        .all(|event| event.session_id() == 4));
}
