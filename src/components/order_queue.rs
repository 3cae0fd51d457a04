//! Rotating queue of time-limited customer orders and the session score.

use crate::components::composition::Composition;
use crate::config::OrderConfig;
use crate::core::context::TickContext;
use crate::core::types::{ComponentId, Millis};
use crate::telemetry::csv_log::TIMESTAMP_FORMAT;
use crate::telemetry::events::{
    mistake_kind, EventHeader, MistakeEvent, OrderCompletedEvent, OrderExpiredEvent,
    OrderPlacedEvent, SessionEndEvent,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution};
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub name: String,
    pub start_time: Millis,
    pub duration: Millis,
}

impl Order {
    pub fn elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.start_time)
    }

    /// Time left before expiry; negative once overdue.
    pub fn remaining_ms(&self, now: Millis) -> i64 {
        self.duration as i64 - self.elapsed(now) as i64
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        self.elapsed(now) >= self.duration
    }
}

/// Read-only view of a pending order for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub name: String,
    pub remaining_ms: Millis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparationRecord {
    pub dish: String,
    pub seconds: f64,
    pub served_at: Millis,
}

/// Per-menu-item tallies kept in menu order.
#[derive(Debug, Clone)]
struct DishCounters {
    appeared: Vec<u32>,
    served: Vec<u32>,
}

impl DishCounters {
    fn new(len: usize) -> Self {
        Self {
            appeared: vec![0; len],
            served: vec![0; len],
        }
    }
}

pub struct OrderQueue {
    component_id: ComponentId,
    config: OrderConfig,
    orders: VecDeque<Order>,
    score: i64,
    counters: DishCounters,
    mistakes: u32,
    preparation_times: Vec<PreparationRecord>,
    rng: StdRng,
    spawn: Bernoulli,
}

impl OrderQueue {
    pub fn new(component_id: ComponentId, config: OrderConfig, seed: Option<u64>) -> Result<Self, String> {
        let spawn = Bernoulli::new(config.spawn_probability)
            .map_err(|e| format!("Invalid spawn probability {}: {}", config.spawn_probability, e))?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let counters = DishCounters::new(config.menu_items.len());
        Ok(Self {
            component_id,
            config,
            orders: VecDeque::new(),
            score: 0,
            counters,
            mistakes: 0,
            preparation_times: Vec::new(),
            rng,
            spawn,
        })
    }

    fn menu_index(&self, dish: &str) -> Option<usize> {
        self.config.menu_items.iter().position(|item| item == dish)
    }

    /// Expires overdue orders from the head, then maybe places a new one.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        while self
            .orders
            .front()
            .is_some_and(|order| order.is_expired(ctx.now))
        {
            let Some(order) = self.orders.pop_front() else {
                break;
            };
            self.expire(order, ctx);
        }

        if self.orders.len() < self.config.max_orders
            && !self.config.menu_items.is_empty()
            && self.spawn.sample(&mut self.rng)
        {
            let index = self.rng.gen_range(0..self.config.menu_items.len());
            let dish = self.config.menu_items[index].clone();
            self.add_order(&dish, ctx);
        }
    }

    fn expire(&mut self, order: Order, ctx: &mut TickContext<'_>) {
        let penalty = if ctx.is_session_over() {
            0
        } else {
            self.config.expiry_penalty
        };
        self.score -= penalty;
        warn!(
            "[OrderQueue {}] order {} for {} expired, -{} (score {})",
            self.component_id, order.id, order.name, penalty, self.score
        );
        let header = EventHeader::new("order_expired", &self.component_id, ctx.session_id(), ctx.now);
        ctx.emit(Box::new(OrderExpiredEvent {
            header,
            order_id: order.id,
            dish: order.name,
            penalty,
        }));
    }

    /// Appends an order for `dish`. Refused when the queue is full or the dish
    /// is not on the menu.
    pub fn add_order(&mut self, dish: &str, ctx: &mut TickContext<'_>) -> bool {
        if self.orders.len() >= self.config.max_orders {
            return false;
        }
        let Some(index) = self.menu_index(dish) else {
            warn!("[OrderQueue {}] {} is not on the menu", self.component_id, dish);
            return false;
        };
        self.counters.appeared[index] += 1;

        let order = Order {
            id: format!("order_{}", Uuid::new_v4()),
            name: dish.to_string(),
            start_time: ctx.now,
            duration: self.config.order_duration_ms,
        };
        info!(
            "[OrderQueue {}] placed order {} for {} ({} pending)",
            self.component_id,
            order.id,
            order.name,
            self.orders.len() + 1
        );
        let header = EventHeader::new("order_placed", &self.component_id, ctx.session_id(), ctx.now);
        ctx.emit(Box::new(OrderPlacedEvent {
            header,
            order_id: order.id.clone(),
            dish: order.name.clone(),
        }));
        self.orders.push_back(order);
        true
    }

    /// Matches a plate against the oldest pending order for the same dish and
    /// returns the points awarded. The dish is the first menu item found on
    /// the plate in placement order.
    pub fn serve_dish(&mut self, plate: &Composition, ctx: &mut TickContext<'_>) -> u32 {
        if self.orders.is_empty() {
            self.log_mistake(mistake_kind::NO_ORDERS, "No orders available", ctx);
            return 0;
        }

        let prepared = plate
            .ingredients()
            .iter()
            .map(|ingredient| ingredient.tag())
            .find(|tag| self.menu_index(tag).is_some());
        let Some(prepared) = prepared else {
            self.log_mistake(mistake_kind::WRONG_DISH, "No valid menu item on plate", ctx);
            return 0;
        };

        let Some(position) = self.orders.iter().position(|order| order.name == prepared) else {
            self.log_mistake(mistake_kind::WRONG_DISH, format!("served: {}", prepared), ctx);
            return 0;
        };
        let Some(order) = self.orders.remove(position) else {
            return 0;
        };

        let elapsed = order.elapsed(ctx.now);
        let time_bonus = (order.remaining_ms(ctx.now).max(0) / 1000) as u32;
        let points = self.config.base_points + time_bonus;
        self.score += points as i64;
        if let Some(index) = self.menu_index(&prepared) {
            self.counters.served[index] += 1;
        }

        let seconds = elapsed as f64 / 1000.0;
        self.preparation_times.push(PreparationRecord {
            dish: prepared.clone(),
            seconds,
            served_at: ctx.now,
        });
        info!(
            "[OrderQueue {}] served {} for order {} in {:.1}s: +{} (score {})",
            self.component_id, prepared, order.id, seconds, points, self.score
        );

        let header = EventHeader::new("order_completed", &self.component_id, ctx.session_id(), ctx.now);
        ctx.emit(Box::new(OrderCompletedEvent {
            header,
            order_id: order.id,
            dish: prepared,
            preparation_seconds: seconds,
            points,
        }));
        points
    }

    pub fn log_mistake(&mut self, kind: &str, info: impl Into<String>, ctx: &mut TickContext<'_>) {
        self.mistakes += 1;
        let info = info.into();
        debug!("[OrderQueue {}] mistake {}: {}", self.component_id, kind, info);
        let header = EventHeader::new("mistake", &self.component_id, ctx.session_id(), ctx.now);
        ctx.emit(Box::new(MistakeEvent::new(header, kind, info)));
    }

    /// Emits the session summary: final score and successes per dish.
    pub fn end_session(&mut self, ctx: &mut TickContext<'_>) {
        let successes: Vec<(String, u32)> = self
            .config
            .menu_items
            .iter()
            .cloned()
            .zip(self.counters.served.iter().copied())
            .collect();
        info!(
            "[OrderQueue {}] session {} ended with score {} after {} mistakes",
            self.component_id,
            ctx.session_id(),
            self.score,
            self.mistakes
        );
        let header = EventHeader::new("session_end", &self.component_id, ctx.session_id(), ctx.now);
        ctx.emit(Box::new(SessionEndEvent {
            header,
            session_start: ctx.session.wall_start().format(TIMESTAMP_FORMAT).to_string(),
            total_score: self.score,
            successes,
        }));
    }

    pub fn reset(&mut self) {
        self.orders.clear();
        self.score = 0;
        self.counters = DishCounters::new(self.config.menu_items.len());
        self.mistakes = 0;
        self.preparation_times.clear();
        debug!("[OrderQueue {}] reset", self.component_id);
    }

    pub fn pending(&self, now: Millis) -> Vec<OrderView> {
        self.orders
            .iter()
            .map(|order| OrderView {
                name: order.name.clone(),
                remaining_ms: order.remaining_ms(now).max(0) as Millis,
            })
            .collect()
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn successes(&self, dish: &str) -> u32 {
        self.menu_index(dish).map(|i| self.counters.served[i]).unwrap_or(0)
    }

    pub fn appearances(&self, dish: &str) -> u32 {
        self.menu_index(dish).map(|i| self.counters.appeared[i]).unwrap_or(0)
    }

    pub fn preparation_times(&self) -> &[PreparationRecord] {
        &self.preparation_times
    }

    pub fn component_id(&self) -> &ComponentId {
        &self.component_id
    }
}
