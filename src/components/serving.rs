//! Counter where finished plates wait to be checked against the orders.

use crate::components::composition::Composition;
use crate::components::order_queue::OrderQueue;
use crate::config::ServingConfig;
use crate::core::context::TickContext;
use crate::core::types::{ComponentId, Millis, Position};
use log::{debug, info, warn};
use std::collections::VecDeque;

/// Outcome of the most recent serve, for the host's feedback banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServeFeedback {
    pub success: bool,
    pub points: u32,
    pub at: Millis,
}

pub struct ServingCounter {
    component_id: ComponentId,
    position: Position,
    config: ServingConfig,
    plates: VecDeque<Composition>,
    pending: bool,
    last_feedback: Option<ServeFeedback>,
}

impl ServingCounter {
    pub fn new(component_id: ComponentId, position: Position, config: ServingConfig) -> Self {
        Self {
            component_id,
            position,
            config,
            plates: VecDeque::new(),
            pending: false,
            last_feedback: None,
        }
    }

    /// Queues a plate for serving. The plate is handed back when the counter
    /// already holds more than `max_queued` plates.
    pub fn submit(&mut self, mut plate: Composition) -> Result<(), Composition> {
        if self.plates.len() > self.config.max_queued {
            warn!(
                "[ServingCounter {}] counter full ({} plates), submit refused",
                self.component_id,
                self.plates.len()
            );
            return Err(plate);
        }

        let offset = self.config.plate_spacing * self.plates.len() as i32;
        plate.set_position(self.position.offset(offset, 10));
        debug!(
            "[ServingCounter {}] plate with {:?} submitted at {}",
            self.component_id,
            plate.tags(),
            plate.position()
        );
        self.plates.push_back(plate);
        self.pending = true;
        Ok(())
    }

    /// Serves the oldest plate if a submission is waiting. At most one plate
    /// leaves the counter per submission.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>, orders: &mut OrderQueue) -> Option<ServeFeedback> {
        if !self.pending {
            return None;
        }
        self.pending = false;

        let plate = self.plates.pop_front()?;
        let points = orders.serve_dish(&plate, ctx);
        let feedback = ServeFeedback {
            success: points > 0,
            points,
            at: ctx.now,
        };
        info!(
            "[ServingCounter {}] served {:?}: {} points",
            self.component_id,
            plate.tags(),
            points
        );
        self.last_feedback = Some(feedback);
        Some(feedback)
    }

    pub fn last_feedback(&self) -> Option<ServeFeedback> {
        self.last_feedback
    }

    /// Whether the last feedback is still inside its display window.
    pub fn feedback_visible(&self, now: Millis) -> bool {
        self.last_feedback
            .is_some_and(|fb| now.saturating_sub(fb.at) < self.config.feedback_window_ms)
    }

    pub fn reset(&mut self) {
        self.plates.clear();
        self.pending = false;
        self.last_feedback = None;
    }

    pub fn plates(&self) -> impl Iterator<Item = &Composition> {
        self.plates.iter()
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn component_id(&self) -> &ComponentId {
        &self.component_id
    }
}
