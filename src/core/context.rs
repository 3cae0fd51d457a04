use super::event::Event;
use super::types::Millis;
use crate::telemetry::TelemetrySink;
use chrono::{DateTime, Local};

/// State of the current play session.
///
/// Replaces a process-wide "game over" flag: the value is owned by the
/// [`crate::KitchenEngine`] and lent to every `tick`/`update` call through a
/// [`TickContext`].
#[derive(Debug, Clone)]
pub struct SessionState {
    id: u64,
    started_at: Millis,
    wall_start: DateTime<Local>,
    over: bool,
}

impl SessionState {
    pub fn new(id: u64, started_at: Millis) -> Self {
        Self {
            id,
            started_at,
            wall_start: Local::now(),
            over: false,
        }
    }

    /// Session that follows this one, starting at `now`.
    pub fn next(&self, now: Millis) -> Self {
        Self::new(self.id + 1, now)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn started_at(&self) -> Millis {
        self.started_at
    }

    pub fn wall_start(&self) -> DateTime<Local> {
        self.wall_start
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn mark_over(&mut self) {
        self.over = true;
    }

    pub fn elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.started_at)
    }
}

/// Everything a component may consult or emit to during one call.
pub struct TickContext<'a> {
    pub now: Millis,
    pub session: &'a SessionState,
    telemetry: &'a mut dyn TelemetrySink,
}

impl<'a> TickContext<'a> {
    pub fn new(now: Millis, session: &'a SessionState, telemetry: &'a mut dyn TelemetrySink) -> Self {
        Self {
            now,
            session,
            telemetry,
        }
    }

    pub fn session_id(&self) -> u64 {
        self.session.id()
    }

    pub fn is_session_over(&self) -> bool {
        self.session.is_over()
    }

    /// Milliseconds since `since`, never negative.
    pub fn elapsed_since(&self, since: Millis) -> Millis {
        self.now.saturating_sub(since)
    }

    pub fn emit(&mut self, event: Box<dyn Event>) {
        self.telemetry.record(event.as_ref());
    }
}
