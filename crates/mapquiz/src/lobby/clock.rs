//! Driver-side scheduler for round ticks and deferred advances.

use std::time::{Duration, Instant};

use mapquiz_core::{AdvanceTicket, TimerToken, Transition};
use tracing::{debug, instrument, trace};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A scheduled event that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Deliver a one-second tick for this countdown.
    Tick(TimerToken),
    /// Run the deferred advance with this ticket.
    Advance(AdvanceTicket),
}

#[derive(Debug, Clone, Copy)]
struct Pending<T> {
    id: T,
    due: Instant,
}

/// Holds at most one pending tick and one pending advance.
///
/// Scheduling either kind replaces whatever was pending before. Feed every
/// session [`Transition`] to [`RoundClock::observe`] and call
/// [`RoundClock::poll`] from the event loop.
#[derive(Debug, Clone, Default)]
pub struct RoundClock {
    tick: Option<Pending<TimerToken>>,
    advance: Option<Pending<AdvanceTicket>>,
}

impl RoundClock {
    /// Creates an idle clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the schedule after a session transition.
    #[instrument(skip(self))]
    pub fn observe(&mut self, transition: &Transition, now: Instant) {
        match transition {
            Transition::RoundStarted { timer, .. } => {
                self.advance = None;
                self.tick = Some(Pending {
                    id: *timer,
                    due: now + TICK_INTERVAL,
                });
                debug!(?timer, "Countdown scheduled");
            }
            Transition::Resolved { ticket, delay, .. } => {
                self.tick = None;
                self.advance = Some(Pending {
                    id: *ticket,
                    due: now + *delay,
                });
                debug!(?ticket, ?delay, "Advance scheduled");
            }
            Transition::Completed { .. } => self.cancel_all(),
            Transition::Missed { .. } | Transition::Ticked { .. } | Transition::Ignored => {}
        }
    }

    /// Returns the next event due at `now`, if any.
    ///
    /// A due tick stays scheduled one interval later; it is dropped once the
    /// round resolves or [`RoundClock::cancel_tick`] is called.
    #[instrument(level = "trace", skip(self))]
    pub fn poll(&mut self, now: Instant) -> Option<ClockEvent> {
        if let Some(advance) = self.advance
            && advance.due <= now
        {
            self.advance = None;
            trace!(ticket = ?advance.id, "Advance due");
            return Some(ClockEvent::Advance(advance.id));
        }

        if let Some(tick) = self.tick.as_mut()
            && tick.due <= now
        {
            tick.due += TICK_INTERVAL;
            trace!(token = ?tick.id, "Tick due");
            return Some(ClockEvent::Tick(tick.id));
        }

        None
    }

    /// Drops the pending tick.
    pub fn cancel_tick(&mut self) {
        self.tick = None;
    }

    /// Drops everything pending.
    #[instrument(skip(self))]
    pub fn cancel_all(&mut self) {
        let had_tick = self.tick.take().is_some();
        let had_advance = self.advance.take().is_some();
        debug!(had_tick, had_advance, "Clock cleared");
    }

    /// Returns true if a tick is scheduled.
    pub fn has_pending_tick(&self) -> bool {
        self.tick.is_some()
    }

    /// Returns true if an advance is scheduled.
    pub fn has_pending_advance(&self) -> bool {
        self.advance.is_some()
    }
}
