//! Cancellable one-second countdown for a single round.
//!
//! Every [`RoundTimer::start`] hands out a fresh [`TimerToken`]. Ticks must
//! present the token of the countdown they belong to; a tick scheduled for an
//! earlier round carries an old token and is rejected as [`TimerTick::Stale`].
//! Starting or stopping the timer therefore cancels every outstanding tick
//! without the caller having to track them.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Identifies one countdown started by a [`RoundTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

/// Result of delivering a tick to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// The countdown is still running.
    Running {
        /// Seconds left after this tick.
        remaining: u32,
    },
    /// This tick brought the countdown to zero. Reported once per countdown.
    Expired,
    /// The token does not belong to the live countdown; nothing changed.
    Stale,
}

/// Countdown clock with one-second granularity.
#[derive(Debug, Clone, Default)]
pub struct RoundTimer {
    generation: u64,
    live: Option<TimerToken>,
    remaining: u32,
}

impl RoundTimer {
    /// Creates a stopped timer showing `00:00`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new countdown, cancelling any countdown already running.
    #[instrument(skip(self))]
    pub fn start(&mut self, duration_secs: u32) -> TimerToken {
        self.stop();
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.live = Some(token);
        self.remaining = duration_secs;
        debug!(?token, duration_secs, "Countdown started");
        token
    }

    /// Advances the countdown by one second.
    #[instrument(skip(self))]
    pub fn tick(&mut self, token: TimerToken) -> TimerTick {
        if self.live != Some(token) {
            trace!(?token, live = ?self.live, "Ignoring tick for stale countdown");
            return TimerTick::Stale;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.live = None;
            debug!(?token, "Countdown expired");
            TimerTick::Expired
        } else {
            TimerTick::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Cancels the live countdown. Returns false if nothing was running.
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> bool {
        match self.live.take() {
            Some(token) => {
                debug!(?token, remaining = self.remaining, "Countdown stopped");
                true
            }
            None => false,
        }
    }

    /// Returns true while a countdown is live.
    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    /// Returns the token of the live countdown, if any.
    pub fn token(&self) -> Option<TimerToken> {
        self.live
    }

    /// Seconds left on the clock. Keeps its last value after stopping.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Formats the remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }
}

/// Formats a number of seconds as `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(605), "10:05");
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = RoundTimer::new();
        assert!(!timer.stop());
        timer.start(5);
        assert!(timer.stop());
        assert!(!timer.stop());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_zero_duration_expires_on_first_tick() {
        let mut timer = RoundTimer::new();
        let token = timer.start(0);
        assert_eq!(timer.tick(token), TimerTick::Expired);
        assert_eq!(timer.tick(token), TimerTick::Stale);
    }
}
