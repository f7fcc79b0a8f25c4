//! State of the round in progress.

use tracing::{debug, instrument};

use crate::{RegionId, TimerToken};

/// The active region, its remaining attempts and the countdown it runs on.
///
/// Only exists while a round is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    index: usize,
    region: RegionId,
    attempts_left: u32,
    timer: TimerToken,
}

impl RoundState {
    /// Opens a round on the region at `index` in map order.
    #[instrument]
    pub(crate) fn new(index: usize, region: RegionId, attempts: u32, timer: TimerToken) -> Self {
        Self {
            index,
            region,
            attempts_left: attempts,
            timer,
        }
    }

    /// Spends one attempt on a wrong guess and returns how many are left.
    #[instrument(skip(self), fields(region = %self.region, attempts_left = self.attempts_left))]
    pub(crate) fn record_miss(&mut self) -> u32 {
        self.attempts_left = self.attempts_left.saturating_sub(1);
        debug!(attempts_left = self.attempts_left, "Attempt spent");
        self.attempts_left
    }

    /// Position of the region in map order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The region being guessed.
    pub fn region(&self) -> &RegionId {
        &self.region
    }

    /// Wrong guesses still allowed.
    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    /// Token of the countdown this round runs on.
    pub fn timer(&self) -> TimerToken {
        self.timer
    }
}
