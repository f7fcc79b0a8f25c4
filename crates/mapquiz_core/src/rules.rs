//! Tunable rules and pacing for a quiz session.

use std::time::Duration;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::RegionStatus;

/// Seconds per round.
pub const ROUND_SECONDS: u32 = 60;
/// Guesses allowed per round before the region is failed.
pub const ATTEMPTS_PER_ROUND: u32 = 3;
/// Skips allowed per session.
pub const MAX_SKIP_USES: u32 = 2;
/// Reveals allowed per session.
pub const MAX_REVEAL_USES: u32 = 2;
/// Final scores below this earn the low-score message.
pub const LOW_SCORE_THRESHOLD: u32 = 10;

/// Game rules. Missing fields in a config file fall back to the defaults above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct QuizRules {
    /// Seconds per round.
    pub round_seconds: u32,
    /// Guesses allowed per round.
    pub attempts_per_round: u32,
    /// Skips allowed per session.
    pub max_skip_uses: u32,
    /// Reveals allowed per session.
    pub max_reveal_uses: u32,
    /// Final scores below this earn the low-score message.
    pub low_score_threshold: u32,
}

impl Default for QuizRules {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,
            attempts_per_round: ATTEMPTS_PER_ROUND,
            max_skip_uses: MAX_SKIP_USES,
            max_reveal_uses: MAX_REVEAL_USES,
            low_score_threshold: LOW_SCORE_THRESHOLD,
        }
    }
}

/// Pause between resolving a round and highlighting the next region,
/// in milliseconds per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct Pacing {
    /// After a correct guess.
    pub correct_ms: u64,
    /// After the last attempt is used up.
    pub failed_ms: u64,
    /// After the clock runs out.
    pub timeout_ms: u64,
    /// After a skip.
    pub skip_ms: u64,
    /// After a reveal.
    pub reveal_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            correct_ms: 900,
            failed_ms: 900,
            timeout_ms: 1000,
            skip_ms: 700,
            reveal_ms: 900,
        }
    }
}

impl Pacing {
    /// No pause at all. Handy for tests and headless runs.
    pub fn immediate() -> Self {
        Self {
            correct_ms: 0,
            failed_ms: 0,
            timeout_ms: 0,
            skip_ms: 0,
            reveal_ms: 0,
        }
    }

    /// Delay before advancing after a round resolves with `status`.
    pub fn delay_after(&self, status: RegionStatus) -> Duration {
        let ms = match status {
            RegionStatus::Correct => self.correct_ms,
            RegionStatus::Failed => self.failed_ms,
            RegionStatus::Timeout => self.timeout_ms,
            RegionStatus::Skipped => self.skip_ms,
            RegionStatus::Revealed => self.reveal_ms,
            RegionStatus::Unresolved => 0,
        };
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_override_single_rule() {
        let rules = QuizRules::default().with_round_seconds(5);
        assert_eq!(rules.round_seconds, 5);
        assert_eq!(rules.attempts_per_round, ATTEMPTS_PER_ROUND);
    }

    #[test]
    fn test_delay_after_outcome() {
        let pacing = Pacing::default();
        assert_eq!(pacing.delay_after(RegionStatus::Timeout), Duration::from_secs(1));
        assert_eq!(pacing.delay_after(RegionStatus::Skipped), Duration::from_millis(700));
        assert_eq!(Pacing::immediate().delay_after(RegionStatus::Correct), Duration::ZERO);
    }
}
