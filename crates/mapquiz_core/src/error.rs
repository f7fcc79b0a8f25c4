//! Error types for rejected quiz actions.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Which per-session allowance an action draws from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum BudgetKind {
    /// Skipping the active region (it comes back later).
    #[display("skip")]
    Skip,
    /// Revealing the active region's name.
    #[display("reveal")]
    Reveal,
}

/// Error returned when a quiz action is rejected.
///
/// A rejected action never mutates the session: budgets, attempts, statuses
/// and the timer are exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum QuizError {
    /// The guess was empty or whitespace only.
    #[display("Type a region name first.")]
    EmptyGuess,

    /// The skip or reveal allowance for this session is used up.
    #[display("You've used all your {}s!", _0)]
    BudgetExhausted(#[error(not(source))] BudgetKind),

    /// The map has no regions, so a session cannot start.
    #[display("Map '{}' has no regions to play", _0)]
    MapMissing(#[error(not(source))] String),
}

impl QuizError {
    /// Returns true if the error should block the player until acknowledged.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::MapMissing(_))
    }
}
