//! Score keeping and end-of-session classification.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use tracing::{debug, instrument, warn};

/// Correct guesses against the number of regions in play.
///
/// `correct` never exceeds `total` and never goes down within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    correct: u32,
    total: u32,
}

impl ScoreState {
    /// Creates an empty score for a session with `total` regions.
    #[instrument]
    pub fn new(total: u32) -> Self {
        Self { correct: 0, total }
    }

    /// Counts one correct guess.
    #[instrument(skip(self), fields(correct = self.correct, total = self.total))]
    pub fn record_correct(&mut self) {
        if self.correct >= self.total {
            warn!("Correct count already at total; ignoring");
            return;
        }
        self.correct += 1;
        debug!(correct = self.correct, "Correct guess recorded");
    }

    /// Returns the current tally.
    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            correct: self.correct,
            total: self.total,
        }
    }
}

/// Snapshot of a [`ScoreState`] for display and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{}/{}", correct, total)]
pub struct ScoreSummary {
    /// Regions guessed correctly.
    pub correct: u32,
    /// Regions in the session.
    pub total: u32,
}

impl ScoreSummary {
    /// Creates a summary.
    pub fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }
}

/// Which end-of-session message a final score earns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum CompletionTier {
    /// Every region guessed.
    #[display("perfect")]
    Perfect,
    /// Fewer correct guesses than the low-score threshold.
    #[display("low")]
    Low,
    /// Anything in between.
    #[display("standard")]
    Standard,
}

impl CompletionTier {
    /// Classifies a final score. A perfect run wins over a low score, so a
    /// five-region map guessed in full is still perfect.
    #[instrument]
    pub fn classify(summary: ScoreSummary, low_score_threshold: u32) -> Self {
        if summary.correct >= summary.total {
            Self::Perfect
        } else if summary.correct < low_score_threshold {
            Self::Low
        } else {
            Self::Standard
        }
    }

    /// Message shown when the session completes.
    pub fn message(self, summary: ScoreSummary) -> String {
        match self {
            Self::Perfect => "Congratulations! You guessed all the regions right!".to_string(),
            Self::Low => format!(
                "{}, your score is very low. Try harder next time!",
                summary.correct
            ),
            Self::Standard => format!(
                "You finished all the regions! You got {} / {}",
                summary.correct, summary.total
            ),
        }
    }

    /// Parses the name produced by `Display`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "perfect" => Some(Self::Perfect),
            "low" => Some(Self::Low),
            "standard" => Some(Self::Standard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_record_correct_caps_at_total() {
        let mut score = ScoreState::new(2);
        score.record_correct();
        score.record_correct();
        score.record_correct();
        assert_eq!(score.summary(), ScoreSummary::new(2, 2));
    }

    #[test]
    fn test_summary_display() {
        assert_eq!(ScoreSummary::new(7, 36).to_string(), "7/36");
    }

    #[test]
    fn test_tier_names_parse_back() {
        for tier in CompletionTier::iter() {
            assert_eq!(CompletionTier::from_name(&tier.to_string()), Some(tier));
        }
        assert_eq!(CompletionTier::from_name("legendary"), None);
    }
}
