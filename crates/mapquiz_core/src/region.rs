//! Region identity and resolution status.

use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Stable identifier of a region within a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Creates a region id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One guessable map subdivision.
///
/// Geometry is not part of the region: whatever draws the map keeps its own
/// shapes keyed by [`RegionId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Region {
    /// Identifier, unique within the map.
    id: RegionId,
    /// Canonical name the player has to type.
    display_name: String,
    /// Optional text shown after a correct guess.
    #[serde(default)]
    description: Option<String>,
}

impl Region {
    /// Creates a region without a description.
    pub fn new(id: impl Into<RegionId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: None,
        }
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Resolution status of a region within one session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum RegionStatus {
    /// Not yet played, or reset by a new session.
    #[default]
    #[display("unresolved")]
    Unresolved,
    /// Guessed correctly.
    #[display("correct")]
    Correct,
    /// The round clock ran out.
    #[display("timeout")]
    Timeout,
    /// All attempts were used on wrong guesses.
    #[display("failed")]
    Failed,
    /// Skipped; stays in the candidate pool.
    #[display("skipped")]
    Skipped,
    /// Name revealed on request.
    #[display("revealed")]
    Revealed,
}

impl RegionStatus {
    /// Returns true if a region with this status can still be selected for a round.
    pub fn is_candidate(self) -> bool {
        matches!(self, Self::Unresolved | Self::Skipped)
    }

    /// Returns true if the region is permanently resolved for this session.
    pub fn is_final(self) -> bool {
        !self.is_candidate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_only_unresolved_and_skipped_are_candidates() {
        let candidates: Vec<_> = RegionStatus::iter().filter(|s| s.is_candidate()).collect();
        assert_eq!(candidates, vec![RegionStatus::Unresolved, RegionStatus::Skipped]);
    }

    #[test]
    fn test_region_description_is_optional() {
        let plain = Region::new("kano", "Kano");
        assert!(plain.description().is_none());

        let described = Region::new("kano", "Kano").with_description("Capital: Kano");
        assert_eq!(described.description().as_deref(), Some("Capital: Kano"));
    }
}
