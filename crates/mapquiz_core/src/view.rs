//! The rendering seam between the session and whatever draws the map.

use std::collections::HashMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::{RegionId, RegionStatus};

/// How a region should be painted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Highlight {
    /// Not yet played.
    #[default]
    #[display("neutral")]
    Neutral,
    /// The region of the current round.
    #[display("active")]
    Active,
    /// Guessed correctly.
    #[display("correct")]
    Correct,
    /// Clock ran out.
    #[display("timeout")]
    Timeout,
    /// Attempts used up.
    #[display("failed")]
    Failed,
    /// Skipped for now.
    #[display("skipped")]
    Skipped,
    /// Name revealed.
    #[display("revealed")]
    Revealed,
}

impl Highlight {
    /// Fill colour as an RGB hex string.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Neutral => "#cccccc",
            Self::Active => "#28a745",
            Self::Correct => "#2ecc71",
            Self::Timeout | Self::Revealed => "#f39c12",
            Self::Failed => "#e74c3c",
            Self::Skipped => "#95a5a6",
        }
    }

    /// Fill colour as an RGB triple.
    pub fn rgb(self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }
}

impl From<RegionStatus> for Highlight {
    fn from(status: RegionStatus) -> Self {
        match status {
            RegionStatus::Unresolved => Self::Neutral,
            RegionStatus::Correct => Self::Correct,
            RegionStatus::Timeout => Self::Timeout,
            RegionStatus::Failed => Self::Failed,
            RegionStatus::Skipped => Self::Skipped,
            RegionStatus::Revealed => Self::Revealed,
        }
    }
}

/// Capability the session uses to show progress on the map.
pub trait MapView {
    /// Paints a region.
    fn highlight(&mut self, region: &RegionId, highlight: Highlight);

    /// Writes text over a region, replacing any earlier label.
    fn label(&mut self, region: &RegionId, text: &str);

    /// Removes every label.
    fn clear_labels(&mut self);
}

/// A view that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl MapView for NullView {
    fn highlight(&mut self, _region: &RegionId, _highlight: Highlight) {}

    fn label(&mut self, _region: &RegionId, _text: &str) {}

    fn clear_labels(&mut self) {}
}

/// A view that remembers the latest paint and label of every region.
///
/// Frontends render from it; tests inspect it.
#[derive(Debug, Clone, Default)]
pub struct MapCanvas {
    highlights: HashMap<RegionId, Highlight>,
    labels: HashMap<RegionId, String>,
}

impl MapCanvas {
    /// Creates an empty canvas where every region is neutral.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current paint of a region.
    pub fn highlight_of(&self, region: &RegionId) -> Highlight {
        self.highlights.get(region).copied().unwrap_or_default()
    }

    /// Current label of a region.
    pub fn label_of(&self, region: &RegionId) -> Option<&str> {
        self.labels.get(region).map(String::as_str)
    }

    /// Number of labelled regions.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

impl MapView for MapCanvas {
    fn highlight(&mut self, region: &RegionId, highlight: Highlight) {
        self.highlights.insert(region.clone(), highlight);
    }

    fn label(&mut self, region: &RegionId, text: &str) {
        self.labels.insert(region.clone(), text.to_string());
    }

    fn clear_labels(&mut self) {
        self.labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_and_reveal_share_orange() {
        assert_eq!(Highlight::Timeout.hex(), Highlight::Revealed.hex());
        assert_eq!(Highlight::Timeout.rgb(), (0xf3, 0x9c, 0x12));
    }

    #[test]
    fn test_canvas_defaults_to_neutral() {
        let mut canvas = MapCanvas::new();
        let id = RegionId::new("oyo");
        assert_eq!(canvas.highlight_of(&id), Highlight::Neutral);

        canvas.highlight(&id, Highlight::Active);
        canvas.label(&id, "Oyo");
        assert_eq!(canvas.highlight_of(&id), Highlight::Active);
        assert_eq!(canvas.label_of(&id), Some("Oyo"));

        canvas.clear_labels();
        assert_eq!(canvas.label_of(&id), None);
    }
}
