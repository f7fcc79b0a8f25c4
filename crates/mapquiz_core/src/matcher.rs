//! Name normalization and guess matching.
//!
//! Matching is deliberately forgiving about spacing, hyphens, letter case
//! and a trailing (or embedded) "state", so `"Cross-River State"`,
//! `"cross river"` and `"CROSSRIVER"` all compare equal.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::QuizError;

const STRIPPED_WORD: &str = "state";

/// Comparison key produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub struct NameKey(String);

impl NameKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing is left after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalizes a region name or guess into a comparison key.
///
/// Lowercases, drops all whitespace and hyphens, then removes every
/// occurrence of `"state"` until none is left.
#[instrument]
pub fn normalize(raw: &str) -> NameKey {
    let mut key: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    // "stastatete" -> "state" after one pass
    while key.contains(STRIPPED_WORD) {
        key = key.replace(STRIPPED_WORD, "");
    }

    NameKey(key)
}

/// Returns true if both names normalize to the same key.
#[instrument]
pub fn matches(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// A non-empty guess, ready to be compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    text: String,
    key: NameKey,
}

impl Guess {
    /// Parses raw input from the guess field.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::EmptyGuess`] if the input is empty or whitespace only.
    #[instrument]
    pub fn parse(raw: &str) -> Result<Self, QuizError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(QuizError::EmptyGuess);
        }
        Ok(Self {
            text: text.to_string(),
            key: normalize(text),
        })
    }

    /// Returns the trimmed text as typed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the comparison key.
    pub fn key(&self) -> &NameKey {
        &self.key
    }

    /// Returns true if the guess names the given canonical name.
    pub fn is_for(&self, canonical: &str) -> bool {
        self.key == normalize(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_state_spacing_and_hyphens() {
        assert_eq!(normalize("  Lagos State ").as_str(), "lagos");
        assert_eq!(normalize("Akwa-Ibom").as_str(), "akwaibom");
        assert_eq!(normalize("FCT\tAbuja").as_str(), "fctabuja");
    }

    #[test]
    fn test_normalize_removes_reassembled_state() {
        assert_eq!(normalize("stastatete").as_str(), "");
        assert_eq!(normalize("Og stastatete un").as_str(), "ogun");
        assert!(matches("Ogstastateteun", "Ogun"));
        assert_eq!(normalize("sta-te").as_str(), "");
    }

    #[test]
    fn test_guess_rejects_blank_input() {
        assert_eq!(Guess::parse(""), Err(QuizError::EmptyGuess));
        assert_eq!(Guess::parse("   \t"), Err(QuizError::EmptyGuess));
    }

    #[test]
    fn test_guess_keeps_trimmed_text() {
        let guess = Guess::parse("  Cross River ").expect("non-empty guess");
        assert_eq!(guess.text(), "Cross River");
        assert!(guess.is_for("Cross-River State"));
        assert!(!guess.is_for("Rivers"));
    }
}
