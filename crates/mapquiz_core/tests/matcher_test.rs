//! Tests for guess normalization.

use mapquiz_core::{Guess, QuizError, matches, normalize};
use proptest::prelude::*;

#[test]
fn test_known_equivalences() {
    assert!(matches("Lagos State", "lagos"));
    assert!(matches("Cross River", "crossriver"));
    assert!(matches("Cross-River", "CROSS RIVER"));
    assert!(matches("Akwa Ibom", "akwa-ibom state"));
    assert!(!matches("Kano", "Kogi"));
}

#[test]
fn test_blank_guess_is_rejected_before_matching() {
    assert_eq!(Guess::parse(""), Err(QuizError::EmptyGuess));
    assert_eq!(Guess::parse(" \t "), Err(QuizError::EmptyGuess));
    assert!(Guess::parse("Oyo").is_ok());
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in "[a-zA-Z \\-]{0,24}(state|State|STATE| st|ate){0,3}[a-z ]{0,8}") {
        let once = normalize(&raw);
        let twice = normalize(once.as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalized_key_has_no_separators(raw in "[a-zA-Z \\-]{0,32}") {
        let key = normalize(&raw);
        prop_assert!(!key.as_str().contains(' '));
        prop_assert!(!key.as_str().contains('-'));
        prop_assert!(!key.as_str().contains("state"));
    }

    #[test]
    fn name_matches_its_own_state_form(name in "[A-Z][a-z]{2,10}") {
        let with_suffix = format!("{} State", name);
        prop_assume!(!normalize(&name).is_empty());
        prop_assert!(matches(&name, &with_suffix));
    }
}
