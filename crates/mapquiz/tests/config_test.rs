//! Tests for configuration loading and overrides.

use std::io::Write;
use std::path::PathBuf;

use mapquiz::QuizConfig;
use mapquiz_core::{Pacing, QuizRules};
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let config = QuizConfig::default();
    assert_eq!(config.db_path(), "mapquiz.db");
    assert!(config.map_path().is_none());
    assert_eq!(*config.rules(), QuizRules::default());
    assert_eq!(*config.pacing(), Pacing::default());
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let config = QuizConfig::from_toml(
        r#"
db_path = "scores.db"

[rules]
round_seconds = 30
max_skip_uses = 5
"#,
    )
    .expect("Parse failed");

    assert_eq!(config.db_path(), "scores.db");
    assert_eq!(config.rules().round_seconds, 30);
    assert_eq!(config.rules().max_skip_uses, 5);
    assert_eq!(config.rules().attempts_per_round, 3);
    assert_eq!(config.rules().low_score_threshold, 10);
    assert_eq!(*config.pacing(), Pacing::default());
}

#[test]
fn test_invalid_toml_is_an_error() {
    let result = QuizConfig::from_toml("rules = 12");
    let err = result.expect_err("Should fail");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "map_path = \"maps/ghana.toml\"").expect("Write failed");
    writeln!(file, "[pacing]\ncorrect_ms = 0").expect("Write failed");

    let config = QuizConfig::from_file(file.path()).expect("Load failed");
    assert_eq!(config.map_path(), &Some(PathBuf::from("maps/ghana.toml")));
    assert_eq!(config.pacing().correct_ms, 0);
    assert_eq!(config.pacing().timeout_ms, Pacing::default().timeout_ms);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config =
        QuizConfig::load_or_default(dir.path().join("absent.toml")).expect("Load failed");
    assert_eq!(config, QuizConfig::default());
}

#[test]
fn test_command_line_beats_environment_beats_file() {
    let file = QuizConfig::from_toml("db_path = \"file.db\"").expect("Parse failed");

    let from_env = file
        .clone()
        .with_overrides(None, None, Some("env.db".to_string()));
    assert_eq!(from_env.db_path(), "env.db");

    let from_cli = file.clone().with_overrides(
        Some("cli.db".to_string()),
        Some(PathBuf::from("custom.toml")),
        Some("env.db".to_string()),
    );
    assert_eq!(from_cli.db_path(), "cli.db");
    assert_eq!(from_cli.map_path(), &Some(PathBuf::from("custom.toml")));

    let untouched = file.clone().with_overrides(None, None, None);
    assert_eq!(untouched, file);
}
