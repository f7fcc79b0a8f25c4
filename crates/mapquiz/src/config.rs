//! Application configuration loaded from TOML.

use std::path::{Path, PathBuf};

use derive_getters::Getters;
use derive_more::{Display, Error};
use mapquiz_core::{Pacing, QuizRules};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "MAPQUIZ_DB_PATH";

/// Settings for a quiz run.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// SQLite database file.
    db_path: String,
    /// Map file to play instead of the built-in map.
    map_path: Option<PathBuf>,
    /// Where the terminal UI writes its log.
    log_file: PathBuf,
    /// Game rules.
    rules: QuizRules,
    /// Pauses between rounds.
    pacing: Pacing,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            db_path: "mapquiz.db".to_string(),
            map_path: None,
            log_file: PathBuf::from("mapquiz.log"),
            rules: QuizRules::default(),
            pacing: Pacing::default(),
        }
    }
}

impl QuizConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(db_path = %config.db_path, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Applies overrides. Command-line values win over the environment,
    /// which wins over the file.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        db_path: Option<String>,
        map_path: Option<PathBuf>,
        env_db_path: Option<String>,
    ) -> Self {
        if let Some(db_path) = db_path.or(env_db_path) {
            debug!(db_path = %db_path, "Database path overridden");
            self.db_path = db_path;
        }
        if let Some(map_path) = map_path {
            debug!(map_path = %map_path.display(), "Map path overridden");
            self.map_path = Some(map_path);
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
