//! Map Quiz application library: persistence, maps and the terminal lobby.
//!
//! The game rules live in [`mapquiz_core`]. This crate adds what a playable
//! program needs around them:
//!
//! - **Profiles**: SQLite-backed users, guessed regions and session results
//! - **Maps**: TOML map files and the built-in map, laid out on a tile grid
//! - **Lobby**: a ratatui TUI with profile selection, the quiz and statistics
//!
//! # Example
//!
//! ```no_run
//! use mapquiz::{ProfileService, QuizRepository, load_map};
//!
//! # fn example() -> anyhow::Result<()> {
//! let repo = QuizRepository::new("mapquiz.db".to_string())?;
//! repo.run_migrations()?;
//! let profiles = ProfileService::new(repo);
//!
//! let user = profiles.get_or_create_user("Ada".to_string())?;
//! let quiz_map = load_map(None)?;
//! let progress = profiles.progress(*user.id(), quiz_map.map().id())?;
//! println!("{} regions named so far", progress.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod lobby;
mod maps;
mod profile_service;
mod progress_store;

// Crate-level exports - Configuration
pub use config::{ConfigError, DB_PATH_ENV, QuizConfig};

// Crate-level exports - Database
pub use db::{
    DbError, DbErrorKind, GuessedRegion, MIGRATIONS, NewGuessedRegion, NewSessionResult, NewUser,
    QuizRepository, QuizStats, SessionResult, User,
};

// Crate-level exports - Maps
pub use maps::{
    BUILTIN_MAP_ID, GridCell, GridLayout, MapFile, MapLoadError, QuizMap, RegionEntry, load_map,
    nigeria,
};

// Crate-level exports - Profiles and progress
pub use profile_service::ProfileService;
pub use progress_store::SqliteProgressStore;

// Crate-level exports - Lobby TUI
pub use lobby::{ClockEvent, LobbyController, QuizScreen, RoundClock, Screen, ScreenTransition};
