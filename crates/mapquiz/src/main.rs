//! Map Quiz - CLI entry point
//!
//! Plays the quiz in the terminal and inspects saved progress.

#![warn(missing_docs)]

mod cli;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mapquiz::{
    DB_PATH_ENV, LobbyController, ProfileService, QuizConfig, QuizMap, QuizRepository, load_map,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Serialize;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            db_path,
            map,
            profile,
        } => run_play(config, db_path, map, profile).await,
        Command::Maps { map } => run_maps(map),
        Command::Progress {
            profile,
            map,
            config,
            json,
        } => run_progress(profile, map, config, json),
        Command::ResetProgress {
            profile,
            map,
            config,
        } => run_reset_progress(profile, map, config),
    }
}

/// Logs to stderr so stdout stays clean for command output.
fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

/// Loads the config file and applies command-line and environment overrides.
fn load_config(path: &Path, db_path: Option<String>, map: Option<PathBuf>) -> Result<QuizConfig> {
    let config = QuizConfig::load_or_default(path)?.with_overrides(
        db_path,
        map,
        std::env::var(DB_PATH_ENV).ok(),
    );
    Ok(config)
}

/// Opens the database and brings its schema up to date.
fn open_profiles(config: &QuizConfig) -> Result<ProfileService> {
    let repo = QuizRepository::new(config.db_path().clone())?;
    repo.run_migrations()?;
    Ok(ProfileService::new(repo))
}

/// Run the quiz TUI
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_play(
    config_path: PathBuf,
    db_path: Option<String>,
    map: Option<PathBuf>,
    profile: Option<String>,
) -> Result<()> {
    let config = load_config(&config_path, db_path, map)?;

    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mapquiz=debug,mapquiz_core=debug")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(db_path = %config.db_path(), "Starting Map Quiz");

    let profile_service = open_profiles(&config)?;
    let quiz_map = load_map(config.map_path().as_deref())?;

    let mut controller = LobbyController::new(profile_service.clone(), quiz_map, config);
    if let Some(name) = profile {
        let user = profile_service.get_or_create_user(name)?;
        controller = controller.with_user(user);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = controller.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Lobby loop error");
    }
    info!("Map Quiz exited");
    res
}

/// List the regions of a map
fn run_maps(map: Option<PathBuf>) -> Result<()> {
    init_stderr_logging();

    let quiz_map = load_map(map.as_deref())?;
    let region_map = quiz_map.map();
    println!(
        "{} ({}) - {} regions",
        region_map.title(),
        region_map.id(),
        region_map.len()
    );
    for region in region_map.regions() {
        match region.description() {
            Some(description) => {
                println!("  {:<16} {:<28} {}", region.id().as_str(), region.display_name(), description)
            }
            None => println!("  {:<16} {}", region.id().as_str(), region.display_name()),
        }
    }
    Ok(())
}

/// Saved progress of one profile on one map.
#[derive(Debug, Serialize)]
struct ProgressReport {
    profile: String,
    map_id: String,
    total_regions: usize,
    guessed: Vec<String>,
    remaining: Vec<String>,
}

impl ProgressReport {
    fn new(profile: String, quiz_map: &QuizMap, guessed: &mapquiz_core::PersistedProgress) -> Self {
        let region_map = quiz_map.map();
        let (guessed, remaining): (Vec<String>, Vec<String>) = region_map
            .regions()
            .iter()
            .map(|region| region.display_name().clone())
            .partition(|name| guessed.contains(name));
        Self {
            profile,
            map_id: region_map.id().to_string(),
            total_regions: region_map.len(),
            guessed,
            remaining,
        }
    }
}

/// Show the regions a profile has guessed
fn run_progress(profile: String, map: Option<PathBuf>, config_path: PathBuf, json: bool) -> Result<()> {
    init_stderr_logging();

    let config = load_config(&config_path, None, map)?;
    let profile_service = open_profiles(&config)?;
    let quiz_map = load_map(config.map_path().as_deref())?;

    let Some(user) = profile_service.repository().get_user_by_name(&profile)? else {
        anyhow::bail!("No profile named '{}'", profile);
    };

    let progress = profile_service.progress(*user.id(), quiz_map.map().id())?;
    let report = ProgressReport::new(user.display_name().clone(), &quiz_map, &progress);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} on {}: {}/{} regions named",
        report.profile,
        report.map_id,
        report.guessed.len(),
        report.total_regions
    );
    for name in &report.guessed {
        println!("  + {}", name);
    }
    for name in &report.remaining {
        println!("  - {}", name);
    }
    Ok(())
}

/// Forget the regions a profile has guessed
fn run_reset_progress(profile: String, map: Option<String>, config_path: PathBuf) -> Result<()> {
    init_stderr_logging();

    let config = load_config(&config_path, None, None)?;
    let profile_service = open_profiles(&config)?;

    let Some(user) = profile_service.repository().get_user_by_name(&profile)? else {
        anyhow::bail!("No profile named '{}'", profile);
    };

    let removed = profile_service.reset_progress(*user.id(), map.as_deref())?;
    match map {
        Some(map_id) => println!("Forgot {} regions for {} on {}", removed, profile, map_id),
        None => println!("Forgot {} regions for {} on all maps", removed, profile),
    }
    Ok(())
}
