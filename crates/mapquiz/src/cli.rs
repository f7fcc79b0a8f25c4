//! Command-line interface for mapquiz.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Map Quiz - name the highlighted region before the clock runs out
#[derive(Parser, Debug)]
#[command(name = "mapquiz")]
#[command(about = "Geography quiz in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the quiz in the terminal UI
    Play {
        /// Path to the configuration file
        #[arg(short, long, default_value = "mapquiz.toml")]
        config: PathBuf,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,

        /// Map file to play instead of the built-in map
        #[arg(long)]
        map: Option<PathBuf>,

        /// Profile to play as, skipping profile selection
        #[arg(long)]
        profile: Option<String>,
    },

    /// List the regions of a map
    Maps {
        /// Map file to list instead of the built-in map
        #[arg(long)]
        map: Option<PathBuf>,
    },

    /// Show the regions a profile has guessed on a map
    Progress {
        /// Profile name
        #[arg(long)]
        profile: String,

        /// Map file (defaults to the built-in map)
        #[arg(long)]
        map: Option<PathBuf>,

        /// Path to the configuration file
        #[arg(short, long, default_value = "mapquiz.toml")]
        config: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Forget the regions a profile has guessed
    ResetProgress {
        /// Profile name
        #[arg(long)]
        profile: String,

        /// Only reset this map id (all maps when omitted)
        #[arg(long)]
        map: Option<String>,

        /// Path to the configuration file
        #[arg(short, long, default_value = "mapquiz.toml")]
        config: PathBuf,
    },
}
