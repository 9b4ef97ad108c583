//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kbbq - Discord leveling and role-automation bot
#[derive(Parser, Debug)]
#[command(name = "kbbq")]
#[command(about = "Discord leveling and role-automation bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and run the bot
    Run {
        /// Path to the bot configuration TOML file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit logs as JSON lines
        #[arg(long)]
        json_logs: bool,
    },

    /// Apply pending database migrations and exit
    Migrate,
}
