//! CLI argument parsing for planstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "planstore")]
#[command(author, version, about = "Inspect the shared OKR plan database", long_about = None)]
pub struct Cli {
    /// Path to the database file (default: platform data dir)
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current plan
    Show {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List recorded goal inputs, newest first
    History {
        /// Maximum entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Print the database path in use
    Path,
}
