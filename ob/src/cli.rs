//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::TaskStatus;

/// okrboard - turn weekly and overall goals into an OKR plan
#[derive(Parser)]
#[command(
    name = "okr",
    about = "Break goals into objectives and tasks with an LLM and track them",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a new plan from goals and store it
    Plan {
        /// This week's goals
        #[arg(short, long, default_value = "")]
        weekly: String,

        /// Longer-term goals
        #[arg(short, long, default_value = "")]
        overall: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the stored plan
    Show {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Update one task's status or content
    Task {
        /// Task ID
        id: String,

        /// New status (todo, in_progress, done)
        #[arg(short, long, value_parser = parse_status)]
        status: Option<TaskStatus>,

        /// New content
        #[arg(long)]
        content: Option<String>,
    },

    /// Show the most recently submitted goals
    Input {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the resolved configuration
    Config,
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    debug!(%s, "parse_status: called");
    TaskStatus::parse(s).ok_or_else(|| format!("Unknown status: {}. Use: todo, in_progress, or done", s))
}

/// Output format for commands that print data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
