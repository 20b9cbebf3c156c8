//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::Mood;

/// ParkinVibe - daily exercise and symptom companion
#[derive(Parser)]
#[command(
    name = "pv",
    about = "Daily exercises, symptom diary and triage for people living with Parkinson's",
    version = env!("CARGO_PKG_VERSION"),
    after_help = after_help()
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
    /// Generate today's plan and reveal it step by step
    Plan {
        /// Print the whole plan at once
        #[arg(long)]
        no_reveal: bool,

        /// Save exercise number N (1-based) as a favorite once loaded
        #[arg(short, long, value_name = "N")]
        favorite: Vec<usize>,
    },

    /// Generate a physiotherapy session
    Physio,

    /// Classify symptoms and get advice
    Triage {
        /// Free-text description of the symptoms
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Symptom diary
    Diary {
        #[command(subcommand)]
        command: DiaryCommand,
    },

    /// Saved favorite exercises
    Favorites {
        /// Remove the favorite with this title
        #[arg(long, value_name = "TITLE")]
        remove: Option<String>,
    },

    /// Medication schedule and tremor trend
    Progress {
        /// Number of diary entries in the tremor trend
        #[arg(short = 'n', long, default_value = "7")]
        entries: usize,
    },
}

/// Diary subcommands
#[derive(Debug, Subcommand)]
pub enum DiaryCommand {
    /// Record a new entry
    Add {
        /// How you feel (frown, meh, smile)
        #[arg(short, long, default_value = "smile")]
        mood: Mood,

        /// Tremor intensity from 1 to 10
        #[arg(short, long, default_value = "5")]
        tremor: u8,

        /// What happened today
        #[arg(value_name = "NOTES")]
        notes: String,
    },

    /// Show recent entries, newest first
    List {
        /// Maximum number of entries
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parkinvibe")
        .join("logs")
        .join("parkinvibe.log")
}

fn after_help() -> String {
    format!(
        "Plan, physio and triage need the ANTHROPIC_API_KEY environment variable.\nLogs: {}",
        get_log_path().display()
    )
}
