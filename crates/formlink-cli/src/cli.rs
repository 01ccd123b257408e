//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Formlink - Link Form 471 work items to their establishing Form 470.
#[derive(Debug, Parser)]
#[command(name = "formlink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ~/.formlink/config.toml)
    #[arg(short, long, global = true, env = "FORMLINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log Task Store changes instead of applying them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process the backlog once
    Run,

    /// Poll the backlog until interrupted
    Watch(WatchArgs),

    /// Process a single work item
    Process(ItemArgs),

    /// Create the reference test items in the backlog
    Seed,

    /// Show a work item and its attachments
    Show(ItemArgs),
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Seconds between ticks (overrides configuration)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    pub cycles: Option<usize>,
}

/// Arguments naming one work item.
#[derive(Debug, Parser)]
pub struct ItemArgs {
    /// Task Store id of the work item
    pub id: String,
}
