//! CLI command definitions.

pub mod budgets;
pub mod collaborators;
mod dispatch;
pub mod entries;

use clap::{Parser, Subcommand, ValueEnum};

pub use dispatch::{dispatch, Context};

/// Local budget store with collaboration sync.
#[derive(Debug, Parser)]
#[command(name = "budgetsync")]
#[command(about = "Local budget store with collaboration sync", long_about = None)]
pub struct Cli {
    /// SQLite database path.
    #[arg(long, env = "SQLITE_PATH")]
    pub database: Option<String>,

    /// Collaboration backend base URL.
    #[arg(long, env = "BUDGETSYNC_URL")]
    pub remote_url: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Budget management.
    Budgets(budgets::BudgetsCommand),
    /// Budget entry management.
    Entries(entries::EntriesCommand),
    /// Show a budget with its entries and expenses.
    Detail {
        /// Budget ID.
        budget_id: i64,
        /// Keep printing the detail as it changes.
        #[arg(long)]
        watch: bool,
    },
    /// Copy a budget and all its entries.
    Duplicate {
        /// Budget ID.
        budget_id: i64,
    },
    /// Sum entry amounts per category.
    Totals {
        /// Restrict to the entries of one budget.
        #[arg(long)]
        budget_id: Option<i64>,
    },
    /// Pull shared budgets from the backend.
    Sync {
        /// Keep applying pushed changes until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Publish a local budget to the backend.
    Share {
        /// Budget ID.
        budget_id: i64,
    },
    /// Shared budget collaborators.
    Collaborators(collaborators::CollaboratorsCommand),
}
