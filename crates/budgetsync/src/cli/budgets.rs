//! Budget CLI commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Budget management commands.
#[derive(Debug, Parser)]
pub struct BudgetsCommand {
    #[command(subcommand)]
    pub action: BudgetsAction,
}

/// Available budget actions.
#[derive(Debug, Subcommand)]
pub enum BudgetsAction {
    /// List every budget.
    List,
    /// Get budget by ID.
    Get {
        /// Budget ID.
        id: i64,
    },
    /// Create a new budget.
    Create {
        /// Budget name.
        #[arg(long)]
        name: String,
        /// Total amount.
        #[arg(long)]
        amount: Decimal,
        /// Budget date (YYYY-MM-DD), today when omitted.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Update a budget.
    Update {
        /// Budget ID.
        id: i64,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New amount.
        #[arg(long)]
        amount: Option<Decimal>,
        /// New date.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a budget and all its entries.
    Delete {
        /// Budget ID.
        id: i64,
    },
}
