//! Entry CLI commands.

use budgetsync_core::budget::{Category, EntryType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// Entry management commands.
#[derive(Debug, Parser)]
pub struct EntriesCommand {
    #[command(subcommand)]
    pub action: EntriesAction,
}

/// CLI entry type (with clap ValueEnum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryTypeArg {
    Outcome,
    Income,
}

impl From<EntryTypeArg> for EntryType {
    fn from(t: EntryTypeArg) -> Self {
        match t {
            EntryTypeArg::Outcome => EntryType::Outcome,
            EntryTypeArg::Income => EntryType::Income,
        }
    }
}

/// CLI category (with clap ValueEnum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Food,
    Groceries,
    Health,
    Transport,
    Housing,
    Utilities,
    Entertainment,
    Shopping,
    Education,
    Travel,
    Salary,
    Other,
}

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Food => Category::Food,
            CategoryArg::Groceries => Category::Groceries,
            CategoryArg::Health => Category::Health,
            CategoryArg::Transport => Category::Transport,
            CategoryArg::Housing => Category::Housing,
            CategoryArg::Utilities => Category::Utilities,
            CategoryArg::Entertainment => Category::Entertainment,
            CategoryArg::Shopping => Category::Shopping,
            CategoryArg::Education => Category::Education,
            CategoryArg::Travel => Category::Travel,
            CategoryArg::Salary => Category::Salary,
            CategoryArg::Other => Category::Other,
        }
    }
}

/// Available entry actions.
#[derive(Debug, Subcommand)]
pub enum EntriesAction {
    /// List entries with filters.
    List {
        /// Filter by budget ID.
        #[arg(long)]
        budget_id: Option<i64>,
        /// Case-insensitive description substring.
        #[arg(long)]
        description: Option<String>,
        /// Filter by entry type.
        #[arg(long, value_enum)]
        entry_type: Option<EntryTypeArg>,
        /// Start date, inclusive (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,
        /// End date, inclusive (YYYY-MM-DD).
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Add an entry to a budget.
    Add {
        /// Owning budget ID.
        #[arg(long)]
        budget_id: i64,
        /// Decimal amount.
        #[arg(long)]
        amount: String,
        /// Entry description.
        #[arg(long, default_value = "")]
        description: String,
        /// Entry type.
        #[arg(long, value_enum, default_value = "outcome")]
        entry_type: EntryTypeArg,
        /// Spending category.
        #[arg(long, value_enum)]
        category: CategoryArg,
        /// Entry date (YYYY-MM-DD), today when omitted.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Receipt path or URI.
        #[arg(long)]
        invoice: Option<String>,
    },
    /// Update an entry.
    Update {
        /// Entry ID.
        id: i64,
        /// New amount.
        #[arg(long)]
        amount: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// New entry type.
        #[arg(long, value_enum)]
        entry_type: Option<EntryTypeArg>,
        /// New category.
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        /// New date.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// New receipt path or URI.
        #[arg(long, conflicts_with = "clear_invoice")]
        invoice: Option<String>,
        /// Remove the receipt.
        #[arg(long)]
        clear_invoice: bool,
    },
    /// Delete entries by ID.
    Delete {
        /// Entry IDs.
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn test_category_args_cover_every_category() {
        let mapped: Vec<Category> = CategoryArg::value_variants()
            .iter()
            .copied()
            .map(Category::from)
            .collect();

        assert_eq!(mapped, Category::ALL.to_vec());
    }
}
