mod error;
mod operations;
mod types;

pub use error::{BudgetError, EntryError};
pub use operations::{
    duplicate_budget, duplicate_entries, filter_entries, filter_entries_by_budget, total_expenses,
    totals_per_category, validate_budget, validate_entry, COPY_SUFFIX,
};
pub use types::{
    Budget, BudgetDetail, BudgetEntry, BudgetEntryFilter, Category, CategoryTotal, EntryType,
    UNSAVED_ID,
};
