//! Use cases composed from the repositories.

mod delete_budget;
mod duplicate_budget;
mod totals;

pub use delete_budget::DeleteBudgetUseCase;
pub use duplicate_budget::DuplicateBudgetUseCase;
pub use totals::GetTotalsPerCategoryUseCase;
