//! Repositories over the local data sources.
//!
//! Writes are validated here and dispatched on the I/O context. Reads come
//! from the data sources' caches and snapshot streams.

mod budget;
mod detail;
mod entry;

use async_trait::async_trait;
use budgetsync_core::budget::{Budget, BudgetEntry, BudgetEntryFilter};

use crate::cache::{BoxStream, Snapshot, SnapshotStream};
use crate::error::Result;

pub use budget::LocalBudgetRepository;
pub use detail::BudgetDetailRepository;
pub use entry::LocalBudgetEntryRepository;

/// Budgets as seen by use cases and callers.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Live stream of every budget.
    fn budgets(&self) -> SnapshotStream<Budget>;

    async fn cached_budgets(&self) -> Snapshot<Budget>;

    async fn budget(&self, id: i64) -> Option<Budget>;

    /// Validates and persists a new budget.
    async fn create(&self, budget: Budget) -> Result<Budget>;

    async fn update(&self, budget: Budget) -> Result<()>;

    /// Persists a budget and its entries in one transaction.
    async fn create_with_entries(&self, budget: Budget, entries: Vec<BudgetEntry>)
        -> Result<Budget>;

    /// Deletes a budget and its entries in one transaction.
    async fn delete_with_entries(&self, id: i64) -> Result<usize>;
}

/// Budget entries as seen by use cases and callers.
#[async_trait]
pub trait BudgetEntryRepository: Send + Sync {
    /// Live stream of every entry.
    fn entries(&self) -> SnapshotStream<BudgetEntry>;

    /// Live stream of the entries of one budget.
    fn get_all_by_budget_id(&self, budget_id: i64) -> BoxStream<Vec<BudgetEntry>>;

    async fn cached_entries(&self) -> Snapshot<BudgetEntry>;

    async fn entry(&self, id: i64) -> Option<BudgetEntry>;

    async fn filtered(&self, filter: BudgetEntryFilter) -> Vec<BudgetEntry>;

    /// Validates and persists a new entry.
    async fn create(&self, entry: BudgetEntry) -> Result<BudgetEntry>;

    async fn update(&self, entry: BudgetEntry) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;

    async fn delete_by_ids(&self, ids: Vec<i64>) -> Result<usize>;

    async fn delete_all_by_budget_id(&self, budget_id: i64) -> Result<usize>;
}
