use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::budget::{Budget, BudgetEntry};

use super::{LinkKind, Result, TableChange};

/// Multicast notification of committed writes.
pub trait ChangeFeed: Send + Sync {
    /// Subscribes to changes committed after this call.
    fn subscribe_changes(&self) -> broadcast::Receiver<TableChange>;
}

/// Persistent storage for budgets.
#[async_trait]
pub trait BudgetStore: ChangeFeed {
    /// Reads every budget, ordered by id.
    async fn all_budgets(&self) -> Result<Vec<Budget>>;

    /// Inserts a budget and returns the store-assigned id.
    async fn insert_budget(&self, budget: &Budget) -> Result<i64>;

    /// Updates an existing budget.
    async fn update_budget(&self, budget: &Budget) -> Result<()>;

    /// Deletes a budget row only. Its entries are left untouched.
    async fn delete_budget(&self, id: i64) -> Result<()>;

    /// Inserts a budget and its entries in one transaction.
    ///
    /// Each entry's `budget_id` is rewritten to the new budget's id.
    async fn insert_budget_with_entries(
        &self,
        budget: &Budget,
        entries: &[BudgetEntry],
    ) -> Result<i64>;

    /// Deletes a budget and every entry referencing it in one transaction.
    ///
    /// Entries are removed even when the budget row is already gone. Returns
    /// the number of entries removed, or `NotFound` when neither existed.
    async fn delete_budget_cascade(&self, id: i64) -> Result<usize>;
}

/// Persistent storage for budget entries.
#[async_trait]
pub trait EntryStore: ChangeFeed {
    /// Reads every entry, ordered by date then id.
    async fn all_entries(&self) -> Result<Vec<BudgetEntry>>;

    /// Inserts an entry and returns the store-assigned id.
    async fn insert_entry(&self, entry: &BudgetEntry) -> Result<i64>;

    /// Updates an existing entry.
    async fn update_entry(&self, entry: &BudgetEntry) -> Result<()>;

    /// Deletes an entry by its id.
    async fn delete_entry(&self, id: i64) -> Result<()>;

    /// Deletes the given entries, ignoring ids that do not exist.
    async fn delete_entries(&self, ids: &[i64]) -> Result<usize>;

    /// Deletes every entry of a budget.
    async fn delete_entries_by_budget(&self, budget_id: i64) -> Result<usize>;
}

/// Mapping between local row ids and remote identities.
#[async_trait]
pub trait RemoteLinkStore: Send + Sync {
    /// Links a local row to a remote id, replacing any previous link.
    async fn link(&self, kind: LinkKind, local_id: i64, remote_id: &str) -> Result<()>;

    /// Removes the link of a local row.
    async fn unlink(&self, kind: LinkKind, local_id: i64) -> Result<()>;

    /// Finds the local id linked to a remote id.
    async fn local_id(&self, kind: LinkKind, remote_id: &str) -> Result<Option<i64>>;

    /// Finds the remote id linked to a local row.
    async fn remote_id(&self, kind: LinkKind, local_id: i64) -> Result<Option<String>>;

    /// Lists every link of a kind as `(local_id, remote_id)`.
    async fn links(&self, kind: LinkKind) -> Result<Vec<(i64, String)>>;
}

/// Combined trait for stores that back every local data source.
pub trait LocalStore: BudgetStore + EntryStore + RemoteLinkStore {}

impl<T: BudgetStore + EntryStore + RemoteLinkStore> LocalStore for T {}
