//! Budget entry local data source.

use std::sync::Arc;

use budgetsync_core::budget::{filter_entries, BudgetEntry, BudgetEntryFilter};
use budgetsync_core::storage::{EntryStore, Result, Table};
use tokio::runtime::Handle;

use crate::cache::{Snapshot, SnapshotStream, SnapshotSubscription};

use super::LiveQuery;

/// Cached, observable view of the `budget_entry` table.
pub struct BudgetEntryLocalDataSource {
    store: Arc<dyn EntryStore>,
    live: LiveQuery<BudgetEntry>,
}

impl BudgetEntryLocalDataSource {
    /// Creates the data source and starts its live query on `handle`.
    pub fn new(store: Arc<dyn EntryStore>, handle: &Handle) -> Self {
        let changes = store.subscribe_changes();
        let loader = Arc::clone(&store);
        let live = LiveQuery::spawn(handle, Table::BudgetEntry, changes, move || {
            let store = Arc::clone(&loader);
            async move { store.all_entries().await }
        });

        Self { store, live }
    }

    /// Live stream of full entry lists, starting with the latest one.
    pub fn observe_all(&self) -> SnapshotStream<BudgetEntry> {
        self.live.stream()
    }

    pub fn subscription(&self) -> SnapshotSubscription<BudgetEntry> {
        self.live.subscription()
    }

    /// Waits for the first load, returning the store error if it failed.
    pub async fn ready(&self) -> Result<Snapshot<BudgetEntry>> {
        self.live.ready().await
    }

    pub async fn get_all_cached(&self) -> Snapshot<BudgetEntry> {
        self.live.cache().snapshot().await
    }

    pub async fn get_by_id(&self, id: i64) -> Option<BudgetEntry> {
        self.live.cache().find(|entry| entry.id == id).await
    }

    /// Cached entries matching every set field of `filter`.
    pub async fn get_all_filtered_by(&self, filter: &BudgetEntryFilter) -> Vec<BudgetEntry> {
        let snapshot = self.get_all_cached().await;
        filter_entries(&snapshot, filter)
    }

    /// Persists a new entry and returns it with the store-assigned id.
    pub async fn create(&self, entry: &BudgetEntry) -> Result<BudgetEntry> {
        let id = self.store.insert_entry(entry).await?;
        tracing::debug!(entry_id = id, budget_id = entry.budget_id, "Created entry");
        Ok(entry.clone().with_id(id))
    }

    pub async fn update(&self, entry: &BudgetEntry) -> Result<()> {
        self.store.update_entry(entry).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_entry(id).await
    }

    /// Deletes the given entries; unknown ids are skipped.
    pub async fn delete_by_ids(&self, ids: &[i64]) -> Result<usize> {
        self.store.delete_entries(ids).await
    }

    pub async fn delete_all_by_budget_id(&self, budget_id: i64) -> Result<usize> {
        self.store.delete_entries_by_budget(budget_id).await
    }

    /// Stops the live query; open streams complete.
    pub fn shutdown(&self) {
        self.live.shutdown();
    }

    /// Resets the cache to an empty snapshot.
    pub async fn clear_cache(&self) {
        self.live.cache().clear().await;
    }
}
