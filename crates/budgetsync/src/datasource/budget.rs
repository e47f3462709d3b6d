//! Budget local data source.

use std::sync::Arc;

use budgetsync_core::budget::{Budget, BudgetEntry};
use budgetsync_core::storage::{BudgetStore, Result, Table};
use tokio::runtime::Handle;

use crate::cache::{Snapshot, SnapshotStream, SnapshotSubscription};

use super::LiveQuery;

/// Cached, observable view of the `budget` table.
pub struct BudgetLocalDataSource {
    store: Arc<dyn BudgetStore>,
    live: LiveQuery<Budget>,
}

impl BudgetLocalDataSource {
    /// Creates the data source and starts its live query on `handle`.
    pub fn new(store: Arc<dyn BudgetStore>, handle: &Handle) -> Self {
        let changes = store.subscribe_changes();
        let loader = Arc::clone(&store);
        let live = LiveQuery::spawn(handle, Table::Budget, changes, move || {
            let store = Arc::clone(&loader);
            async move { store.all_budgets().await }
        });

        Self { store, live }
    }

    /// Live stream of full budget lists, starting with the latest one.
    pub fn observe_all(&self) -> SnapshotStream<Budget> {
        self.live.stream()
    }

    pub fn subscription(&self) -> SnapshotSubscription<Budget> {
        self.live.subscription()
    }

    /// Waits for the first load, returning the store error if it failed.
    pub async fn ready(&self) -> Result<Snapshot<Budget>> {
        self.live.ready().await
    }

    pub async fn get_all_cached(&self) -> Snapshot<Budget> {
        self.live.cache().snapshot().await
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Budget> {
        self.live.cache().find(|budget| budget.id == id).await
    }

    /// Persists a new budget and returns it with the store-assigned id.
    pub async fn create(&self, budget: &Budget) -> Result<Budget> {
        let id = self.store.insert_budget(budget).await?;
        tracing::debug!(budget_id = id, name = %budget.name, "Created budget");
        Ok(budget.clone().with_id(id))
    }

    pub async fn update(&self, budget: &Budget) -> Result<()> {
        self.store.update_budget(budget).await
    }

    /// Deletes the budget row only.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_budget(id).await
    }

    pub async fn delete_by_ids(&self, ids: &[i64]) -> Result<()> {
        for id in ids {
            self.store.delete_budget(*id).await?;
        }
        Ok(())
    }

    /// Persists a budget and its entries in one transaction.
    pub async fn create_with_entries(
        &self,
        budget: &Budget,
        entries: &[BudgetEntry],
    ) -> Result<Budget> {
        let id = self.store.insert_budget_with_entries(budget, entries).await?;
        tracing::debug!(
            budget_id = id,
            entries = entries.len(),
            "Created budget with entries"
        );
        Ok(budget.clone().with_id(id))
    }

    /// Deletes a budget and all its entries in one transaction.
    pub async fn delete_with_entries(&self, id: i64) -> Result<usize> {
        self.store.delete_budget_cascade(id).await
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
