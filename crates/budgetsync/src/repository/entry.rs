use std::sync::Arc;

use async_trait::async_trait;
use budgetsync_core::budget::{
    filter_entries_by_budget, validate_entry, BudgetEntry, BudgetEntryFilter,
};
use tokio_stream::StreamExt;

use crate::cache::{BoxStream, Snapshot, SnapshotStream};
use crate::datasource::BudgetEntryLocalDataSource;
use crate::dispatch::Dispatchers;
use crate::error::Result;

use super::BudgetEntryRepository;

/// [`BudgetEntryRepository`] backed by the local data source.
pub struct LocalBudgetEntryRepository {
    source: Arc<BudgetEntryLocalDataSource>,
    dispatchers: Dispatchers,
}

impl LocalBudgetEntryRepository {
    pub fn new(source: Arc<BudgetEntryLocalDataSource>, dispatchers: Dispatchers) -> Self {
        Self {
            source,
            dispatchers,
        }
    }
}

#[async_trait]
impl BudgetEntryRepository for LocalBudgetEntryRepository {
    fn entries(&self) -> SnapshotStream<BudgetEntry> {
        self.source.observe_all()
    }

    fn get_all_by_budget_id(&self, budget_id: i64) -> BoxStream<Vec<BudgetEntry>> {
        Box::pin(
            self.source
                .observe_all()
                .map(move |entries| filter_entries_by_budget(&entries, budget_id)),
        )
    }

    async fn cached_entries(&self) -> Snapshot<BudgetEntry> {
        self.source.get_all_cached().await
    }

    async fn entry(&self, id: i64) -> Option<BudgetEntry> {
        self.source.get_by_id(id).await
    }

    async fn filtered(&self, filter: BudgetEntryFilter) -> Vec<BudgetEntry> {
        self.source.get_all_filtered_by(&filter).await
    }

    async fn create(&self, entry: BudgetEntry) -> Result<BudgetEntry> {
        validate_entry(&entry)?;
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.create(&entry).await })
            .await
    }

    async fn update(&self, entry: BudgetEntry) -> Result<()> {
        validate_entry(&entry)?;
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.update(&entry).await })
            .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.delete(id).await })
            .await
    }

    async fn delete_by_ids(&self, ids: Vec<i64>) -> Result<usize> {
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.delete_by_ids(&ids).await })
            .await
    }

    async fn delete_all_by_budget_id(&self, budget_id: i64) -> Result<usize> {
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.delete_all_by_budget_id(budget_id).await })
            .await
    }
}
