use std::sync::Arc;

use async_trait::async_trait;
use budgetsync_core::budget::{validate_budget, Budget, BudgetEntry};

use crate::cache::{Snapshot, SnapshotStream};
use crate::datasource::BudgetLocalDataSource;
use crate::dispatch::Dispatchers;
use crate::error::Result;

use super::BudgetRepository;

/// [`BudgetRepository`] backed by the local data source.
pub struct LocalBudgetRepository {
    source: Arc<BudgetLocalDataSource>,
    dispatchers: Dispatchers,
}

impl LocalBudgetRepository {
    pub fn new(source: Arc<BudgetLocalDataSource>, dispatchers: Dispatchers) -> Self {
        Self {
            source,
            dispatchers,
        }
    }
}

#[async_trait]
impl BudgetRepository for LocalBudgetRepository {
    fn budgets(&self) -> SnapshotStream<Budget> {
        self.source.observe_all()
    }

    async fn cached_budgets(&self) -> Snapshot<Budget> {
        self.source.get_all_cached().await
    }

    async fn budget(&self, id: i64) -> Option<Budget> {
        self.source.get_by_id(id).await
    }

    async fn create(&self, budget: Budget) -> Result<Budget> {
        validate_budget(&budget)?;
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.create(&budget).await })
            .await
    }

    async fn update(&self, budget: Budget) -> Result<()> {
        validate_budget(&budget)?;
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.update(&budget).await })
            .await
    }

    async fn create_with_entries(
        &self,
        budget: Budget,
        entries: Vec<BudgetEntry>,
    ) -> Result<Budget> {
        validate_budget(&budget)?;
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.create_with_entries(&budget, &entries).await })
            .await
    }

    async fn delete_with_entries(&self, id: i64) -> Result<usize> {
        let source = Arc::clone(&self.source);
        self.dispatchers
            .io(async move { source.delete_with_entries(id).await })
            .await
    }
}
