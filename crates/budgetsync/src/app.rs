//! Wiring of stores, data sources, repositories and use cases.

use std::sync::Arc;

use budgetsync_core::remote::RemoteBudgetSource;
use budgetsync_core::storage::LocalStore;

use crate::config::Config;
use crate::datasource::{BudgetEntryLocalDataSource, BudgetLocalDataSource};
use crate::dispatch::Dispatchers;
use crate::error::Result;
use crate::repository::{
    BudgetDetailRepository, BudgetEntryRepository, BudgetRepository, LocalBudgetEntryRepository,
    LocalBudgetRepository,
};
use crate::storage::InMemoryStore;
use crate::sync::SyncService;
use crate::usecase::{DeleteBudgetUseCase, DuplicateBudgetUseCase, GetTotalsPerCategoryUseCase};

/// Fully assembled application graph.
///
/// Built once at startup and handed out by reference.
pub struct App {
    pub dispatchers: Dispatchers,
    pub store: Arc<dyn LocalStore>,
    pub budget_source: Arc<BudgetLocalDataSource>,
    pub entry_source: Arc<BudgetEntryLocalDataSource>,
    pub budgets: Arc<dyn BudgetRepository>,
    pub entries: Arc<dyn BudgetEntryRepository>,
    pub details: BudgetDetailRepository,
    pub delete_budget: DeleteBudgetUseCase,
    pub duplicate_budget: DuplicateBudgetUseCase,
    pub totals: GetTotalsPerCategoryUseCase,
}

impl App {
    /// Assembles the graph over `store`. Live queries start on the I/O context.
    pub fn build<S>(store: Arc<S>, dispatchers: Dispatchers) -> Self
    where
        S: LocalStore + 'static,
    {
        let io = dispatchers.io_handle().clone();
        let budget_source = Arc::new(BudgetLocalDataSource::new(store.clone(), &io));
        let entry_source = Arc::new(BudgetEntryLocalDataSource::new(store.clone(), &io));

        let budgets: Arc<dyn BudgetRepository> = Arc::new(LocalBudgetRepository::new(
            Arc::clone(&budget_source),
            dispatchers.clone(),
        ));
        let entries: Arc<dyn BudgetEntryRepository> = Arc::new(LocalBudgetEntryRepository::new(
            Arc::clone(&entry_source),
            dispatchers.clone(),
        ));

        let delete_budget = DeleteBudgetUseCase::new(Arc::clone(&budgets), dispatchers.clone());
        let duplicate_budget = DuplicateBudgetUseCase::new(
            Arc::clone(&budgets),
            Arc::clone(&entries),
            dispatchers.clone(),
        );
        let totals = GetTotalsPerCategoryUseCase::new(Arc::clone(&entries), dispatchers.clone());
        let details = BudgetDetailRepository::new(
            Arc::clone(&budgets),
            Arc::clone(&entries),
            delete_budget.clone(),
            dispatchers.clone(),
        );

        Self {
            dispatchers,
            store,
            budget_source,
            entry_source,
            budgets,
            entries,
            details,
            delete_budget,
            duplicate_budget,
            totals,
        }
    }

    /// Opens the store selected at compile time.
    pub async fn open(config: &Config) -> Result<Self> {
        let dispatchers = Dispatchers::current()?;

        #[cfg(feature = "sqlite")]
        let store =
            crate::storage::SqliteStore::open(&config.sqlite_path, config.change_feed_capacity)
                .await?;
        #[cfg(feature = "sqlite")]
        tracing::info!(path = %config.sqlite_path, "Using SQLite store");

        #[cfg(not(feature = "sqlite"))]
        let store = InMemoryStore::new(config.change_feed_capacity);
        #[cfg(not(feature = "sqlite"))]
        tracing::warn!("Built without SQLite, data will not be persisted");

        Ok(Self::build(Arc::new(store), dispatchers))
    }

    /// Assembles the graph over an empty in-memory store.
    pub async fn in_memory() -> Result<Self> {
        let dispatchers = Dispatchers::current()?;
        Ok(Self::build(Arc::new(InMemoryStore::default()), dispatchers))
    }

    /// Waits until both caches hold their first loaded snapshot.
    ///
    /// A store failure during the first load is returned as `Error::Storage`.
    pub async fn ready(&self) -> Result<()> {
        self.budget_source.ready().await?;
        self.entry_source.ready().await?;
        Ok(())
    }

    /// Creates a sync service against `remote`.
    pub fn sync_service(&self, remote: Arc<dyn RemoteBudgetSource>) -> SyncService {
        SyncService::new(
            remote,
            Arc::clone(&self.budgets),
            Arc::clone(&self.entries),
            Arc::clone(&self.store),
            self.delete_budget.clone(),
            self.dispatchers.clone(),
        )
    }

    /// Stops both live queries. Open streams complete.
    pub fn shutdown(&self) {
        self.budget_source.shutdown();
        self.entry_source.shutdown();
    }
}
