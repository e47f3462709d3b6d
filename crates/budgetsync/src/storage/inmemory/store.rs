//! In-memory store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use budgetsync_core::budget::{Budget, BudgetEntry};
use budgetsync_core::storage::{
    BudgetStore, ChangeFeed, EntryStore, LinkKind, RemoteLinkStore, Result, StorageError,
    TableChange,
};

#[derive(Debug, Default)]
struct Tables {
    budgets: BTreeMap<i64, Budget>,
    entries: BTreeMap<i64, BudgetEntry>,
    links: HashMap<(LinkKind, i64), String>,
    next_budget_id: i64,
    next_entry_id: i64,
}

impl Tables {
    fn insert_budget(&mut self, budget: &Budget) -> i64 {
        let id = self.next_budget_id;
        self.next_budget_id += 1;
        self.budgets.insert(
            id,
            Budget {
                total_expenses: Default::default(),
                ..budget.clone().with_id(id)
            },
        );
        id
    }

    fn insert_entry(&mut self, entry: &BudgetEntry, budget_id: i64) -> i64 {
        let id = self.next_entry_id;
        self.next_entry_id += 1;
        self.entries.insert(
            id,
            BudgetEntry {
                id,
                budget_id,
                is_selected: false,
                ..entry.clone()
            },
        );
        id
    }

    fn delete_entries_by_budget(&mut self, budget_id: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.budget_id != budget_id);
        before - self.entries.len()
    }
}

/// In-memory storage backend for testing.
///
/// All tables sit behind one `RwLock`, so multi-row writes are atomic.
/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    changes: broadcast::Sender<TableChange>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CHANGE_FEED_CAPACITY)
    }
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new(feed_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(feed_capacity.max(1));
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            changes,
        }
    }

    fn notify(&self, change: TableChange) {
        let _ = self.changes.send(change);
    }
}

impl ChangeFeed for InMemoryStore {
    fn subscribe_changes(&self) -> broadcast::Receiver<TableChange> {
        self.changes.subscribe()
    }
}

#[async_trait]
impl BudgetStore for InMemoryStore {
    async fn all_budgets(&self) -> Result<Vec<Budget>> {
        let tables = self.tables.read().await;
        Ok(tables.budgets.values().cloned().collect())
    }

    async fn insert_budget(&self, budget: &Budget) -> Result<i64> {
        let id = self.tables.write().await.insert_budget(budget);
        self.notify(TableChange::budgets());
        Ok(id)
    }

    async fn update_budget(&self, budget: &Budget) -> Result<()> {
        {
            let mut tables = self.tables.write().await;
            let stored = tables
                .budgets
                .get_mut(&budget.id)
                .ok_or_else(|| StorageError::not_found("Budget", budget.id))?;
            stored.name = budget.name.clone();
            stored.amount = budget.amount;
            stored.date = budget.date;
        }
        self.notify(TableChange::budgets());
        Ok(())
    }

    async fn delete_budget(&self, id: i64) -> Result<()> {
        self.tables
            .write()
            .await
            .budgets
            .remove(&id)
            .ok_or_else(|| StorageError::not_found("Budget", id))?;
        self.notify(TableChange::budgets());
        Ok(())
    }

    async fn insert_budget_with_entries(
        &self,
        budget: &Budget,
        entries: &[BudgetEntry],
    ) -> Result<i64> {
        let id = {
            let mut tables = self.tables.write().await;
            let id = tables.insert_budget(budget);
            for entry in entries {
                tables.insert_entry(entry, id);
            }
            id
        };
        self.notify(TableChange::budgets());
        if !entries.is_empty() {
            self.notify(TableChange::entries());
        }
        Ok(id)
    }

    async fn delete_budget_cascade(&self, id: i64) -> Result<usize> {
        let (existed, removed) = {
            let mut tables = self.tables.write().await;
            let existed = tables.budgets.remove(&id).is_some();
            let removed = tables.delete_entries_by_budget(id);
            if !existed && removed == 0 {
                return Err(StorageError::not_found("Budget", id));
            }
            (existed, removed)
        };
        if existed {
            self.notify(TableChange::budgets());
        }
        if removed > 0 {
            self.notify(TableChange::entries());
        }
        Ok(removed)
    }
}

#[async_trait]
impl EntryStore for InMemoryStore {
    async fn all_entries(&self) -> Result<Vec<BudgetEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<BudgetEntry> = tables.entries.values().cloned().collect();
        entries.sort_by_key(|e| (e.date, e.id));
        Ok(entries)
    }

    async fn insert_entry(&self, entry: &BudgetEntry) -> Result<i64> {
        let id = self
            .tables
            .write()
            .await
            .insert_entry(entry, entry.budget_id);
        self.notify(TableChange::entries());
        Ok(id)
    }

    async fn update_entry(&self, entry: &BudgetEntry) -> Result<()> {
        {
            let mut tables = self.tables.write().await;
            let stored = tables
                .entries
                .get_mut(&entry.id)
                .ok_or_else(|| StorageError::not_found("BudgetEntry", entry.id))?;
            *stored = BudgetEntry {
                is_selected: false,
                ..entry.clone()
            };
        }
        self.notify(TableChange::entries());
        Ok(())
    }

    async fn delete_entry(&self, id: i64) -> Result<()> {
        self.tables
            .write()
            .await
            .entries
            .remove(&id)
            .ok_or_else(|| StorageError::not_found("BudgetEntry", id))?;
        self.notify(TableChange::entries());
        Ok(())
    }

    async fn delete_entries(&self, ids: &[i64]) -> Result<usize> {
        let removed = {
            let mut tables = self.tables.write().await;
            ids.iter()
                .filter(|id| tables.entries.remove(*id).is_some())
                .count()
        };
        if removed > 0 {
            self.notify(TableChange::entries());
        }
        Ok(removed)
    }

    async fn delete_entries_by_budget(&self, budget_id: i64) -> Result<usize> {
        let removed = self
            .tables
            .write()
            .await
            .delete_entries_by_budget(budget_id);
        if removed > 0 {
            self.notify(TableChange::entries());
        }
        Ok(removed)
    }
}

#[async_trait]
impl RemoteLinkStore for InMemoryStore {
    async fn link(&self, kind: LinkKind, local_id: i64, remote_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .links
            .retain(|(k, _), remote| !(*k == kind && remote.as_str() == remote_id));
        tables.links.insert((kind, local_id), remote_id.to_string());
        Ok(())
    }

    async fn unlink(&self, kind: LinkKind, local_id: i64) -> Result<()> {
        self.tables.write().await.links.remove(&(kind, local_id));
        Ok(())
    }

    async fn local_id(&self, kind: LinkKind, remote_id: &str) -> Result<Option<i64>> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .iter()
            .find(|((k, _), remote)| *k == kind && remote.as_str() == remote_id)
            .map(|((_, local), _)| *local))
    }

    async fn remote_id(&self, kind: LinkKind, local_id: i64) -> Result<Option<String>> {
        let tables = self.tables.read().await;
        Ok(tables.links.get(&(kind, local_id)).cloned())
    }

    async fn links(&self, kind: LinkKind) -> Result<Vec<(i64, String)>> {
        let tables = self.tables.read().await;
        let mut links: Vec<(i64, String)> = tables
            .links
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|((_, local), remote)| (*local, remote.clone()))
            .collect();
        links.sort();
        Ok(links)
    }
}
