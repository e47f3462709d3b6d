//! SQLite store implementation.
//!
//! Implements the store traits from `budgetsync_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tokio::sync::broadcast;
use tokio_rusqlite::Connection;

use budgetsync_core::budget::{Budget, BudgetEntry};
use budgetsync_core::storage::{
    BudgetStore, ChangeFeed, EntryStore, LinkKind, RemoteLinkStore, Result, StorageError,
    TableChange,
};

use super::conversions::{format_date, row_to_budget, row_to_entry};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn insert_entry_row(
    conn: &rusqlite::Connection,
    entry: &BudgetEntry,
    budget_id: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        schema::INSERT_ENTRY,
        params![
            budget_id,
            entry.amount,
            entry.description,
            entry.entry_type.as_str(),
            entry.category.as_str(),
            format_date(&entry.date),
            entry.invoice,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// SQLite-backed local store.
///
/// One background connection thread serializes every statement. Each
/// committed write is followed by a [`TableChange`] on the change feed.
pub struct SqliteStore {
    conn: Connection,
    changes: broadcast::Sender<TableChange>,
}

impl SqliteStore {
    /// Opens (or creates) a file-based database and initializes the schema.
    pub async fn open(path: &str, feed_capacity: usize) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::debug!(path, "Opened SQLite store");

        Ok(Self::with_connection(conn, feed_capacity))
    }

    /// Opens an in-memory database. Data is lost when the store is dropped.
    pub async fn open_in_memory(feed_capacity: usize) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self::with_connection(conn, feed_capacity))
    }

    fn with_connection(conn: Connection, feed_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(feed_capacity.max(1));
        Self { conn, changes }
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))
    }

    fn notify(&self, change: TableChange) {
        // No receivers just means no live query is running yet.
        let _ = self.changes.send(change);
    }
}

impl ChangeFeed for SqliteStore {
    fn subscribe_changes(&self) -> broadcast::Receiver<TableChange> {
        self.changes.subscribe()
    }
}

// ============================================================================
// BudgetStore implementation
// ============================================================================

#[async_trait]
impl BudgetStore for SqliteStore {
    async fn all_budgets(&self) -> Result<Vec<Budget>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_BUDGETS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_budget).map_err(wrap_err)?;

                let mut budgets = Vec::new();
                for row_result in rows {
                    budgets.push(row_result.map_err(wrap_err)?);
                }
                Ok(budgets)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Budget", ""))
    }

    async fn insert_budget(&self, budget: &Budget) -> Result<i64> {
        let name = budget.name.clone();
        let amount = budget.amount.to_string();
        let date = format_date(&budget.date);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(schema::INSERT_BUDGET, params![name, amount, date])
                    .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Budget", ""))?;

        self.notify(TableChange::budgets());
        Ok(id)
    }

    async fn update_budget(&self, budget: &Budget) -> Result<()> {
        let id = budget.id;
        let name = budget.name.clone();
        let amount = budget.amount.to_string();
        let date = format_date(&budget.date);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_BUDGET, params![id, name, amount, date])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Budget", id))?;

        self.notify(TableChange::budgets());
        Ok(())
    }

    async fn delete_budget(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_BUDGET, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Budget", id))?;

        self.notify(TableChange::budgets());
        Ok(())
    }

    async fn insert_budget_with_entries(
        &self,
        budget: &Budget,
        entries: &[BudgetEntry],
    ) -> Result<i64> {
        let name = budget.name.clone();
        let amount = budget.amount.to_string();
        let date = format_date(&budget.date);
        let entries = entries.to_vec();
        let has_entries = !entries.is_empty();

        let id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(schema::INSERT_BUDGET, params![name, amount, date])
                    .map_err(wrap_err)?;
                let budget_id = tx.last_insert_rowid();
                for entry in &entries {
                    insert_entry_row(&tx, entry, budget_id).map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(budget_id)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Budget", ""))?;

        self.notify(TableChange::budgets());
        if has_entries {
            self.notify(TableChange::entries());
        }
        Ok(id)
    }

    async fn delete_budget_cascade(&self, id: i64) -> Result<usize> {
        let (rows, removed) = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let removed = tx
                    .execute(schema::DELETE_ENTRIES_BY_BUDGET, [id])
                    .map_err(wrap_err)?;
                let rows = tx.execute(schema::DELETE_BUDGET, [id]).map_err(wrap_err)?;
                if rows == 0 && removed == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;
                Ok((rows, removed))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Budget", id))?;

        if rows > 0 {
            self.notify(TableChange::budgets());
        }
        if removed > 0 {
            self.notify(TableChange::entries());
        }
        tracing::debug!(budget_id = id, removed, "Deleted budget with entries");
        Ok(removed)
    }
}

// ============================================================================
// EntryStore implementation
// ============================================================================

#[async_trait]
impl EntryStore for SqliteStore {
    async fn all_entries(&self) -> Result<Vec<BudgetEntry>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ENTRIES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_entry).map_err(wrap_err)?;

                let mut entries = Vec::new();
                for row_result in rows {
                    entries.push(row_result.map_err(wrap_err)?);
                }
                Ok(entries)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BudgetEntry", ""))
    }

    async fn insert_entry(&self, entry: &BudgetEntry) -> Result<i64> {
        let entry = entry.clone();

        let id = self
            .conn
            .call(move |conn| insert_entry_row(conn, &entry, entry.budget_id).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BudgetEntry", ""))?;

        self.notify(TableChange::entries());
        Ok(id)
    }

    async fn update_entry(&self, entry: &BudgetEntry) -> Result<()> {
        let id = entry.id;
        let entry = entry.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_ENTRY,
                        params![
                            entry.id,
                            entry.budget_id,
                            entry.amount,
                            entry.description,
                            entry.entry_type.as_str(),
                            entry.category.as_str(),
                            format_date(&entry.date),
                            entry.invoice,
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BudgetEntry", id))?;

        self.notify(TableChange::entries());
        Ok(())
    }

    async fn delete_entry(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_ENTRY, [id]).map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BudgetEntry", id))?;

        self.notify(TableChange::entries());
        Ok(())
    }

    async fn delete_entries(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids = ids.to_vec();

        let removed = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let mut removed = 0;
                {
                    let mut stmt = tx.prepare(schema::DELETE_ENTRY).map_err(wrap_err)?;
                    for id in &ids {
                        removed += stmt.execute([id]).map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(removed)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BudgetEntry", ""))?;

        if removed > 0 {
            self.notify(TableChange::entries());
        }
        Ok(removed)
    }

    async fn delete_entries_by_budget(&self, budget_id: i64) -> Result<usize> {
        let removed = self
            .conn
            .call(move |conn| {
                conn.execute(schema::DELETE_ENTRIES_BY_BUDGET, [budget_id])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BudgetEntry", ""))?;

        if removed > 0 {
            self.notify(TableChange::entries());
        }
        Ok(removed)
    }
}

// ============================================================================
// RemoteLinkStore implementation
// ============================================================================

#[async_trait]
impl RemoteLinkStore for SqliteStore {
    async fn link(&self, kind: LinkKind, local_id: i64, remote_id: &str) -> Result<()> {
        let remote_id = remote_id.to_string();
        let id = remote_id.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_LINK,
                    params![kind.as_str(), local_id, remote_id],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "RemoteLink", id))
    }

    async fn unlink(&self, kind: LinkKind, local_id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_LINK, params![kind.as_str(), local_id])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "RemoteLink", local_id))
    }

    async fn local_id(&self, kind: LinkKind, remote_id: &str) -> Result<Option<i64>> {
        let remote_id = remote_id.to_string();
        let id = remote_id.clone();

        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::SELECT_LOCAL_ID,
                    params![kind.as_str(), remote_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "RemoteLink", id))
    }

    async fn remote_id(&self, kind: LinkKind, local_id: i64) -> Result<Option<String>> {
        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::SELECT_REMOTE_ID,
                    params![kind.as_str(), local_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "RemoteLink", local_id))
    }

    async fn links(&self, kind: LinkKind) -> Result<Vec<(i64, String)>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_LINKS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([kind.as_str()], |row| Ok((row.get(0)?, row.get(1)?)))
                    .map_err(wrap_err)?;

                let mut links = Vec::new();
                for row_result in rows {
                    links.push(row_result.map_err(wrap_err)?);
                }
                Ok(links)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "RemoteLink", ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetsync_core::budget::Category;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    async fn store() -> SqliteStore {
        SqliteStore::open_in_memory(16).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_budget_assigns_id_and_reads_back() {
        let store = store().await;
        let budget = Budget::new("Groceries", dec!(250.00), date(1));

        let id = store.insert_budget(&budget).await.unwrap();
        let budgets = store.all_budgets().await.unwrap();

        assert!(id >= 0);
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].id, id);
        assert_eq!(budgets[0].name, "Groceries");
        assert_eq!(budgets[0].amount, dec!(250.00));
        assert_eq!(budgets[0].date, date(1));
    }

    #[tokio::test]
    async fn test_write_notifies_change_feed() {
        let store = store().await;
        let mut changes = store.subscribe_changes();

        store
            .insert_budget(&Budget::new("Rent", dec!(900), date(1)))
            .await
            .unwrap();

        assert_eq!(changes.recv().await.unwrap(), TableChange::budgets());
    }

    #[tokio::test]
    async fn test_update_missing_budget_is_not_found() {
        let store = store().await;
        let budget = Budget::new("Ghost", dec!(1), date(1)).with_id(77);

        let result = store.update_budget(&budget).await;

        assert_eq!(result, Err(StorageError::not_found("Budget", 77)));
    }

    #[tokio::test]
    async fn test_entry_round_trip() {
        let store = store().await;
        let budget_id = store
            .insert_budget(&Budget::new("Trip", dec!(800), date(1)))
            .await
            .unwrap();
        let entry = BudgetEntry::outcome(budget_id, "45.90", "Hotel", Category::Travel, date(3))
            .with_invoice("receipts/hotel.jpg");

        let id = store.insert_entry(&entry).await.unwrap();
        let entries = store.all_entries().await.unwrap();

        assert_eq!(entries, vec![entry.with_id(id)]);
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_entries() {
        let store = store().await;
        let keep = store
            .insert_budget(&Budget::new("Keep", dec!(10), date(1)))
            .await
            .unwrap();
        let doomed = store
            .insert_budget(&Budget::new("Drop", dec!(10), date(1)))
            .await
            .unwrap();
        for (budget_id, description) in [(keep, "a"), (doomed, "b"), (doomed, "c")] {
            store
                .insert_entry(&BudgetEntry::outcome(
                    budget_id,
                    "1",
                    description,
                    Category::Other,
                    date(2),
                ))
                .await
                .unwrap();
        }

        let removed = store.delete_budget_cascade(doomed).await.unwrap();

        assert_eq!(removed, 2);
        let entries = store.all_entries().await.unwrap();
        assert!(entries.iter().all(|e| e.budget_id == keep));
        assert_eq!(store.all_budgets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_orphaned_entries() {
        let store = store().await;
        store
            .insert_entry(&BudgetEntry::outcome(5, "1", "orphan", Category::Other, date(2)))
            .await
            .unwrap();

        let removed = store.delete_budget_cascade(5).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.all_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cascade_delete_unknown_budget_is_not_found() {
        let store = store().await;

        let result = store.delete_budget_cascade(5).await;

        assert_eq!(result, Err(StorageError::not_found("Budget", 5)));
    }

    #[tokio::test]
    async fn test_insert_budget_with_entries_rewrites_owner() {
        let store = store().await;
        let entries = vec![
            BudgetEntry::outcome(999, "3", "Bread", Category::Groceries, date(4)),
            BudgetEntry::income(999, "50", "Gift", Category::Other, date(5)),
        ];

        let id = store
            .insert_budget_with_entries(&Budget::new("Copy", dec!(100), date(1)), &entries)
            .await
            .unwrap();

        let stored = store.all_entries().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|e| e.budget_id == id));
    }

    #[tokio::test]
    async fn test_delete_entries_ignores_unknown_ids() {
        let store = store().await;
        let id = store
            .insert_entry(&BudgetEntry::outcome(1, "2", "Tea", Category::Food, date(1)))
            .await
            .unwrap();

        let removed = store.delete_entries(&[id, 12345]).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.all_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_links() {
        let store = store().await;

        store.link(LinkKind::Budget, 3, "b-3").await.unwrap();
        store.link(LinkKind::Entry, 3, "e-3").await.unwrap();

        assert_eq!(
            store.local_id(LinkKind::Budget, "b-3").await.unwrap(),
            Some(3)
        );
        assert_eq!(
            store.remote_id(LinkKind::Entry, 3).await.unwrap(),
            Some("e-3".to_string())
        );
        assert_eq!(
            store.links(LinkKind::Budget).await.unwrap(),
            vec![(3, "b-3".to_string())]
        );

        store.unlink(LinkKind::Budget, 3).await.unwrap();
        assert_eq!(store.local_id(LinkKind::Budget, "b-3").await.unwrap(), None);
    }
}
