//! Local data sources.
//!
//! Each data source owns a [`SnapshotCache`](crate::cache::SnapshotCache)
//! and a snapshot channel, both fed by one live query over the store. Writes
//! go straight to the store; the cache only changes when the live query
//! re-reads after the store's change notification.

mod budget;
mod entry;
mod live_query;

pub use budget::BudgetLocalDataSource;
pub use entry::BudgetEntryLocalDataSource;
pub use live_query::LiveQuery;
