//! SQLite storage backend.
//!
//! Uses `rusqlite` for the queries and `tokio-rusqlite` to run them on a
//! dedicated connection thread. Every committed write is announced on the
//! store's change feed.

mod conversions;
mod error;
mod schema;
mod store;

pub use store::SqliteStore;
