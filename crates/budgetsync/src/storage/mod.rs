//! Persistent store backends.
//!
//! Concrete implementations of the store traits defined in
//! `budgetsync_core::storage`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always available. It backs the test suites and
//! the binary when it is built without `sqlite`.

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod inmemory;

pub use inmemory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
