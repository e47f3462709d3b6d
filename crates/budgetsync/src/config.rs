use std::{env, time::Duration};

/// Default capacity of the store's change feed.
pub const DEFAULT_CHANGE_FEED_CAPACITY: usize = 100;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "budgetsync.db")
    pub sqlite_path: String,
    /// Base URL of the collaboration backend (default: "http://localhost:3000")
    pub remote_url: String,
    /// Capacity of the store change feed (default: 100)
    pub change_feed_capacity: usize,
    /// Seconds between periodic remote syncs, 0 disables (default: 300)
    pub sync_interval_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "budgetsync.db")
    /// - `BUDGETSYNC_URL` - Collaboration backend URL (default: "http://localhost:3000")
    /// - `CHANGE_FEED_CAPACITY` - Change feed capacity (default: 100)
    /// - `SYNC_INTERVAL_SECONDS` - Periodic sync interval (default: 300)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "budgetsync.db".to_string()),
            remote_url: lookup("BUDGETSYNC_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            change_feed_capacity: lookup("CHANGE_FEED_CAPACITY")
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_CHANGE_FEED_CAPACITY),
            sync_interval_seconds: lookup("SYNC_INTERVAL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Periodic sync interval, `None` when disabled.
    pub fn sync_interval(&self) -> Option<Duration> {
        (self.sync_interval_seconds > 0).then(|| Duration::from_secs(self.sync_interval_seconds))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
