use chrono::{DateTime, Utc};
use serde::Serialize;

/// Observable status of the remote sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncState {
    pub syncing: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Description of the last failure, cleared by the next success.
    pub sync_error: Option<String>,
}

impl SyncState {
    pub(crate) fn started(&self) -> Self {
        Self {
            syncing: true,
            ..self.clone()
        }
    }

    pub(crate) fn succeeded(&self, at: DateTime<Utc>) -> Self {
        Self {
            syncing: false,
            last_synced_at: Some(at),
            sync_error: None,
        }
    }

    /// Clears a previous failure without marking a full sync.
    pub(crate) fn cleared(&self) -> Self {
        Self {
            sync_error: None,
            ..self.clone()
        }
    }

    pub(crate) fn failed(&self, error: String) -> Self {
        Self {
            syncing: false,
            last_synced_at: self.last_synced_at,
            sync_error: Some(error),
        }
    }
}
