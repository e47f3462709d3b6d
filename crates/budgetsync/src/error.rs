use budgetsync_core::budget::{BudgetError, EntryError};
use budgetsync_core::remote::NetworkError;
use budgetsync_core::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by data sources, repositories, use cases and sync.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Invalid budget: {0}")]
    InvalidBudget(#[from] BudgetError),

    #[error("Invalid entry: {0}")]
    InvalidEntry(#[from] EntryError),

    /// A task spawned on an execution context panicked or was cancelled.
    #[error("Task failed: {0}")]
    Dispatch(String),

    /// Remote state that cannot be reconciled with the local store.
    #[error("Sync error: {0}")]
    Sync(String),
}

impl Error {
    /// Returns true if the error reports a missing row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Storage(StorageError::NotFound { .. }))
    }

    /// Full description including the error's source chain.
    pub fn describe(&self) -> String {
        match self {
            Error::Network(err) => err.describe(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
