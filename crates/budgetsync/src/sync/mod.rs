//! Reconciliation with the collaboration backend.

mod service;
mod state;

pub use service::{SyncReport, SyncService};
pub use state::SyncState;
