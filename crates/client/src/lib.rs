//! budgetsync_client - HTTP client for the budgetsync collaboration backend.

pub mod client;
pub mod error;
mod source;

pub use client::BudgetsyncClient;
pub use error::{ClientError, Result};
