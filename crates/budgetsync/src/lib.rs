//! Local data consistency and sync layer for budgets.
//!
//! A persistent store (SQLite or in-memory) publishes a change feed. Live
//! queries re-read the affected table and publish full snapshots into a
//! mutex-guarded cache and a latest-value channel. Repositories and use
//! cases sit on top, and the sync service reconciles shared budgets with
//! the collaboration backend.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod datasource;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod repository;
pub mod storage;
pub mod sync;
pub mod usecase;

pub use error::{Error, Result};
