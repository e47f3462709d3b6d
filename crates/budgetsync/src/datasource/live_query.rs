//! Store-driven live query.

use std::future::Future;
use std::sync::Arc;

use budgetsync_core::storage::{Result, StorageError, Table, TableChange};
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::cache::{
    snapshot_channel, Snapshot, SnapshotCache, SnapshotPublisher, SnapshotStream,
    SnapshotSubscription,
};

/// Keeps a [`SnapshotCache`] and snapshot channel in step with one table.
///
/// A single background task owns the publisher, so snapshots of one table
/// are installed in commit order. Dropping the live query (or calling
/// [`LiveQuery::shutdown`]) stops the task and completes every open stream.
///
/// A failed initial load stops the task as well; the error is kept and
/// returned by [`LiveQuery::ready`].
#[derive(Debug)]
pub struct LiveQuery<T> {
    cache: Arc<SnapshotCache<T>>,
    subscription: SnapshotSubscription<T>,
    failure: Arc<OnceCell<StorageError>>,
    task: JoinHandle<()>,
}

impl<T> LiveQuery<T>
where
    T: Send + Sync + 'static,
{
    /// Starts the live query on `handle`.
    ///
    /// `changes` must be subscribed before the call so that no commit between
    /// the subscription and the initial load is missed.
    pub fn spawn<L, Fut>(
        handle: &Handle,
        table: Table,
        changes: broadcast::Receiver<TableChange>,
        load: L,
    ) -> Self
    where
        L: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        let cache = Arc::new(SnapshotCache::new());
        let failure = Arc::new(OnceCell::new());
        let (publisher, subscription) = snapshot_channel();
        let task = handle.spawn(run(
            table,
            changes,
            Arc::clone(&cache),
            publisher,
            Arc::clone(&failure),
            load,
        ));

        Self {
            cache,
            subscription,
            failure,
            task,
        }
    }

    /// Waits for the initial load.
    ///
    /// Returns the load error if the first read failed, or `ConnectionFailed`
    /// if the query was stopped before anything was loaded.
    pub async fn ready(&self) -> Result<Snapshot<T>> {
        match self.subscription.first().await {
            Some(snapshot) => Ok(snapshot),
            None => Err(self.failure.get().cloned().unwrap_or_else(|| {
                StorageError::ConnectionFailed("live query stopped before loading".to_string())
            })),
        }
    }

    pub fn cache(&self) -> &SnapshotCache<T> {
        &self.cache
    }

    pub fn subscription(&self) -> SnapshotSubscription<T> {
        self.subscription.clone()
    }

    pub fn stream(&self) -> SnapshotStream<T> {
        self.subscription.stream()
    }

    /// Stops re-reading. Open streams complete once the task has stopped.
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T, L, Fut>(
    table: Table,
    mut changes: broadcast::Receiver<TableChange>,
    cache: Arc<SnapshotCache<T>>,
    publisher: SnapshotPublisher<T>,
    failure: Arc<OnceCell<StorageError>>,
    load: L,
) where
    L: Fn() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    if let Err(e) = refresh(table, &cache, &publisher, &load).await {
        tracing::error!(?table, error = %e, "Initial load failed, stopping live query");
        // Recorded before the publisher drops, so waiters see the error.
        let _ = failure.set(e);
        return;
    }

    loop {
        match changes.recv().await {
            Ok(change) if change.affects(table) => {}
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(?table, skipped, "Change feed lagged, re-reading");
            }
            Err(RecvError::Closed) => break,
        }

        // Coalesce notifications that piled up while we were busy.
        loop {
            match changes.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if let Err(e) = refresh(table, &cache, &publisher, &load).await {
            tracing::warn!(?table, error = %e, "Live query re-read failed, keeping previous snapshot");
        }
    }

    tracing::debug!(?table, "Live query stopped");
}

async fn refresh<T, L, Fut>(
    table: Table,
    cache: &SnapshotCache<T>,
    publisher: &SnapshotPublisher<T>,
    load: &L,
) -> Result<()>
where
    L: Fn() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let snapshot = Arc::new(load().await?);
    tracing::trace!(?table, count = snapshot.len(), "Installing snapshot");
    // Cache first, so a subscriber that sees a snapshot never reads
    // an older cache afterwards.
    cache.replace(Arc::clone(&snapshot)).await;
    publisher.publish(snapshot);
    Ok(())
}
