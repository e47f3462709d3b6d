//! Mutex-guarded snapshot cache.

use std::sync::Arc;

use tokio::sync::Mutex;

/// Immutable, shared full list of one entity type.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Latest full snapshot of one entity type.
///
/// The snapshot is only ever replaced wholesale. Readers get an `Arc` to the
/// list that was installed when they asked, so a concurrent `replace` can
/// never hand them a half-updated list. The lock is held for the pointer
/// swap or the in-memory scan only.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    current: Mutex<Snapshot<T>>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Arc::new(Vec::new())),
        }
    }

    /// Returns the last installed snapshot.
    pub async fn snapshot(&self) -> Snapshot<T> {
        Arc::clone(&*self.current.lock().await)
    }

    /// Installs a new snapshot.
    pub async fn replace(&self, items: Snapshot<T>) {
        *self.current.lock().await = items;
    }

    /// Resets the cache to an empty snapshot.
    pub async fn clear(&self) {
        self.replace(Arc::new(Vec::new())).await;
    }

    pub async fn len(&self) -> usize {
        self.current.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<T: Clone> SnapshotCache<T> {
    /// Returns the first item matching `predicate`.
    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        let current = self.current.lock().await;
        current.iter().find(|item| predicate(item)).cloned()
    }

    /// Returns every item matching `predicate`.
    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        let current = self.current.lock().await;
        current.iter().filter(|item| predicate(item)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_empty() {
        let cache: SnapshotCache<u32> = SnapshotCache::new();

        assert!(cache.is_empty().await);
        assert!(cache.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_replace_installs_whole_list() {
        let cache = SnapshotCache::new();

        cache.replace(Arc::new(vec![1, 2, 3])).await;

        assert_eq!(*cache.snapshot().await, vec![1, 2, 3]);
        assert_eq!(cache.find(|n| *n > 1).await, Some(2));
        assert_eq!(cache.filter(|n| n % 2 == 1).await, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_held_snapshot_survives_replace() {
        let cache = SnapshotCache::new();
        cache.replace(Arc::new(vec!["old"])).await;

        let held = cache.snapshot().await;
        cache.replace(Arc::new(vec!["new", "newer"])).await;

        assert_eq!(*held, vec!["old"]);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_readers_never_see_partial_lists() {
        let cache = Arc::new(SnapshotCache::new());
        let writer = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                for n in 1..=200usize {
                    cache.replace(Arc::new(vec![n; n])).await;
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            readers.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let snapshot = cache.snapshot().await;
                    // A full list of n holds exactly n copies of n.
                    assert!(snapshot.iter().all(|v| *v == snapshot.len()));
                    tokio::task::yield_now().await;
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = SnapshotCache::new();
        cache.replace(Arc::new(vec![1])).await;

        cache.clear().await;

        assert!(cache.is_empty().await);
    }
}
