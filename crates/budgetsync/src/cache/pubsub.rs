//! Latest-value snapshot channel.
//!
//! Built on `tokio::sync::watch`: one publisher, any number of
//! subscribers, and every new subscriber first receives the latest snapshot.
//! Slow subscribers skip intermediate snapshots but always observe the most
//! recent one.

use std::future::Future;
use std::pin::Pin;

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

use super::Snapshot;

/// Boxed, sendable stream.
pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Stream of full snapshots.
pub type SnapshotStream<T> = BoxStream<Snapshot<T>>;

/// Creates a connected publisher and subscription.
///
/// The channel starts unloaded: subscribers wait for the first
/// [`SnapshotPublisher::publish`].
pub fn snapshot_channel<T>() -> (SnapshotPublisher<T>, SnapshotSubscription<T>) {
    let (tx, rx) = watch::channel(None);
    (SnapshotPublisher { tx }, SnapshotSubscription { rx })
}

/// Producer side. Dropping it completes every open stream.
#[derive(Debug)]
pub struct SnapshotPublisher<T> {
    tx: watch::Sender<Option<Snapshot<T>>>,
}

impl<T> SnapshotPublisher<T> {
    /// Publishes a snapshot to every subscriber.
    pub fn publish(&self, snapshot: Snapshot<T>) {
        // send_replace stores the value even with no live receivers.
        self.tx.send_replace(Some(snapshot));
    }
}

/// Consumer side. Cheap to clone; each clone is independent.
#[derive(Debug)]
pub struct SnapshotSubscription<T> {
    rx: watch::Receiver<Option<Snapshot<T>>>,
}

impl<T> Clone for SnapshotSubscription<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> SnapshotSubscription<T>
where
    T: Send + Sync + 'static,
{
    /// Opens a stream that starts with the latest loaded snapshot.
    pub fn stream(&self) -> SnapshotStream<T> {
        Box::pin(WatchStream::new(self.rx.clone()).filter_map(|snapshot| snapshot))
    }

    /// Latest loaded snapshot, if any.
    pub fn latest(&self) -> Option<Snapshot<T>> {
        self.rx.borrow().clone()
    }

    /// Waits for the first loaded snapshot.
    ///
    /// Returns `None` if the publisher is dropped before anything is loaded.
    pub async fn first(&self) -> Option<Snapshot<T>> {
        self.wait_for(|_| true).await
    }

    /// Waits for a loaded snapshot matching `predicate`.
    pub fn wait_for<P>(&self, predicate: P) -> impl Future<Output = Option<Snapshot<T>>> + Send
    where
        P: Fn(&[T]) -> bool + Send,
    {
        let mut rx = self.rx.clone();
        async move {
            let value = rx
                .wait_for(move |value| {
                    value
                        .as_deref()
                        .is_some_and(|items| predicate(items.as_slice()))
                })
                .await
                .ok()?;
            value.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_new_subscriber_gets_latest() {
        let (publisher, subscription) = snapshot_channel();
        publisher.publish(Arc::new(vec![1]));
        publisher.publish(Arc::new(vec![1, 2]));

        let mut stream = subscription.stream();

        assert_eq!(*stream.next().await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unloaded_channel_emits_nothing_until_publish() {
        let (publisher, subscription) = snapshot_channel::<u8>();
        let mut stream = subscription.stream();

        let pending =
            tokio::time::timeout(std::time::Duration::from_millis(20), stream.next()).await;
        assert!(pending.is_err());

        publisher.publish(Arc::new(vec![]));
        assert!(stream.next().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let (publisher, subscription) = snapshot_channel();
        let mut first = subscription.stream();
        let mut second = subscription.clone().stream();

        publisher.publish(Arc::new(vec!["a"]));

        assert_eq!(*first.next().await.unwrap(), vec!["a"]);
        assert_eq!(*second.next().await.unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_dropping_publisher_completes_streams() {
        let (publisher, subscription) = snapshot_channel();
        publisher.publish(Arc::new(vec![7]));
        let mut stream = subscription.stream();

        drop(publisher);

        assert_eq!(*stream.next().await.unwrap(), vec![7]);
        assert!(stream.next().await.is_none());
        assert!(subscription.wait_for(|items| items.len() > 1).await.is_none());
    }

    #[tokio::test]
    async fn test_wait_for_predicate() {
        let (publisher, subscription) = snapshot_channel();
        let waiter = tokio::spawn({
            let subscription = subscription.clone();
            async move { subscription.wait_for(|items: &[u32]| items.contains(&3)).await }
        });

        publisher.publish(Arc::new(vec![1]));
        publisher.publish(Arc::new(vec![1, 3]));

        assert_eq!(*waiter.await.unwrap().unwrap(), vec![1, 3]);
        assert_eq!(*subscription.latest().unwrap(), vec![1, 3]);
    }
}
