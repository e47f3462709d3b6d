//! Snapshot caching and publication.
//!
//! - [`SnapshotCache`]: mutex-guarded latest full list of one entity type
//! - [`snapshot_channel`]: single-producer, multi-consumer channel that
//!   replays the latest snapshot to every new subscriber

mod pubsub;
mod snapshot;

pub use pubsub::{
    snapshot_channel, BoxStream, SnapshotPublisher, SnapshotStream, SnapshotSubscription,
};
pub use snapshot::{Snapshot, SnapshotCache};
