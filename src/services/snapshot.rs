//! Snapshot construction from bucket listings.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{errors::StorageResult, models::Snapshot};
use crate::ports::storage::VersionedBucket;

/// Reconstruct what a live read would have returned at instant `t`: every
/// version written at or before `t` and not yet superseded or deleted at `t`.
/// Listing failures propagate; a failed listing is never returned as an
/// empty snapshot, which would otherwise make the planner emit a
/// delete-everything plan.
pub async fn snapshot_at(
    bucket: &dyn VersionedBucket,
    t: DateTime<Utc>,
) -> StorageResult<Snapshot> {
    let versions = bucket.list_versions().await?;
    let mut snapshot = Snapshot::new();
    for attrs in versions {
        if attrs.live_at(t) {
            // Listing order is preserved: on duplicates the last one wins.
            snapshot.insert(attrs.name.clone(), attrs);
        }
    }
    debug!(objects = snapshot.len(), at = %t, "built historical snapshot");
    Ok(snapshot)
}

/// Snapshot of the live objects as they are now, each at its latest
/// generation.
pub async fn snapshot_current(bucket: &dyn VersionedBucket) -> StorageResult<Snapshot> {
    let live = bucket.list_live().await?;
    let mut snapshot = Snapshot::new();
    for attrs in live {
        snapshot.insert(attrs.name.clone(), attrs);
    }
    debug!(objects = snapshot.len(), "built current snapshot");
    Ok(snapshot)
}
