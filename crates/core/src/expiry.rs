//! The retention updater.
//!
//! Given a partition key and an expiry timestamp, queries the store for
//! every key in the partition and stamps each item with the TTL attribute.
//! The store's own background reaper removes the items once the timestamp
//! elapses; nothing is hard-deleted here.

use thiserror::Error;

use crate::store::{ExpiryStore, StoreError};

/// Name of the store attribute holding the expiry timestamp.
pub const TTL_ATTRIBUTE: &str = "TTL";

/// Errors that can occur while scheduling expiry for a partition.
#[derive(Debug, Error)]
pub enum ExpiryError {
    /// The partition query failed; no updates were attempted.
    #[error("querying partition keys: {0}")]
    Query(#[source] StoreError),

    /// One or more item updates failed. Updates that already succeeded are
    /// not rolled back and remaining items were still attempted.
    #[error(
        "updated {updated} of {attempted} items in partition '{partition_key}', {} failed",
        failures.len()
    )]
    Updates {
        partition_key: String,
        attempted: usize,
        updated: usize,
        failures: Vec<StoreError>,
    },
}

/// Result type for expiry operations.
pub type Result<T> = std::result::Result<T, ExpiryError>;

/// Schedules deferred deletion for every item in a partition.
///
/// Queries the store for all keys under `partition_key`, then sets each
/// item's [`TTL_ATTRIBUTE`] to `expires_at` (epoch seconds). Returns the
/// number of items updated; an empty partition succeeds with 0.
///
/// A query failure aborts the whole call before any update is issued. An
/// individual update failure does not halt the remaining keys, but the call
/// as a whole reports [`ExpiryError::Updates`] with every failure: the
/// operation is best-effort per item, not atomic across the partition.
/// Re-invoking with the same timestamp is idempotent; a later timestamp
/// overwrites the earlier one.
pub async fn schedule_expiry<S: ExpiryStore + ?Sized>(
    store: &S,
    partition_key: &str,
    expires_at: i64,
) -> Result<usize> {
    tracing::info!(partition_key, expires_at, "scheduling expiry");

    let keys = store
        .query_partition_keys(partition_key)
        .await
        .map_err(ExpiryError::Query)?;
    let attempted = keys.len();

    let mut updated = 0;
    let mut failures = Vec::new();
    for key in &keys {
        match store.update_attribute(key, TTL_ATTRIBUTE, expires_at).await {
            Ok(()) => updated += 1,
            Err(error) => {
                tracing::warn!(%key, %error, "failed to set TTL");
                failures.push(error);
            }
        }
    }

    if !failures.is_empty() {
        return Err(ExpiryError::Updates {
            partition_key: partition_key.to_string(),
            attempted,
            updated,
            failures,
        });
    }

    tracing::info!(partition_key, updated, "expiry scheduled");
    Ok(updated)
}
