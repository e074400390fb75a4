use async_trait::async_trait;

use super::{ItemKey, Result};

/// Boundary to the partitioned key-value store.
///
/// Implementations are stateless between calls; pagination is followed
/// internally using an explicit continuation value, never an implicit
/// session cursor.
#[async_trait]
pub trait ExpiryStore: Send + Sync {
    /// Returns the key of every item in the given partition.
    ///
    /// The query is key-projected and follows pagination until the store
    /// reports no more pages: no key is omitted and no key is duplicated
    /// across pages. If any page fails, the whole call fails with
    /// [`StoreError::Query`](super::StoreError::Query); a partial key set
    /// is never returned.
    async fn query_partition_keys(&self, client_id: &str) -> Result<Vec<ItemKey>>;

    /// Sets a single numeric attribute on the addressed item.
    ///
    /// Idempotent: reapplying the same value yields the same item. Fails
    /// with [`StoreError::Update`](super::StoreError::Update) if the item
    /// does not exist or the store rejects the write.
    async fn update_attribute(&self, key: &ItemKey, attribute: &str, value: i64) -> Result<()>;
}
