//! In-memory store backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use super::{ExpiryStore, ItemKey, Result, StoreError};

/// In-memory store backend for testing.
///
/// Items carry numeric attributes only; payload is irrelevant to expiry.
/// Uses a `BTreeMap` wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<tokio::sync::RwLock<BTreeMap<ItemKey, HashMap<String, i64>>>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item with no attributes beyond its key.
    pub async fn put_item(&self, client_id: &str, id: &str) {
        let mut items = self.items.write().await;
        items.insert(ItemKey::new(client_id, id), HashMap::new());
    }

    /// Reads a single numeric attribute, `None` if the item or attribute
    /// is absent.
    pub async fn attribute(&self, key: &ItemKey, attribute: &str) -> Option<i64> {
        let items = self.items.read().await;
        items.get(key).and_then(|attrs| attrs.get(attribute)).copied()
    }

    /// Returns every key in the store, across all partitions.
    pub async fn all_keys(&self) -> Vec<ItemKey> {
        let items = self.items.read().await;
        items.keys().cloned().collect()
    }
}

#[async_trait]
impl ExpiryStore for MemoryStore {
    async fn query_partition_keys(&self, client_id: &str) -> Result<Vec<ItemKey>> {
        let items = self.items.read().await;
        Ok(items
            .keys()
            .filter(|key| key.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn update_attribute(&self, key: &ItemKey, attribute: &str, value: i64) -> Result<()> {
        let mut items = self.items.write().await;
        match items.get_mut(key) {
            Some(attrs) => {
                attrs.insert(attribute.to_string(), value);
                Ok(())
            }
            None => Err(StoreError::Update {
                key: key.clone(),
                message: "item does not exist".to_string(),
            }),
        }
    }
}
