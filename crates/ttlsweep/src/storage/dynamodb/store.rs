//! DynamoDB implementation of the expiry store.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use ttlsweep_core::store::{ExpiryStore, ItemKey, Result, StoreError};

use super::error::{map_query_error, map_update_item_error};

/// Partition key attribute name.
pub const CLIENT_ID_ATTR: &str = "ClientID";
/// Sort key attribute name.
pub const ID_ATTR: &str = "ID";
/// Key-only projection used by partition queries.
const KEY_PROJECTION: &str = "ClientID, ID";

/// DynamoDB-backed expiry store.
///
/// The table name is an explicit constructor argument rather than process
/// state, so tests can point at a scratch table.
pub struct DynamoStore {
    client: Client,
    table_name: String,
    page_size: Option<i32>,
}

impl DynamoStore {
    /// Creates a new store over the given client and table.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            page_size: None,
        }
    }

    /// Caps the number of items fetched per query page.
    ///
    /// Tests use this to force pagination; production queries let DynamoDB
    /// pick the page size.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl ExpiryStore for DynamoStore {
    async fn query_partition_keys(&self, client_id: &str) -> Result<Vec<ItemKey>> {
        let mut keys = Vec::new();
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut pages = 0usize;

        // LastEvaluatedKey is the explicit continuation value; the next page
        // is only requested once the current one is consumed.
        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("ClientID = :client_id")
                .expression_attribute_values(
                    ":client_id",
                    AttributeValue::S(client_id.to_string()),
                )
                .projection_expression(KEY_PROJECTION);

            if let Some(page_size) = self.page_size {
                request = request.limit(page_size);
            }
            if let Some(start_key) = exclusive_start_key.take() {
                request = request.set_exclusive_start_key(Some(start_key));
            }

            let response = request.send().await.map_err(map_query_error)?;
            pages += 1;

            for item in response.items() {
                keys.push(key_from_item(item)?);
            }

            match response.last_evaluated_key {
                Some(start_key) if !start_key.is_empty() => {
                    exclusive_start_key = Some(start_key)
                }
                _ => break,
            }
        }

        tracing::debug!(client_id, pages, keys = keys.len(), "partition query complete");
        Ok(keys)
    }

    async fn update_attribute(&self, key: &ItemKey, attribute: &str, value: i64) -> Result<()> {
        // "TTL" is a DynamoDB reserved word, so the attribute always goes
        // through an expression name. The condition keeps UpdateItem from
        // upserting a key-only item when the target is gone.
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(CLIENT_ID_ATTR, AttributeValue::S(key.client_id.clone()))
            .key(ID_ATTR, AttributeValue::S(key.id.clone()))
            .update_expression("SET #attr = :value")
            .condition_expression("attribute_exists(ClientID)")
            .expression_attribute_names("#attr", attribute)
            .expression_attribute_values(":value", AttributeValue::N(value.to_string()))
            .send()
            .await
            .map_err(|e| map_update_item_error(e, key))?;

        Ok(())
    }
}

/// Extract an [`ItemKey`] from a key-projected query item.
fn key_from_item(item: &HashMap<String, AttributeValue>) -> Result<ItemKey> {
    let client_id = get_string(item, CLIENT_ID_ATTR)?;
    let id = get_string(item, ID_ATTR)?;
    Ok(ItemKey::new(client_id, id))
}

fn get_string(item: &HashMap<String, AttributeValue>, attribute: &str) -> Result<String> {
    item.get(attribute)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::Query(format!("missing or non-string attribute: {attribute}")))
}
