//! Table administration for test and setup tooling.
//!
//! Create/delete the expiry table, wait for it to change state, scan it
//! into typed rows, and seed it. Operator runs never touch these; the
//! integration tests do.

use std::collections::HashMap;
use std::time::Duration;

use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use thiserror::Error;

use ttlsweep_core::expiry::TTL_ATTRIBUTE;

use super::store::{CLIENT_ID_ATTR, ID_ATTR};

/// Result type alias for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;

/// Errors that can occur during table administration.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Timeout waiting for table '{0}' to change state")]
    StateTimeout(String),

    #[error("Malformed row in scan: {0}")]
    MalformedRow(String),
}

/// A table row reduced to the attributes expiry cares about.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TableRow {
    pub client_id: String,
    pub id: String,
    pub ttl: Option<i64>,
}

impl TableRow {
    /// Creates a row with no TTL scheduled.
    pub fn new(client_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            id: id.into(),
            ttl: None,
        }
    }

    /// Sets the row's TTL timestamp.
    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Creates the expiry table (ClientID HASH, ID RANGE, pay-per-request) and
/// waits until it is ACTIVE.
pub async fn create_table(client: &Client, table_name: &str) -> Result<()> {
    let key_schema = vec![
        KeySchemaElement::builder()
            .attribute_name(CLIENT_ID_ATTR)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| AdminError::AwsSdk(e.to_string()))?,
        KeySchemaElement::builder()
            .attribute_name(ID_ATTR)
            .key_type(KeyType::Range)
            .build()
            .map_err(|e| AdminError::AwsSdk(e.to_string()))?,
    ];

    let attribute_definitions = vec![
        AttributeDefinition::builder()
            .attribute_name(CLIENT_ID_ATTR)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| AdminError::AwsSdk(e.to_string()))?,
        AttributeDefinition::builder()
            .attribute_name(ID_ATTR)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| AdminError::AwsSdk(e.to_string()))?,
    ];

    client
        .create_table()
        .table_name(table_name)
        .set_key_schema(Some(key_schema))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(|e| AdminError::AwsSdk(e.to_string()))?;

    wait_for_table(client, table_name, true).await
}

/// Deletes the table and waits until it is gone. A table that does not
/// exist counts as success.
pub async fn delete_table(client: &Client, table_name: &str) -> Result<()> {
    if let Err(err) = client.delete_table().table_name(table_name).send().await {
        let err = err.into_service_error();
        if table_missing_on_delete(&err) {
            return Ok(());
        }
        return Err(AdminError::AwsSdk(format!("{:?}", err)));
    }

    wait_for_table(client, table_name, false).await
}

/// Deletes and recreates the table, leaving it empty and ACTIVE.
pub async fn reset_table(client: &Client, table_name: &str) -> Result<()> {
    delete_table(client, table_name).await?;
    create_table(client, table_name).await
}

/// Scans the whole table into typed rows, sorted by (ClientID, ID).
pub async fn scan_table(client: &Client, table_name: &str) -> Result<Vec<TableRow>> {
    let mut rows = Vec::new();
    let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;

    loop {
        let mut request = client.scan().table_name(table_name);
        if let Some(start_key) = exclusive_start_key.take() {
            request = request.set_exclusive_start_key(Some(start_key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdminError::AwsSdk(e.to_string()))?;

        for item in response.items() {
            rows.push(row_from_item(item)?);
        }

        match response.last_evaluated_key {
            Some(start_key) if !start_key.is_empty() => exclusive_start_key = Some(start_key),
            _ => break,
        }
    }

    rows.sort();
    Ok(rows)
}

/// Puts seed rows into the table.
pub async fn put_rows(client: &Client, table_name: &str, rows: &[TableRow]) -> Result<()> {
    for row in rows {
        let mut request = client
            .put_item()
            .table_name(table_name)
            .item(CLIENT_ID_ATTR, AttributeValue::S(row.client_id.clone()))
            .item(ID_ATTR, AttributeValue::S(row.id.clone()));

        if let Some(ttl) = row.ttl {
            request = request.item(TTL_ATTRIBUTE, AttributeValue::N(ttl.to_string()));
        }

        request
            .send()
            .await
            .map_err(|e| AdminError::AwsSdk(e.to_string()))?;
    }

    Ok(())
}

fn row_from_item(item: &HashMap<String, AttributeValue>) -> Result<TableRow> {
    let client_id = item
        .get(CLIENT_ID_ATTR)
        .and_then(|value| value.as_s().ok())
        .ok_or_else(|| AdminError::MalformedRow(format!("missing {CLIENT_ID_ATTR}")))?;
    let id = item
        .get(ID_ATTR)
        .and_then(|value| value.as_s().ok())
        .ok_or_else(|| AdminError::MalformedRow(format!("missing {ID_ATTR}")))?;

    let ttl = match item.get(TTL_ATTRIBUTE) {
        Some(value) => Some(
            value
                .as_n()
                .ok()
                .and_then(|n| n.parse::<i64>().ok())
                .ok_or_else(|| AdminError::MalformedRow(format!("non-numeric {TTL_ATTRIBUTE}")))?,
        ),
        None => None,
    };

    Ok(TableRow {
        client_id: client_id.clone(),
        id: id.clone(),
        ttl,
    })
}

/// Fetches the table status, `None` if the table does not exist.
async fn table_status(client: &Client, table_name: &str) -> Result<Option<TableStatus>> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(response) => Ok(response.table().and_then(|t| t.table_status().cloned())),
        Err(err) => {
            let err = err.into_service_error();
            if table_missing_on_describe(&err) {
                Ok(None)
            } else {
                Err(AdminError::AwsSdk(format!("{:?}", err)))
            }
        }
    }
}

async fn wait_for_table(client: &Client, table_name: &str, should_exist: bool) -> Result<()> {
    let max_attempts = 60;
    let delay = Duration::from_secs(2);

    for _ in 0..max_attempts {
        let status = table_status(client, table_name).await?;
        match (should_exist, status) {
            (true, Some(TableStatus::Active)) => return Ok(()),
            (false, None) => return Ok(()),
            _ => tokio::time::sleep(delay).await,
        }
    }

    Err(AdminError::StateTimeout(table_name.to_string()))
}

/// True when DeleteTable reported the table as already absent.
fn table_missing_on_delete(err: &DeleteTableError) -> bool {
    matches!(err, DeleteTableError::ResourceNotFoundException(_))
}

/// True when DescribeTable reported the table as absent.
fn table_missing_on_describe(err: &DescribeTableError) -> bool {
    matches!(err, DescribeTableError::ResourceNotFoundException(_))
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::error::{
        InternalServerError, ResourceInUseException, ResourceNotFoundException,
    };

    use super::*;

    #[test]
    fn test_delete_detects_missing_table() {
        let err = DeleteTableError::ResourceNotFoundException(
            ResourceNotFoundException::builder()
                .message("Requested resource not found: Table: ttlsweep-test not found")
                .build(),
        );
        assert!(table_missing_on_delete(&err));
    }

    #[test]
    fn test_delete_does_not_swallow_other_service_errors() {
        let err = DeleteTableError::ResourceInUseException(
            ResourceInUseException::builder().build(),
        );
        assert!(!table_missing_on_delete(&err));
    }

    #[test]
    fn test_describe_detects_missing_table() {
        let err = DescribeTableError::ResourceNotFoundException(
            ResourceNotFoundException::builder().build(),
        );
        assert!(table_missing_on_describe(&err));
    }

    #[test]
    fn test_describe_does_not_swallow_other_service_errors() {
        let err =
            DescribeTableError::InternalServerError(InternalServerError::builder().build());
        assert!(!table_missing_on_describe(&err));
    }

    fn item(client_id: &str, id: &str, ttl: Option<i64>) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::from([
            (
                CLIENT_ID_ATTR.to_string(),
                AttributeValue::S(client_id.to_string()),
            ),
            (ID_ATTR.to_string(), AttributeValue::S(id.to_string())),
        ]);
        if let Some(ttl) = ttl {
            item.insert(TTL_ATTRIBUTE.to_string(), AttributeValue::N(ttl.to_string()));
        }
        item
    }

    #[test]
    fn test_row_from_item_without_ttl() {
        let row = row_from_item(&item("client1", "123", None)).unwrap();
        assert_eq!(row, TableRow::new("client1", "123"));
    }

    #[test]
    fn test_row_from_item_with_ttl() {
        let row = row_from_item(&item("client1", "123", Some(12345678))).unwrap();
        assert_eq!(row, TableRow::new("client1", "123").with_ttl(12345678));
    }

    #[test]
    fn test_row_from_item_non_numeric_ttl() {
        let mut malformed = item("client1", "123", None);
        malformed.insert(
            TTL_ATTRIBUTE.to_string(),
            AttributeValue::S("tomorrow".to_string()),
        );

        let result = row_from_item(&malformed);
        assert!(matches!(result, Err(AdminError::MalformedRow(_))));
    }

    #[test]
    fn test_rows_sort_by_partition_then_sort_key() {
        let mut rows = vec![
            TableRow::new("client2", "123"),
            TableRow::new("client1", "456"),
            TableRow::new("client1", "123"),
        ];
        rows.sort();
        assert_eq!(
            rows,
            vec![
                TableRow::new("client1", "123"),
                TableRow::new("client1", "456"),
                TableRow::new("client2", "123"),
            ]
        );
    }
}
