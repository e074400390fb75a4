//! Integration tests against a local DynamoDB.
//!
//! Start one with `docker run -p 8000:8000 amazon/dynamodb-local`, export
//! dummy credentials (`AWS_ACCESS_KEY_ID=local AWS_SECRET_ACCESS_KEY=local`),
//! then run `cargo test -p ttlsweep -- --ignored`.
//!
//! Each test uses its own scratch table so tests stay independent.

use aws_sdk_dynamodb::Client;

use ttlsweep::storage::dynamodb::admin::{self, TableRow};
use ttlsweep::storage::dynamodb::{create_client, AwsConfig, DynamoStore};
use ttlsweep_core::expiry::{schedule_expiry, ExpiryError};
use ttlsweep_core::store::{ExpiryStore, ItemKey, StoreError};

async fn fresh_table(table_name: &str) -> Client {
    let client = create_client(&AwsConfig::default()).await.unwrap();
    admin::reset_table(&client, table_name).await.unwrap();
    client
}

/// The five-record fixture: three records under client1, two under client2.
fn seed_rows() -> Vec<TableRow> {
    vec![
        TableRow::new("client1", "client1"),
        TableRow::new("client2", "client2"),
        TableRow::new("client1", "123"),
        TableRow::new("client2", "123"),
        TableRow::new("client1", "456"),
    ]
}

#[tokio::test]
#[ignore = "requires local DynamoDB"]
async fn expire_marks_only_the_target_partition() {
    let table = "ttlsweep-test-expire";
    let client = fresh_table(table).await;
    admin::put_rows(&client, table, &seed_rows()).await.unwrap();

    let store = DynamoStore::new(client.clone(), table);
    let updated = schedule_expiry(&store, "client1", 12345678).await.unwrap();
    assert_eq!(updated, 3);

    let rows = admin::scan_table(&client, table).await.unwrap();
    assert_eq!(
        rows,
        vec![
            TableRow::new("client1", "123").with_ttl(12345678),
            TableRow::new("client1", "456").with_ttl(12345678),
            TableRow::new("client1", "client1").with_ttl(12345678),
            TableRow::new("client2", "123"),
            TableRow::new("client2", "client2"),
        ]
    );

    admin::delete_table(&client, table).await.unwrap();
}

#[tokio::test]
#[ignore = "requires local DynamoDB"]
async fn expire_empty_partition_reports_zero() {
    let table = "ttlsweep-test-empty";
    let client = fresh_table(table).await;

    let store = DynamoStore::new(client.clone(), table);
    let updated = schedule_expiry(&store, "client1", 12345678).await.unwrap();
    assert_eq!(updated, 0);

    admin::delete_table(&client, table).await.unwrap();
}

#[tokio::test]
#[ignore = "requires local DynamoDB"]
async fn expire_is_idempotent_and_latest_write_wins() {
    let table = "ttlsweep-test-idempotent";
    let client = fresh_table(table).await;
    admin::put_rows(&client, table, &seed_rows()).await.unwrap();

    let store = DynamoStore::new(client.clone(), table);
    schedule_expiry(&store, "client1", 12345678).await.unwrap();
    let first = admin::scan_table(&client, table).await.unwrap();

    // Same timestamp again: no observable change.
    schedule_expiry(&store, "client1", 12345678).await.unwrap();
    assert_eq!(admin::scan_table(&client, table).await.unwrap(), first);

    // A later timestamp overwrites.
    schedule_expiry(&store, "client1", 22345678).await.unwrap();
    let rows = admin::scan_table(&client, table).await.unwrap();
    for row in rows.iter().filter(|r| r.client_id == "client1") {
        assert_eq!(row.ttl, Some(22345678));
    }
    for row in rows.iter().filter(|r| r.client_id == "client2") {
        assert_eq!(row.ttl, None);
    }

    admin::delete_table(&client, table).await.unwrap();
}

#[tokio::test]
#[ignore = "requires local DynamoDB"]
async fn paginated_query_returns_the_full_key_set() {
    let table = "ttlsweep-test-pagination";
    let client = fresh_table(table).await;

    let rows: Vec<TableRow> = (0..7)
        .map(|i| TableRow::new("client1", format!("{i:03}")))
        .chain(std::iter::once(TableRow::new("client2", "123")))
        .collect();
    admin::put_rows(&client, table, &rows).await.unwrap();

    // Page size 2 forces four pages for the seven client1 items.
    let store = DynamoStore::new(client.clone(), table).with_page_size(2);
    let mut keys = store.query_partition_keys("client1").await.unwrap();
    keys.sort();

    let expected: Vec<ItemKey> = (0..7)
        .map(|i| ItemKey::new("client1", format!("{i:03}")))
        .collect();
    assert_eq!(keys, expected);

    // Paginated expiry still updates every item exactly once.
    let updated = schedule_expiry(&store, "client1", 12345678).await.unwrap();
    assert_eq!(updated, 7);

    admin::delete_table(&client, table).await.unwrap();
}

#[tokio::test]
#[ignore = "requires local DynamoDB"]
async fn update_on_missing_item_fails_with_the_key() {
    let table = "ttlsweep-test-missing";
    let client = fresh_table(table).await;

    let store = DynamoStore::new(client.clone(), table);
    let key = ItemKey::new("client1", "ghost");
    let result = store.update_attribute(&key, "TTL", 12345678).await;

    match result {
        Err(StoreError::Update { key: failed, .. }) => assert_eq!(failed, key),
        other => panic!("expected Update error, got {:?}", other),
    }

    // The conditional update must not have upserted a ghost row.
    assert!(admin::scan_table(&client, table).await.unwrap().is_empty());

    admin::delete_table(&client, table).await.unwrap();
}

#[tokio::test]
#[ignore = "requires local DynamoDB"]
async fn query_against_missing_table_aborts_before_updates() {
    let client = create_client(&AwsConfig::default()).await.unwrap();
    let store = DynamoStore::new(client, "ttlsweep-test-no-such-table");

    let result = schedule_expiry(&store, "client1", 12345678).await;
    assert!(matches!(result, Err(ExpiryError::Query(_))));
}
