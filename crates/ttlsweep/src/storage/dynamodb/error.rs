//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors onto `StoreError` from `ttlsweep_core::store`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use ttlsweep_core::store::{ItemKey, StoreError};

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            StoreError::Query("Table not found".to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::Query("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::Query("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::Query("DynamoDB internal server error".to_string())
        }
        err => StoreError::Query(format!("Query failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to StoreError, carrying the failing key.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    key: &ItemKey,
) -> StoreError {
    let message = match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => "item does not exist".to_string(),
        UpdateItemError::ResourceNotFoundException(_) => "Table not found".to_string(),
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            "Throughput exceeded, please retry".to_string()
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            "Request limit exceeded, please retry".to_string()
        }
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            "Item collection size limit exceeded".to_string()
        }
        UpdateItemError::TransactionConflictException(_) => {
            "Transaction conflict, please retry".to_string()
        }
        UpdateItemError::InternalServerError(_) => "DynamoDB internal server error".to_string(),
        err => format!("UpdateItem failed: {:?}", err),
    };

    StoreError::Update {
        key: key.clone(),
        message,
    }
}
