//! DynamoDB storage backend.
//!
//! Implements [`ttlsweep_core::store::ExpiryStore`] over `aws-sdk-dynamodb`,
//! plus the table admin operations the integration tests need.

pub mod admin;
mod client;
mod error;
mod store;

pub use client::{create_client, AwsConfig};
pub use store::DynamoStore;
