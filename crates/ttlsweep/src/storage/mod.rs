//! Storage backend implementations.
//!
//! Concrete implementations of the store boundary defined in
//! `ttlsweep_core::store`. DynamoDB is the only production backend; the
//! in-memory backend for unit tests lives in the core crate.

pub mod dynamodb;

pub use dynamodb::DynamoStore;
