//! DynamoDB backend and table tooling for the ttlsweep binary.
//!
//! Exposed as a library so the integration tests can drive the store and
//! the table admin operations directly.

pub mod storage;
