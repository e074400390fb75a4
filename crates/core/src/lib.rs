//! Core domain for the ttlsweep project.
//!
//! `ttlsweep` schedules deferred deletion of a client's records in a
//! partitioned key-value store by stamping each record with a TTL attribute.
//! This crate holds the store boundary ([`store::ExpiryStore`]) and the
//! retention updater ([`expiry::schedule_expiry`]); concrete backends live in
//! the `ttlsweep` crate.

pub mod expiry;
pub mod store;
