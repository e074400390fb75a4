//! The store boundary.
//!
//! Everything below [`ExpiryStore`] is an external partitioned key-value
//! store; this module defines the trait, the key projection, the error
//! taxonomy, and an in-memory backend for tests.

mod error;
mod memory;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::ExpiryStore;
pub use types::ItemKey;
