use thiserror::Error;

use super::ItemKey;

/// Errors that can occur against the backing store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Establishing a session to the store failed; nothing was attempted.
    #[error("Session failed: {0}")]
    Session(String),

    /// A page of a partition query failed. The caller never receives a
    /// partial key set; the whole query is reported as failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// A single item's attribute update failed.
    #[error("Update failed for {key}: {message}")]
    Update { key: ItemKey, message: String },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        let error = StoreError::Session("no credentials".to_string());
        assert_eq!(error.to_string(), "Session failed: no credentials");
    }

    #[test]
    fn test_query_error_display() {
        let error = StoreError::Query("Table not found".to_string());
        assert_eq!(error.to_string(), "Query failed: Table not found");
    }

    #[test]
    fn test_update_error_display_carries_key() {
        let error = StoreError::Update {
            key: ItemKey::new("client1", "123"),
            message: "item does not exist".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Update failed for client1/123: item does not exist"
        );
    }
}
