use std::fmt;

/// Composite key addressing a single item in the store.
///
/// `client_id` is the partition key and `id` the sort key within the
/// partition. This is the minimal projection needed to target an item for
/// update; payload attributes are never transferred.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub client_id: String,
    pub id: String,
}

impl ItemKey {
    /// Creates a key from a partition key and a sort key.
    pub fn new(client_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.client_id, self.id)
    }
}
