use chrono::{DateTime, Utc};

/// A row in the `memories` table.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryItem {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Free-form tag, `"conversation"` unless the caller supplies one.
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}
