use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store metadata kept alongside the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Human-readable store name.
    pub name: String,
    /// When the store was first created.
    pub created: DateTime<Utc>,
    /// When a record was last added or removed.
    pub modified: DateTime<Utc>,
}

impl StoreMetadata {
    /// Create metadata with the given name and current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
