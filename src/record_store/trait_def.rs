//! RecordStore trait definition.

use anyhow::Result;

use crate::movies::MetadataRecord;

/// A stored record with its insertion timestamp (unix epoch seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub record: MetadataRecord,
    pub stored_at: i64,
}

/// Trait for record storage backends.
pub trait RecordStore: Send + Sync {
    /// Get the stored record for a cache key, if any.
    fn get(&self, key: &str) -> Result<Option<StoredRecord>>;

    /// Insert or overwrite the record for a cache key.
    fn put(&self, key: &str, stored: &StoredRecord) -> Result<()>;

    /// Whether an entry is present for a cache key.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Number of stored entries.
    fn count(&self) -> Result<usize>;
}
