//! Cache gateway: cache-key derivation and the cache-or-fetch decision.
//!
//! Only successful resolutions are ever stored; a failed computation leaves
//! the cache untouched so a later identical request retries the upstream.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::movies::MetadataRecord;
use crate::query::MovieQuery;
use crate::record_store::{RecordStore, StoredRecord};
use crate::server::metrics::record_cache_lookup;

/// Deterministic cache key for a sanitized query: title then year,
/// concatenated.
pub fn cache_key(query: &MovieQuery) -> String {
    format!("{}{}", query.title, query.year)
}

/// Read/write front over the record store, with an optional TTL.
///
/// TTL of `None` means entries never expire. Expiry is checked on read;
/// an expired entry is treated as a miss and overwritten by the next
/// successful resolution for the same key.
pub struct CacheGateway {
    store: Arc<dyn RecordStore>,
    ttl: Option<Duration>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn RecordStore>, ttl: Option<Duration>) -> Self {
        Self { store, ttl }
    }

    /// Look up a record, honoring the TTL.
    pub fn get(&self, key: &str) -> Result<Option<MetadataRecord>> {
        let stored = match self.store.get(key)? {
            Some(stored) => stored,
            None => {
                record_cache_lookup("miss");
                return Ok(None);
            }
        };

        if let Some(ttl) = self.ttl {
            let age = chrono::Utc::now().timestamp() - stored.stored_at;
            if age > ttl.as_secs() as i64 {
                debug!("Cache entry for {:?} expired ({}s old)", key, age);
                record_cache_lookup("expired");
                return Ok(None);
            }
        }

        record_cache_lookup("hit");
        Ok(Some(stored.record))
    }

    /// Store a freshly resolved record under `key`.
    pub fn put(&self, key: &str, record: &MetadataRecord) -> Result<()> {
        self.store.put(
            key,
            &StoredRecord {
                record: record.clone(),
                stored_at: chrono::Utc::now().timestamp(),
            },
        )?;
        crate::server::metrics::set_cache_entries(self.store.count()?);
        Ok(())
    }

    /// Number of stored entries (expired entries included).
    pub fn entries(&self) -> Result<usize> {
        self.store.count()
    }
}
