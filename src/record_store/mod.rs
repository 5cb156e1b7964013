//! Persistence backing the cache gateway.
//!
//! Only the read/write contract matters to the pipeline; the SQLite
//! implementation is the production backend.

mod sqlite_store;
mod trait_def;

pub use sqlite_store::SqliteRecordStore;
pub use trait_def::{RecordStore, StoredRecord};
