//! SQLite-backed record store implementation.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::movies::MetadataRecord;

use super::trait_def::{RecordStore, StoredRecord};

const SCHEMA_VERSION: i64 = 1;

const CREATE_RECORDS_TABLE: &str = "
CREATE TABLE movie_records (
    cache_key TEXT PRIMARY KEY,
    record TEXT NOT NULL,
    stored_at INTEGER NOT NULL
)";

/// SQLite-backed record store with separate read and write connections.
#[derive(Clone)]
pub struct SqliteRecordStore {
    read_conn: Arc<Mutex<Connection>>,
    write_conn: Arc<Mutex<Connection>>,
}

fn create_schema_if_needed(conn: &Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version >= SCHEMA_VERSION {
        return Ok(());
    }

    info!("Creating record store schema at version {}", SCHEMA_VERSION);
    conn.execute(CREATE_RECORDS_TABLE, [])?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

impl SqliteRecordStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open record database")?;

        create_schema_if_needed(&write_conn)?;

        write_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on record write connection")?;

        let read_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open record database for reading")?;

        read_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on record read connection")?;

        let count: usize =
            read_conn.query_row("SELECT COUNT(*) FROM movie_records", [], |r| r.get(0))?;
        info!("Record store ready: {} cached records", count);

        Ok(Self {
            read_conn: Arc::new(Mutex::new(read_conn)),
            write_conn: Arc::new(Mutex::new(write_conn)),
        })
    }
}

impl RecordStore for SqliteRecordStore {
    fn get(&self, key: &str) -> Result<Option<StoredRecord>> {
        let conn = self.read_conn.lock().unwrap();
        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT record, stored_at FROM movie_records WHERE cache_key = ?1",
                params![key],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()
            .context("Failed to read record")?;

        match row {
            Some((json, stored_at)) => {
                let record: MetadataRecord =
                    serde_json::from_str(&json).context("Failed to deserialize stored record")?;
                Ok(Some(StoredRecord { record, stored_at }))
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, stored: &StoredRecord) -> Result<()> {
        let json =
            serde_json::to_string(&stored.record).context("Failed to serialize record")?;
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO movie_records (cache_key, record, stored_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(cache_key) DO UPDATE SET record = ?2, stored_at = ?3",
            params![key, json, stored.stored_at],
        )
        .context("Failed to write record")?;
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let conn = self.read_conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM movie_records WHERE cache_key = ?1",
            params![key],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.read_conn.lock().unwrap();
        let count: usize = conn.query_row("SELECT COUNT(*) FROM movie_records", [], |r| r.get(0))?;
        Ok(count)
    }
}
