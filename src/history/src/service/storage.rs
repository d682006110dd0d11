use std::{collections::HashMap, sync::Mutex};

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;
use tracing::debug;

const SCHEMA: &str = include_str!("../../../../sql/create_tables.sql");

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not (de)serialize history: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// String-keyed durable storage, the shape of a browser's local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store in a SQLite file. Opens a connection per call.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_url: String,
}

impl SqliteStore {
    pub fn open(db_url: impl Into<String>) -> Result<Self> {
        let db_url = db_url.into();
        let connection = Connection::open(&db_url)?;
        connection.execute_batch(SCHEMA)?;
        debug!("Opened key-value store at {}", db_url);
        Ok(SqliteStore { db_url })
    }

    pub fn db_url(&self) -> &str {
        &self.db_url
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let connection = Connection::open(&self.db_url)?;
        let value = connection
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let connection = Connection::open(&self.db_url)?;
        connection.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
