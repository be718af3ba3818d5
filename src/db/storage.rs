use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::{ensure_schema, open_in_memory};

/// Key/value persistence seam. The store and the theme preference only ever
/// read and write whole serialized values under fixed keys, so this is all the
/// surface they need, and tests can swap in [`MemoryStorage`].
pub trait Storage {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Replace the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed storage used by the binary.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (and migrate) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self {
            conn: ensure_schema(db_path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: open_in_memory()?,
        })
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read `{key}`"))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("failed to write `{key}`"))?;
        Ok(())
    }
}

/// Volatile storage for tests and for running without a data directory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, handy for simulating earlier runs.
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
