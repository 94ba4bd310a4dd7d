use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, error, info};

use super::schema::create_tables;
use super::{KeyValueStore, StorageError};

/// SQLite-backed key/value store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the store at `path`
    ///
    /// Enables WAL mode and a busy timeout, then makes sure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!("Opening database connection: {:?}", path);

        let conn = Connection::open(path)?;

        // journal_mode returns a value, so it has to go through query_row
        let _journal_mode = conn.query_row("PRAGMA journal_mode = WAL", [], |row| {
            row.get::<_, String>(0)
        })?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        create_tables(&conn).map_err(|e| {
            error!("Failed to create database tables: {}", e);
            e
        })?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        debug!(key, bytes = value.len(), "Writing storage entry");
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        debug!(key, "Removing storage entry");
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("greeting", "\"hello\"").unwrap();
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("\"hello\""));

        store.set("greeting", "\"bye\"").unwrap();
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("\"bye\""));

        store.remove("greeting").unwrap();
        assert_eq!(store.get("greeting").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.remove("never-written").is_ok());
    }

    #[test]
    fn test_file_store_persists_across_connections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cms.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("cms-dynamic-sections", "[]").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("cms-dynamic-sections").unwrap().as_deref(), Some("[]"));
    }
}
