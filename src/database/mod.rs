mod kv;
mod schema;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use kv::SqliteStore;
pub use schema::create_tables;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Stored value for '{key}' is unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value persistence used by every CMS store
///
/// Values are JSON documents; callers go through [`read_json`] and
/// [`write_json`] rather than handling raw strings.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reads and decodes the JSON value stored under `key`
///
/// Returns None if the key is absent.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

// Convert StorageError to CmsError
impl From<StorageError> for crate::CmsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DatabaseError(e) => crate::CmsError::Database(e),
            other => crate::CmsError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        write_json(&store, "numbers", &vec![3, 1, 2]).unwrap();

        let numbers: Option<Vec<i32>> = read_json(&store, "numbers").unwrap();
        assert_eq!(numbers, Some(vec![3, 1, 2]));
    }

    #[test]
    fn test_read_json_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        let value: Option<Vec<i32>> = read_json(&store, "nothing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_corrupt_value() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("broken", "{not json").unwrap();

        let result: Result<Option<Vec<i32>>, _> = read_json(&store, "broken");
        match result {
            Err(StorageError::Corrupt { key, .. }) => assert_eq!(key, "broken"),
            other => panic!("expected corrupt error, got {:?}", other.map(|_| ())),
        }
    }
}
