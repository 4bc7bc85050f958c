//! Persistent string-keyed storage.
//!
//! Every engine persists its state as a JSON document under a [`StoreKey`].
//! Storage failures never abort an operation: engines keep their in-memory
//! state and log the failure.
//!
//! # Implementations
//!
//! - [`FileStore`]: one `<key>.json` file per key in a data directory
//! - [`MemoryStore`]: in-process map, optionally size-limited

mod file;
mod key;
mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub use file::FileStore;
pub use key::StoreKey;
pub use memory::MemoryStore;

/// Errors raised by store reads and writes.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Store quota of {quota} bytes exceeded writing '{key}'")]
    QuotaExceeded { key: String, quota: usize },

    #[error("Invalid store key: '{0}'")]
    InvalidKey(String),

    #[error("Failed to encode '{0}': {1}")]
    Encode(StoreKey, #[source] serde_json::Error),
}

/// String-keyed persistent storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Store handle shared by every engine.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes a JSON document.
///
/// Absent keys, read failures and undecodable documents all yield `None`;
/// failures are logged.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: StoreKey) -> Option<T> {
    let raw = match store.get(key.as_str()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read '{}': {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Discarding unreadable '{}' document: {}", key, e);
            None
        }
    }
}

/// Encodes and writes a JSON document.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: StoreKey,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|e| StoreError::Encode(key, e))?;
    store.set(key.as_str(), &json)
}

/// Writes a JSON document, logging instead of returning a failure.
/// Returns true if the document was persisted.
pub(crate) fn persist<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: StoreKey,
    value: &T,
) -> bool {
    match save_json(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Change kept in memory only, '{}' not persisted: {}", key, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_absent() {
        let store = MemoryStore::new();
        let value: Option<Vec<u64>> = load_json(&store, StoreKey::Favorites);
        assert!(value.is_none());
    }

    #[test]
    fn test_load_json_malformed_is_none() {
        let store = MemoryStore::new();
        store.set("favorites", "{not json").unwrap();
        let value: Option<Vec<u64>> = load_json(&store, StoreKey::Favorites);
        assert!(value.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save_json(&store, StoreKey::Favorites, &vec![3u64, 1]).unwrap();
        let value: Option<Vec<u64>> = load_json(&store, StoreKey::Favorites);
        assert_eq!(value, Some(vec![3, 1]));
    }

    #[test]
    fn test_persist_reports_failure() {
        let store = MemoryStore::with_quota(2);
        assert!(!persist(&store, StoreKey::Favorites, &vec![100u64, 200]));
        assert!(persist(&store, StoreKey::Favorites, &Vec::<u64>::new()));
    }
}
