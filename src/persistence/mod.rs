//! Key-value persistence contract
//!
//! The economy only needs synchronous `get`/`set` of JSON strings. On the web
//! that is LocalStorage (see `platform::storage`); tests and the native demo
//! use [`MemoryStore`].

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage backend could be reached (private browsing, no window)
    #[error("storage unavailable")]
    Unavailable,
    /// The backend refused the operation (quota, security policy)
    #[error("storage backend error: {0}")]
    Backend(String),
    /// The value could not be (de)serialized
    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A durable string key-value surface, synchronous from the caller's view
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load and decode a JSON value. Absent keys yield `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and store a JSON value
pub fn save_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// Count of successful writes, for asserting write-through behavior
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access for inspecting what was persisted
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
