//! Storage capabilities.
//!
//! Two string stores are consumed: a persistent key-value store for snapshots
//! (browser `localStorage`) and a session store for the access flag (browser
//! `sessionStorage`). [`MemoryStore`] implements both for tests and native
//! hosts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;

/// Persistent string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Session-scoped flag store.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn clear(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory store.
///
/// Clones share the same map, so a test can hand one clone to a session and
/// inspect the other. Every successful `set` is counted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<RwLock<Vec<(String, String)>>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes, like storage in a locked-down browser.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Seed a value without counting it as a write.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value.into());
        }
        self
    }

    /// Current value for `key`.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    /// Number of successful writes to `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.writes
            .read()
            .map(|w| w.iter().filter(|(k, _)| k == key).count())
            .unwrap_or(0)
    }

    /// Every successful write, oldest first.
    pub fn write_log(&self) -> Vec<(String, String)> {
        self.writes.read().map(|w| w.clone()).unwrap_or_default()
    }

    fn poisoned(key: &str) -> StoreError {
        StoreError::ReadFailed {
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        let mut entries = self.entries.write().map_err(|_| Self::poisoned(key))?;
        entries.insert(key.to_string(), value.to_string());
        let mut writes = self.writes.write().map_err(|_| Self::poisoned(key))?;
        writes.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        let mut entries = self.entries.write().map_err(|_| Self::poisoned(key))?;
        entries.remove(key);
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| Self::poisoned(key))?;
        Ok(entries.get(key).cloned())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.read(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.delete(key)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.read(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put(key, value)
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.delete(key)
    }
}
