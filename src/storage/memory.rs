//! In-memory key-value store.
//!
//! Holds blobs in a process-local map. Used by the shell's `--ephemeral` mode and by
//! tests that need a store whose contents can be inspected or made to fail.

use crate::domain::error::{CityfinderError, Result};
use crate::storage::backend::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared map behind a [`MemoryStore`].
type Entries = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// Process-local key-value store.
///
/// Clones share the same entries, so a clone kept by a test observes everything
/// written through any handle. Setting `fail_writes` makes every `set` fail, which
/// simulates a full disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Entries,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|e| CityfinderError::Storage(format!("memory store poisoned: {e}")))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes.lock().map(|flag| *flag).unwrap_or(false) {
            return Err(CityfinderError::Storage(format!("write to {key} rejected")));
        }
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let mut store = MemoryStore::new();
        let observer = store.clone();

        store.set("k", b"v").unwrap();
        assert_eq!(observer.get("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn failing_writes_leave_entries_untouched() {
        let mut store = MemoryStore::new();
        store.set("k", b"old").unwrap();

        store.set_fail_writes(true);
        assert!(store.set("k", b"new").is_err());
        assert_eq!(store.get("k").unwrap(), Some(b"old".to_vec()));

        store.set_fail_writes(false);
        store.set("k", b"new").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"new".to_vec()));
    }
}
