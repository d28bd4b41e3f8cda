//! JSON file-based key-value store.
//!
//! This module provides a simple, human-readable store using JSON serialization.
//! Writes are atomic (write-to-temp + rename) so a crash never leaves a truncated
//! container behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) after the container is loaded into memory once
//! - **Write**: O(n) - serializes and writes the whole container
//! - **Best for**: a handful of keys with small blobs, written on user actions

use crate::domain::error::{CityfinderError, Result};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current container format version.
const STORAGE_VERSION: u32 = 1;

/// JSON container format.
///
/// This is the top-level structure serialized to disk. Blobs are stored as UTF-8
/// strings so the file stays readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the container format for future migrations.
    version: u32,

    /// Stored blobs keyed by name.
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file key-value store.
///
/// The whole container is kept in memory and persisted on every modification.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is owned by the favorites store, which in
/// turn is owned by the single task driving the catalog.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "favoriteCities": "[{\"title\":\"Paris\",...}]"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the container, loaded on creation.
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonFileStore {
    /// Creates or opens a JSON key-value store.
    ///
    /// If the file exists, loads its entries. Otherwise starts empty; the file is
    /// created on the first write. Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON store");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StorageData::default()
        };

        tracing::debug!(entry_count = data.entries.len(), "store initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads the container from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| CityfinderError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > STORAGE_VERSION {
            tracing::warn!(
                version = data.version,
                supported = STORAGE_VERSION,
                "store was written by a newer version"
            );
        }

        tracing::debug!(version = data.version, entries = data.entries.len(), "loaded store");
        Ok(data)
    }

    /// Saves the container to disk using an atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, the temporary file cannot be written,
    /// or the rename fails.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| CityfinderError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.data.entries.get(key).map(|v| v.as_bytes().to_vec());
        tracing::trace!(key = %key, found = value.is_some(), "store lookup");
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let _span = tracing::debug_span!("json_store_set", key = %key, bytes = value.len()).entered();

        let text = std::str::from_utf8(value)
            .map_err(|e| CityfinderError::Storage(format!("value for {key} is not UTF-8: {e}")))?;

        self.data.entries.insert(key.to_string(), text.to_string());
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonFileStore {
    /// Retries a failed save on drop.
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
