//! Storage backend abstraction.
//!
//! This module defines the [`KeyValueStore`] trait that abstracts over the durable
//! blob stores favorites are written to. The trait is deliberately small: the
//! favorites store reads one blob at startup and overwrites it after every mutation.

use crate::domain::error::Result;

/// Abstraction over durable key-value blob storage.
///
/// Values are opaque byte blobs. Every `set` replaces the whole value stored under
/// the key.
///
/// # Implementations
///
/// - [`JsonFileStore`](crate::storage::JsonFileStore): JSON container file with
///   atomic writes (default)
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local map
///
/// # Examples
///
/// ```no_run
/// use cityfinder::storage::{JsonFileStore, KeyValueStore};
/// use std::path::PathBuf;
///
/// let mut store = JsonFileStore::new(PathBuf::from("/tmp/cityfinder/store.json"))?;
/// store.set("greeting", b"hello")?;
/// assert_eq!(store.get("greeting")?, Some(b"hello".to_vec()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait KeyValueStore: Send {
    /// Reads the blob stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored under the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous blob, and flushes it to
    /// durable storage before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be stored or the write fails.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;
}
