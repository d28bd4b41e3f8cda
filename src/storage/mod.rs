//! Storage layer for persistent favorites.
//!
//! This module provides the key-value abstraction favorites are written to and the
//! favorites set itself.
//!
//! # Modules
//!
//! - `backend`: Key-value trait abstraction for backend implementations
//! - `json`: JSON container file implementation with atomic writes
//! - `memory`: Process-local implementation
//! - `favorites`: Ordered favorites set persisted as a single blob

pub mod backend;
pub mod favorites;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
