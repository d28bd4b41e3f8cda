//! Domain layer for cityfinder.
//!
//! This module contains the core domain types, independent of the HTTP transport,
//! the storage backend and the terminal front-end.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`city`]: City record model, identifiers and wire decoding

pub mod city;
pub mod error;

pub use city::{CityId, CityRecord, IdentityPolicy};
pub use error::{CityfinderError, Result, SearchError};
