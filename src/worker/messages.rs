//! Message types exchanged between the catalog and the search worker.
//!
//! The catalog owns all observable state and never blocks on the network. It posts
//! a [`WorkerMessage`] for every search and later receives exactly one
//! [`WorkerResponse`] carrying the same sequence number.

use crate::domain::{CityRecord, SearchError};

/// Monotonically increasing search request number.
///
/// The catalog compares a completion's number with the latest it issued to detect
/// stale completions.
pub type SearchSeq = u64;

/// Messages sent from the catalog to the search worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Run one remote search.
    Search {
        /// Request number assigned by the catalog.
        seq: SearchSeq,
        /// Raw user query, not yet encoded.
        query: String,
    },
}

impl WorkerMessage {
    /// Creates a `Search` message.
    pub fn search(seq: SearchSeq, query: impl Into<String>) -> Self {
        Self::Search {
            seq,
            query: query.into(),
        }
    }
}

/// Responses sent from the search worker back to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    /// A search finished, successfully or not.
    SearchCompleted {
        /// Request number from the originating message.
        seq: SearchSeq,
        /// Query as it was submitted.
        query: String,
        /// Decoded cities or the failure.
        result: Result<Vec<CityRecord>, SearchError>,
    },
}

impl WorkerResponse {
    /// Returns the sequence number of the request this response answers.
    #[must_use]
    pub const fn seq(&self) -> SearchSeq {
        match self {
            Self::SearchCompleted { seq, .. } => *seq,
        }
    }
}
