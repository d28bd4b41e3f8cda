//! Error types for cityfinder.
//!
//! This module defines the search failure taxonomy [`SearchError`], the crate-wide
//! error type [`CityfinderError`], and a [`Result`] alias. All errors are implemented
//! with the `thiserror` crate.

use thiserror::Error;

/// Failure of a single remote search.
///
/// Each variant is reported to the caller of a search; none of them is retried.
/// The type is `Clone` so a completion can be handed both to the caller's callback
/// and to subscribed observers.
///
/// # Examples
///
/// ```
/// use cityfinder::domain::SearchError;
///
/// let err = SearchError::BadResponse { status: 500 };
/// assert_eq!(err.to_string(), "Bad response: HTTP status 500");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The HTTP request did not produce a response (DNS, connect, TLS, I/O).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The server answered with a status other than 200.
    #[error("Bad response: HTTP status {status}")]
    BadResponse {
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// The response body did not match the expected JSON envelope.
    #[error("Decode failure: {0}")]
    Decode(String),
}

/// The main error type for cityfinder operations.
///
/// Consolidates search failures, storage and I/O problems, configuration issues,
/// and catalog misuse. Most variants carry a description of what went wrong.
#[derive(Debug, Error)]
pub enum CityfinderError {
    /// A remote search failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Storage operation failed.
    ///
    /// Occurs when reading, decoding or writing the key-value container fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Communication with the search worker failed.
    ///
    /// Occurs when the worker task has stopped and its channels are closed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// An operation needed a selected city but none is selected.
    #[error("Please search for a city")]
    NoSelection,
}

/// A specialized `Result` type for cityfinder operations.
pub type Result<T> = std::result::Result<T, CityfinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_convert_transparently() {
        let err: CityfinderError = SearchError::Decode("missing field `title`".to_string()).into();
        assert_eq!(err.to_string(), "Decode failure: missing field `title`");
    }

    #[test]
    fn no_selection_reads_like_a_prompt() {
        assert_eq!(CityfinderError::NoSelection.to_string(), "Please search for a city");
    }
}
