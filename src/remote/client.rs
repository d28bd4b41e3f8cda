//! Remote search client for the GeoNames Wikipedia search API.
//!
//! [`SearchClient`] turns a free-text query into one GET request, validates the
//! reply, and decodes it into [`CityRecord`]s. The client is cheap to clone and is
//! shared with the search worker's tasks.

use crate::domain::city::decode_search_response;
use crate::domain::error::{CityfinderError, Result};
use crate::domain::{CityRecord, IdentityPolicy, SearchError};
use crate::remote::transport::SearchTransport;
use crate::Config;
use std::sync::Arc;
use url::Url;

/// HTTP status required for a reply to be decoded.
const STATUS_OK: u16 = 200;

/// Client for the remote city search endpoint.
#[derive(Clone)]
pub struct SearchClient {
    endpoint: Url,
    max_rows: u32,
    username: String,
    style: String,
    identity: IdentityPolicy,
    transport: Arc<dyn SearchTransport>,
}

impl SearchClient {
    /// Creates a client from configuration and a transport.
    ///
    /// # Errors
    ///
    /// Returns [`CityfinderError::Config`] if the configured endpoint is not an
    /// absolute URL.
    pub fn new(config: &Config, transport: Arc<dyn SearchTransport>) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| CityfinderError::Config(format!("invalid endpoint {}: {e}", config.endpoint)))?;

        Ok(Self {
            endpoint,
            max_rows: config.max_rows,
            username: config.username.clone(),
            style: config.style.clone(),
            identity: config.identity,
            transport,
        })
    }

    /// Builds the request URL for `query`.
    ///
    /// The query is percent-encoded together with the row limit and credentials.
    /// Form encoding accepts any string, control characters included.
    #[must_use]
    pub fn build_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("maxRows", &self.max_rows.to_string())
            .append_pair("username", &self.username)
            .append_pair("style", &self.style);
        url
    }

    /// Runs one search.
    ///
    /// Issues exactly one GET. No retries.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Transport`] if no response was received
    /// - [`SearchError::BadResponse`] if the status is not 200
    /// - [`SearchError::Decode`] if the body is not the expected envelope
    pub async fn search(&self, query: &str) -> std::result::Result<Vec<CityRecord>, SearchError> {
        let url = self.build_url(query);
        tracing::debug!(query = %query, endpoint = %self.endpoint, "sending search request");

        let reply = self.transport.get(url).await?;
        if reply.status != STATUS_OK {
            tracing::debug!(status = reply.status, "search returned non-200 status");
            return Err(SearchError::BadResponse { status: reply.status });
        }

        let cities = decode_search_response(&reply.body, self.identity)
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        tracing::debug!(count = cities.len(), "search response decoded");
        Ok(cities)
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint)
            .field("max_rows", &self.max_rows)
            .field("style", &self.style)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
