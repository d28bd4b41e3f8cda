//! HTTP transport seam for the search client.
//!
//! [`SearchTransport`] performs one GET and hands back the raw status and body. The
//! production implementation wraps a `reqwest::Client`; tests substitute scripted
//! transports so no test touches the network.

use crate::domain::SearchError;
use futures_util::future::BoxFuture;
use url::Url;

/// Raw HTTP reply: status code and the full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    /// Creates a reply with the given status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs a single HTTP GET.
///
/// Implementations must not retry and must not override the client's default
/// timeouts. Failures to obtain any response are reported as
/// [`SearchError::Transport`]; the status code is never interpreted here.
pub trait SearchTransport: Send + Sync {
    /// Issues a GET for `url`.
    fn get(&self, url: Url) -> BoxFuture<'static, Result<HttpReply, SearchError>>;
}

/// [`SearchTransport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchTransport for ReqwestTransport {
    fn get(&self, url: Url) -> BoxFuture<'static, Result<HttpReply, SearchError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| SearchError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| SearchError::Transport(e.to_string()))?;

            Ok(HttpReply {
                status,
                body: body.to_vec(),
            })
        })
    }
}
