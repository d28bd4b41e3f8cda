//! Remote search layer.
//!
//! - `transport`: single-GET HTTP seam with a `reqwest` implementation
//! - `client`: URL construction, status validation and response decoding

pub mod client;
pub mod transport;

pub use client::SearchClient;
pub use transport::{HttpReply, ReqwestTransport, SearchTransport};
