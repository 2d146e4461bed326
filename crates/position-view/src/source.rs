//! Fetching records from the gateway.

use anyhow::Context;
use bytes::Bytes;
use http::header::ACCEPT;
use http::{Method, Request, StatusCode};
use realtime::HttpRequest;
use serde_json::Value;
use thiserror::Error;

use crate::position::{Position, normalize_all};

/// Why a fetch cycle failed. The display text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The gateway answered with a non-success status.
    #[error("failed to fetch positions")]
    Status(StatusCode),

    /// The gateway could not be reached.
    #[error("{0}")]
    Transport(String),

    /// The response body could not be read as position records.
    #[error("{0}")]
    Decode(String),
}

/// The gateway endpoint a view loads its records from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSource {
    url: String,
}

impl PositionSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and normalize the full record collection.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for a non-success response,
    /// [`FetchError::Transport`] when the request cannot be made and
    /// [`FetchError::Decode`] when the body is not an array of records.
    pub async fn fetch(&self, provider: &impl HttpRequest) -> Result<Vec<Position>, FetchError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(&self.url)
            .header(ACCEPT, "application/json")
            .body(Bytes::new())
            .context("building positions request")
            .map_err(|e| FetchError::Transport(format!("{e:#}")))?;

        let response = HttpRequest::fetch(provider, request)
            .await
            .map_err(|e| FetchError::Transport(format!("{e:#}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        decode(response.body())
    }
}

/// Parse a gateway body into normalized records.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] when `body` is not a JSON array of records.
pub fn decode(body: &[u8]) -> Result<Vec<Position>, FetchError> {
    let raw: Value = serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    normalize_all(raw).map_err(|e| FetchError::Decode(e.to_string()))
}
