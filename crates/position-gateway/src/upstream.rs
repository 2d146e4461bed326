//! Upstream endpoint configuration.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use http::header::ACCEPT;
use http::{Method, Request};
use realtime::Config;

/// The upstream positions endpoint and the credential used to call it.
///
/// The key is owned by the value handed to the gateway at start-up; it is
/// only ever written into outbound request URIs.
#[derive(Clone, PartialEq, Eq)]
pub struct Upstream {
    url: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl Upstream {
    /// Create an upstream with no outbound timeout.
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { url: url.into(), api_key: api_key.into(), timeout: None }
    }

    /// Bound every upstream call by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load upstream settings from the host configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when `UPSTREAM_URL` or `UPSTREAM_API_KEY` are not
    /// available, or `UPSTREAM_TIMEOUT_SECS` is set but not a whole number.
    pub async fn from_config(config: &impl Config) -> Result<Self> {
        let url = Config::get(config, "UPSTREAM_URL").await.context("getting `UPSTREAM_URL`")?;
        let api_key =
            Config::get(config, "UPSTREAM_API_KEY").await.context("getting `UPSTREAM_API_KEY`")?;

        let mut upstream = Self::new(url, api_key);
        if let Ok(secs) = Config::get(config, "UPSTREAM_TIMEOUT_SECS").await {
            let secs: u64 =
                secs.trim().parse().context("parsing `UPSTREAM_TIMEOUT_SECS` as seconds")?;
            upstream = upstream.with_timeout(Duration::from_secs(secs));
        }

        Ok(upstream)
    }

    /// Outbound timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The full request URI, including the `apikey` query parameter.
    #[must_use]
    pub fn uri(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}apikey={}", self.url, urlencoding::encode(&self.api_key))
    }

    pub(crate) fn request(&self) -> Result<Request<Bytes>> {
        Request::builder()
            .method(Method::GET)
            .uri(self.uri())
            .header(ACCEPT, "application/json")
            .body(Bytes::new())
            .context("building upstream positions request")
    }
}

impl fmt::Debug for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upstream")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Upstream;

    #[test]
    fn appends_api_key() {
        let upstream = Upstream::new("https://example.com/posicao", "abc123");
        assert_eq!(upstream.uri(), "https://example.com/posicao?apikey=abc123");
    }

    #[test]
    fn extends_existing_query() {
        let upstream = Upstream::new("https://example.com/posicao?fmt=json", "abc");
        assert_eq!(upstream.uri(), "https://example.com/posicao?fmt=json&apikey=abc");
    }

    #[test]
    fn encodes_api_key() {
        let upstream = Upstream::new("https://example.com/posicao", "a b&c=");
        assert_eq!(upstream.uri(), "https://example.com/posicao?apikey=a%20b%26c%3D");
    }

    #[test]
    fn debug_redacts_key() {
        let upstream = Upstream::new("https://example.com/posicao", "secret-key");
        let debug = format!("{upstream:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
