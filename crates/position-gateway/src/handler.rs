//! Position Gateway
//!
//! Fetch the upstream position records and relay them, or a generic error,
//! to the caller.

use anyhow::{Context, anyhow};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{GatewayError, HttpRequest, Provider, Upstream};

const SERVICE: &str = "position-gateway";

/// Relays requests for position data to a fixed upstream.
///
/// Holds no state across requests beyond its configuration.
#[derive(Debug, Clone)]
pub struct Gateway<P> {
    upstream: Upstream,
    provider: P,
}

impl<P: Provider> Gateway<P> {
    /// Create a gateway that calls `upstream` through `provider`.
    #[must_use]
    pub const fn new(upstream: Upstream, provider: P) -> Self {
        Self { upstream, provider }
    }

    /// The configured upstream.
    #[must_use]
    pub const fn upstream(&self) -> &Upstream {
        &self.upstream
    }

    /// Perform one upstream call and return its JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamRejected`] when the upstream answers
    /// with a non-success status and [`GatewayError::Internal`] for transport
    /// failures, timeouts and bodies that are not valid JSON.
    pub async fn positions(&self) -> Result<Value, GatewayError> {
        let result = self.fetch().await;

        match &result {
            Ok(_) => info!(monotonic_counter.upstream_success = 1, service = %SERVICE),
            Err(GatewayError::UpstreamRejected(status)) => warn!(
                monotonic_counter.upstream_rejected = 1,
                status = %status,
                service = %SERVICE
            ),
            Err(GatewayError::Internal(e)) => error!(
                monotonic_counter.processing_errors = 1,
                error = ?e,
                service = %SERVICE
            ),
        }

        result
    }

    async fn fetch(&self) -> Result<Value, GatewayError> {
        let request = self.upstream.request()?;

        let call = HttpRequest::fetch(&self.provider, request);
        let response = match self.upstream.timeout() {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_elapsed| anyhow!("upstream did not answer within {timeout:?}"))?,
            None => call.await,
        }
        .context("upstream positions request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UpstreamRejected(status));
        }

        let body = response.into_body();
        let positions =
            serde_json::from_slice(&body).context("upstream returned malformed json")?;
        Ok(positions)
    }
}
