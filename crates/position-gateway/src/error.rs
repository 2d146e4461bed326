//! # Gateway Errors

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use realtime::ErrorBody;
use thiserror::Error;

/// Failures the gateway reports to its caller.
///
/// Every variant renders as a JSON `{"error": ...}` body; the upstream's own
/// error body and the internal error chain are never relayed.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The upstream answered with a non-success status.
    #[error("external API error")]
    UpstreamRejected(StatusCode),

    /// The upstream could not be reached or returned an unreadable body.
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    /// Status code relayed to the caller.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UpstreamRejected(status) => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
