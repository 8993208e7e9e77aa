//! Request-level error taxonomy.
//!
//! # Responsibilities
//! - Name every terminal failure a request can hit
//! - Map each failure to a stable HTTP status and reason code
//! - Render a structured JSON body without leaking backend detail
//!
//! # Design Decisions
//! - Backend-returned error bodies are NOT taxonomy errors; they are
//!   relayed verbatim by the forwarder
//! - No variant is ever retried by this layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Terminal failure for a single dispatched request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// No route rule matches the method + path.
    #[error("no route matches the request")]
    NotFound,

    /// The resource placeholder failed allow-list validation.
    #[error("unknown resource kind")]
    InvalidResource,

    /// Missing, malformed, badly signed or expired identity assertion.
    #[error("missing or invalid identity assertion")]
    Unauthenticated,

    /// Valid identity, but the principal may not perform this operation.
    #[error("principal not permitted for this operation")]
    Forbidden,

    /// Backend connection refused, reset, or otherwise unreachable.
    #[error("backend unavailable")]
    UpstreamUnavailable,

    /// Backend exceeded its configured deadline.
    #[error("backend did not respond within the deadline")]
    UpstreamTimeout,
}

impl GatewayError {
    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::InvalidResource => StatusCode::BAD_REQUEST,
            GatewayError::Unauthenticated => StatusCode::UNAUTHORIZED,
            GatewayError::Forbidden => StatusCode::FORBIDDEN,
            GatewayError::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Machine-readable reason code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::NotFound => "NOT_FOUND",
            GatewayError::InvalidResource => "INVALID_RESOURCE",
            GatewayError::Unauthenticated => "UNAUTHENTICATED",
            GatewayError::Forbidden => "FORBIDDEN",
            GatewayError::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            GatewayError::UpstreamTimeout => "UPSTREAM_TIMEOUT",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
