//! API error responses.
//!
//! Every failure leaves the gateway as `{error, details?, kind}` with the
//! status chosen by the error taxonomy. Upstream statuses pass through.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_core::GatewayError;
use serde::Serialize;
use std::net::SocketAddr;
use tracing::{error, warn};

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Supplementary detail, such as the raw upstream body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable kind
    pub kind: &'static str,
}

/// Error returned by handlers
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Human-readable message
    pub message: String,
    /// Supplementary detail
    pub details: Option<String>,
    /// Machine-readable kind
    pub kind: &'static str,
}

impl ApiError {
    /// Create a 400 `invalid_request` error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
            kind: "invalid_request",
        }
    }

    /// Attach a detail string
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Create a 500 `internal_failure` error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
            kind: "internal_failure",
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
        Self {
            status,
            message: err.to_string(),
            details: err.details(),
            kind: err.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), kind = self.kind, error = %self.message, "Request failed");
        } else {
            warn!(status = self.status.as_u16(), kind = self.kind, error = %self.message, "Request rejected");
        }

        let body = ErrorBody {
            error: self.message,
            details: self.details,
            kind: self.kind,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Server start-up and run errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be turned into a listener address
    #[error("Invalid server configuration: {0}")]
    Config(#[from] gateway_config::ConfigError),

    /// Listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was tried
        addr: SocketAddr,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Server loop failed
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
