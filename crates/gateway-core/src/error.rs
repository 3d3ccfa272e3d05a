//! Gateway error taxonomy.
//!
//! Every failure on the completion path is one of these variants. Each
//! carries enough detail for a user-facing message and never the credential
//! that was used for the upstream call.

use crate::provider::ProviderKind;
use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors produced by the completion path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The inbound request is missing required fields or is not parseable
    #[error("{message}")]
    InvalidRequest {
        /// Human-readable reason
        message: String,
        /// Optional parser or field detail
        details: Option<String>,
    },

    /// The provider identifier is not in the registry
    #[error("Unsupported provider: {provider}")]
    UnsupportedProvider {
        /// Provider identifier as received
        provider: String,
    },

    /// No key found for the provider in request, settings or environment
    #[error("API key not found for provider: {provider}")]
    MissingCredential {
        /// Provider the key was needed for
        provider: ProviderKind,
    },

    /// The upstream API answered with a non-2xx status
    #[error("{} API error: {status_code}", .provider.label())]
    Upstream {
        /// Provider that answered
        provider: ProviderKind,
        /// HTTP status returned upstream
        status_code: u16,
        /// Raw response body, passed through as diagnostic text
        body: String,
    },

    /// The upstream API answered 2xx with a body of the wrong shape
    #[error("Invalid API response format")]
    MalformedUpstreamResponse {
        /// Provider that answered
        provider: ProviderKind,
        /// What was wrong with the body
        details: String,
    },

    /// Transport failure, timeout or any other unexpected condition
    #[error("{message}")]
    InternalFailure {
        /// Human-readable summary
        message: String,
        /// Underlying cause
        details: Option<String>,
    },
}

impl GatewayError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            details: None,
        }
    }

    /// Create an unsupported provider error
    pub fn unsupported_provider(provider: impl Into<String>) -> Self {
        Self::UnsupportedProvider {
            provider: provider.into(),
        }
    }

    /// Create an upstream error
    pub fn upstream(provider: ProviderKind, status_code: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            provider,
            status_code,
            body: body.into(),
        }
    }

    /// Create a malformed upstream response error
    pub fn malformed(provider: ProviderKind, details: impl Into<String>) -> Self {
        Self::MalformedUpstreamResponse {
            provider,
            details: details.into(),
        }
    }

    /// Create an internal failure
    pub fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self::InternalFailure {
            message: message.into(),
            details,
        }
    }

    /// Machine-readable kind, stable across releases
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::UnsupportedProvider { .. } => "unsupported_provider",
            Self::MissingCredential { .. } => "missing_credential",
            Self::Upstream { .. } => "upstream_error",
            Self::MalformedUpstreamResponse { .. } => "malformed_upstream_response",
            Self::InternalFailure { .. } => "internal_failure",
        }
    }

    /// Supplementary detail for the error body
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::InvalidRequest { details, .. } | Self::InternalFailure { details, .. } => {
                details.clone()
            }
            Self::UnsupportedProvider { .. } => None,
            Self::MissingCredential { .. } => Some(
                "Please configure API key in settings or provide it in the request".to_string(),
            ),
            Self::Upstream { body, .. } => Some(body.clone()),
            Self::MalformedUpstreamResponse { details, .. } => Some(details.clone()),
        }
    }

    /// HTTP status the gateway answers with for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } | Self::UnsupportedProvider { .. } => 400,
            Self::MissingCredential { .. } => 401,
            Self::Upstream { status_code, .. } => *status_code,
            Self::MalformedUpstreamResponse { .. } | Self::InternalFailure { .. } => 500,
        }
    }
}
