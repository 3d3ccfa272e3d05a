//! Response types for the gateway.

use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};

/// Token usage as reported (or estimated) for one completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

impl Usage {
    /// Create a usage record
    #[must_use]
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Normalized result returned regardless of which provider served it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// Generated text
    pub content: String,
    /// Model that was requested
    pub model: String,
    /// Provider that served the request
    pub provider: ProviderKind,
    /// Token usage
    pub usage: Usage,
}

/// Why a title was produced by the heuristic instead of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Configured provider cannot generate titles
    UnsupportedProvider,
    /// No key in request, settings or environment
    MissingCredential,
    /// Upstream answered with a non-2xx status
    UpstreamError,
    /// Upstream body could not be normalized
    MalformedResponse,
    /// Connection error, timeout or other transport failure
    TransportFailure,
    /// Inbound body was unusable
    InvalidInput,
}

impl FallbackReason {
    /// Metric and log label
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedProvider => "unsupported_provider",
            Self::MissingCredential => "missing_credential",
            Self::UpstreamError => "upstream_error",
            Self::MalformedResponse => "malformed_response",
            Self::TransportFailure => "transport_failure",
            Self::InvalidInput => "invalid_input",
        }
    }
}

/// Where a title came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// Generated by the configured title model
    Model,
    /// Produced locally after a failure
    Fallback(FallbackReason),
}

impl TitleSource {
    /// Metric and log label
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback(reason) => reason.as_str(),
        }
    }
}

/// Generated thread title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleResult {
    /// Title text
    pub title: String,
    /// Provenance, kept out of the wire shape
    #[serde(skip)]
    pub source: TitleSource,
}

impl TitleResult {
    /// Title produced by a model
    #[must_use]
    pub fn generated(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: TitleSource::Model,
        }
    }

    /// Title produced by a local fallback
    #[must_use]
    pub fn fallback(title: impl Into<String>, reason: FallbackReason) -> Self {
        Self {
            title: title.into(),
            source: TitleSource::Fallback(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_result_wire_shape() {
        let result = CompletionResult {
            content: "Hi".to_string(),
            model: "gpt-4o-mini".to_string(),
            provider: ProviderKind::OpenAI,
            usage: Usage::new(3, 1, 4),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": "Hi",
                "model": "gpt-4o-mini",
                "provider": "openai",
                "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
            })
        );
    }

    #[test]
    fn test_title_source_hidden_from_wire() {
        let title = TitleResult::fallback("one two", FallbackReason::MissingCredential);
        let json = serde_json::to_value(&title).unwrap();
        assert_eq!(json, serde_json::json!({"title": "one two"}));
        assert_eq!(title.source.as_str(), "missing_credential");
    }
}
