//! Upstream provider identifiers.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Upstream LLM API vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions API
    OpenAI,
    /// OpenRouter (OpenAI-compatible) chat completions API
    OpenRouter,
    /// Hugging Face inference API
    HuggingFace,
}

impl ProviderKind {
    /// Every known provider, in registry order
    pub const ALL: [Self; 3] = [Self::OpenAI, Self::OpenRouter, Self::HuggingFace];

    /// Wire identifier used in requests and settings
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::OpenRouter => "openrouter",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Human-facing name used in error messages
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::OpenRouter => "openrouter",
            Self::HuggingFace => "Hugging Face",
        }
    }

    /// Deployment environment variable holding the shared key
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::HuggingFace => "HUGGINGFACE_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GatewayError::unsupported_provider(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_providers() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "OpenAI".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedProvider { .. }));
    }

    #[test]
    fn test_serde_uses_wire_ids() {
        let json = serde_json::to_string(&ProviderKind::HuggingFace).unwrap();
        assert_eq!(json, "\"huggingface\"");

        let kind: ProviderKind = serde_json::from_str("\"openrouter\"").unwrap();
        assert_eq!(kind, ProviderKind::OpenRouter);
    }
}
