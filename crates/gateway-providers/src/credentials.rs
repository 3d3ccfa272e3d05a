//! Credential resolution.
//!
//! A key is taken from the first non-empty source in this order:
//! 1. keys supplied with the request
//! 2. the settings snapshot
//! 3. the deployment environment
//!
//! Empty strings count as absent. Keys are never logged; callers may log
//! the [`KeySource`] and presence only.

use gateway_core::{GatewayError, GatewayResult, ProviderKind, Settings, SuppliedKeys};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;

/// Deployment-level keys captured once at start-up
#[derive(Clone, Default)]
pub struct EnvCredentials {
    keys: HashMap<ProviderKind, SecretString>,
}

impl EnvCredentials {
    /// Read `OPENAI_API_KEY`, `OPENROUTER_API_KEY` and `HUGGINGFACE_API_KEY`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        ProviderKind::ALL
            .iter()
            .fold(Self::default(), |creds, &kind| match lookup(kind.env_var()) {
                Some(key) => creds.with_key(kind, key),
                None => creds,
            })
    }

    /// Set the key for a provider
    #[must_use]
    pub fn with_key(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        self.keys.insert(provider, SecretString::new(key.into()));
        self
    }

    /// Key for a provider
    #[must_use]
    pub fn get(&self, provider: ProviderKind) -> Option<&SecretString> {
        self.keys.get(&provider)
    }
}

impl fmt::Debug for EnvCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in ProviderKind::ALL {
            map.entry(&kind.as_str(), &presence(self.get(kind)));
        }
        map.finish()
    }
}

/// Where a resolved key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Supplied with the request
    Request,
    /// Stored in the settings row
    Settings,
    /// Deployment environment
    Environment,
}

impl KeySource {
    /// Log label
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Settings => "settings",
            Self::Environment => "environment",
        }
    }
}

/// Key chosen for one upstream call
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    /// The key itself
    pub key: SecretString,
    /// Where it came from
    pub source: KeySource,
}

/// `AVAILABLE` or `MISSING`, for logs
#[must_use]
pub fn presence(key: Option<&SecretString>) -> &'static str {
    if usable(key).is_some() {
        "AVAILABLE"
    } else {
        "MISSING"
    }
}

fn usable(key: Option<&SecretString>) -> Option<&SecretString> {
    key.filter(|k| !k.expose_secret().is_empty())
}

/// Pick the key for `provider`
pub fn resolve_key(
    provider: ProviderKind,
    supplied: &SuppliedKeys,
    settings: Option<&Settings>,
    env: &EnvCredentials,
) -> GatewayResult<ResolvedKey> {
    let candidates = [
        (supplied.get(provider), KeySource::Request),
        (settings.and_then(|s| s.api_key(provider)), KeySource::Settings),
        (env.get(provider), KeySource::Environment),
    ];

    candidates
        .into_iter()
        .find_map(|(key, source)| {
            usable(key).map(|key| ResolvedKey {
                key: key.clone(),
                source,
            })
        })
        .ok_or(GatewayError::MissingCredential { provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: ProviderKind = ProviderKind::OpenRouter;

    fn exposed(resolved: &ResolvedKey) -> &str {
        resolved.key.expose_secret()
    }

    #[test]
    fn test_request_key_wins() {
        let supplied = SuppliedKeys::default().with_key(P, "A");
        let settings = Settings::default().with_api_key(P, "B");
        let env = EnvCredentials::default().with_key(P, "C");

        let resolved = resolve_key(P, &supplied, Some(&settings), &env).unwrap();
        assert_eq!(exposed(&resolved), "A");
        assert_eq!(resolved.source, KeySource::Request);
    }

    #[test]
    fn test_settings_key_second() {
        let settings = Settings::default().with_api_key(P, "B");
        let env = EnvCredentials::default().with_key(P, "C");

        let resolved = resolve_key(P, &SuppliedKeys::default(), Some(&settings), &env).unwrap();
        assert_eq!(exposed(&resolved), "B");
        assert_eq!(resolved.source, KeySource::Settings);
    }

    #[test]
    fn test_environment_key_last() {
        let env = EnvCredentials::default().with_key(P, "C");

        let resolved = resolve_key(P, &SuppliedKeys::default(), None, &env).unwrap();
        assert_eq!(exposed(&resolved), "C");
        assert_eq!(resolved.source, KeySource::Environment);
    }

    #[test]
    fn test_missing_everywhere() {
        let err = resolve_key(
            P,
            &SuppliedKeys::default(),
            Some(&Settings::default()),
            &EnvCredentials::default(),
        )
        .unwrap_err();
        assert_eq!(err, GatewayError::MissingCredential { provider: P });
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let supplied = SuppliedKeys::default().with_key(P, "");
        let settings = Settings::default().with_api_key(P, "");
        let env = EnvCredentials::default().with_key(P, "C");

        let resolved = resolve_key(P, &supplied, Some(&settings), &env).unwrap();
        assert_eq!(exposed(&resolved), "C");
    }

    #[test]
    fn test_keys_are_per_provider() {
        let supplied = SuppliedKeys::default().with_key(ProviderKind::OpenAI, "sk-openai");
        let err = resolve_key(
            ProviderKind::HuggingFace,
            &supplied,
            None,
            &EnvCredentials::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "missing_credential");
    }

    #[test]
    fn test_from_lookup_and_redacted_debug() {
        let env = EnvCredentials::from_lookup(|name| {
            (name == "HUGGINGFACE_API_KEY").then(|| "hf_secret".to_string())
        });

        assert!(env.get(ProviderKind::HuggingFace).is_some());
        assert!(env.get(ProviderKind::OpenAI).is_none());

        let debug = format!("{env:?}");
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains("AVAILABLE"));
        assert!(debug.contains("MISSING"));
    }
}
