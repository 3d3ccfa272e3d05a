//! Provider registry.
//!
//! Static table from provider identifier to endpoint template and adapter.
//! Built once at start-up and shared read-only.

use crate::adapter::ProviderAdapter;
use crate::huggingface::{HuggingFaceAdapter, HUGGINGFACE_BASE_URL};
use crate::openai::{
    OpenAICompatAdapter, DEFAULT_OPENROUTER_REFERER, DEFAULT_OPENROUTER_TITLE, OPENAI_BASE_URL,
    OPENROUTER_BASE_URL,
};
use gateway_core::{GatewayError, GatewayResult, ProviderKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Base URLs and identification headers used to build the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// OpenAI base URL
    pub openai_base_url: String,
    /// OpenRouter base URL
    pub openrouter_base_url: String,
    /// Hugging Face inference base URL
    pub huggingface_base_url: String,
    /// `HTTP-Referer` sent to OpenRouter
    pub openrouter_referer: String,
    /// `X-Title` sent to OpenRouter
    pub openrouter_title: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            openai_base_url: OPENAI_BASE_URL.to_string(),
            openrouter_base_url: OPENROUTER_BASE_URL.to_string(),
            huggingface_base_url: HUGGINGFACE_BASE_URL.to_string(),
            openrouter_referer: DEFAULT_OPENROUTER_REFERER.to_string(),
            openrouter_title: DEFAULT_OPENROUTER_TITLE.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Point every provider at the same base URL
    ///
    /// Used by tests to route all traffic to one mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.openai_base_url.clone_from(&base_url);
        self.openrouter_base_url.clone_from(&base_url);
        self.huggingface_base_url = base_url;
        self
    }
}

/// Resolved registry entry
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// Endpoint template, may contain `{model}`
    pub endpoint_template: String,
    /// Adapter for the provider's wire format
    pub adapter: Arc<dyn ProviderAdapter>,
}

/// Provider identifier to adapter table
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Registry with the public endpoints of every provider
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_config(&RegistryConfig::default())
    }

    /// Registry built from explicit base URLs
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(OpenAICompatAdapter::openai(&config.openai_base_url)));
        registry.register(Arc::new(OpenAICompatAdapter::openrouter(
            &config.openrouter_base_url,
            &config.openrouter_referer,
            &config.openrouter_title,
        )));
        registry.register(Arc::new(HuggingFaceAdapter::new(
            &config.huggingface_base_url,
        )));
        registry
    }

    /// Registry with no providers
    #[must_use]
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register an adapter, replacing any previous one for the same provider
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.kind(), adapter);
    }

    /// Adapter for a known provider
    #[must_use]
    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    /// Look up a provider by its identifier
    pub fn resolve(&self, provider: &str) -> GatewayResult<RegistryEntry> {
        let kind: ProviderKind = provider.parse()?;
        self.resolve_kind(kind)
            .ok_or_else(|| GatewayError::unsupported_provider(provider))
    }

    /// Look up a provider that is already parsed
    #[must_use]
    pub fn resolve_kind(&self, kind: ProviderKind) -> Option<RegistryEntry> {
        self.get(kind).map(|adapter| RegistryEntry {
            endpoint_template: adapter.endpoint_template().to_string(),
            adapter,
        })
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
