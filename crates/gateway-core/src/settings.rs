//! Deployment settings snapshot and the store contract that yields it.
//!
//! The settings row is owned by an external store. The gateway only ever
//! reads it, fetching a fresh snapshot per invocation.

use crate::provider::ProviderKind;
use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Single deployment-wide settings row
///
/// Only the columns the gateway reads are decoded. The rest of the row
/// (budgets, form defaults, transcription) belongs to the front end and is
/// ignored whatever its type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fallback OpenAI key
    pub dangerous_openai_api_key: Option<SecretString>,
    /// Fallback OpenRouter key
    pub dangerous_openrouter_api_key: Option<SecretString>,
    /// Fallback Hugging Face key
    pub dangerous_huggingface_api_key: Option<SecretString>,
    /// Default provider identifier
    pub chat_using: Option<String>,
    /// Model used for title generation
    pub utility_title_model: Option<String>,
}

impl Settings {
    /// Stored fallback key for a provider
    #[must_use]
    pub fn api_key(&self, provider: ProviderKind) -> Option<&SecretString> {
        match provider {
            ProviderKind::OpenAI => self.dangerous_openai_api_key.as_ref(),
            ProviderKind::OpenRouter => self.dangerous_openrouter_api_key.as_ref(),
            ProviderKind::HuggingFace => self.dangerous_huggingface_api_key.as_ref(),
        }
    }

    /// Set the stored key for a provider
    #[must_use]
    pub fn with_api_key(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        let key = Some(SecretString::new(key.into()));
        match provider {
            ProviderKind::OpenAI => self.dangerous_openai_api_key = key,
            ProviderKind::OpenRouter => self.dangerous_openrouter_api_key = key,
            ProviderKind::HuggingFace => self.dangerous_huggingface_api_key = key,
        }
        self
    }

    /// Set the default provider
    #[must_use]
    pub fn with_chat_using(mut self, provider: impl Into<String>) -> Self {
        self.chat_using = Some(provider.into());
        self
    }

    /// Set the title model
    #[must_use]
    pub fn with_title_model(mut self, model: impl Into<String>) -> Self {
        self.utility_title_model = Some(model.into());
        self
    }
}

/// Settings store failure
#[derive(Debug, Error)]
pub enum SettingsStoreError {
    /// Store could not be reached
    #[error("settings store unavailable: {0}")]
    Unavailable(String),

    /// Store answered with an error status
    #[error("settings store returned {status}: {body}")]
    Status {
        /// HTTP status
        status: u16,
        /// Response body
        body: String,
    },

    /// Row could not be decoded
    #[error("failed to decode settings row: {0}")]
    Decode(String),
}

/// Source of the settings snapshot
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the current row, `None` if the table is empty
    async fn load(&self) -> Result<Option<Settings>, SettingsStoreError>;
}

/// Store that always returns the same snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticSettingsStore {
    settings: Option<Settings>,
}

impl StaticSettingsStore {
    /// Store returning `settings`
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Some(settings),
        }
    }

    /// Store with no row
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for StaticSettingsStore {
    async fn load(&self) -> Result<Option<Settings>, SettingsStoreError> {
        Ok(self.settings.clone())
    }
}
