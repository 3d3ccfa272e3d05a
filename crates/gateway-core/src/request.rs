//! Request types for the gateway.
//!
//! `ChatCompletionBody` is the inbound wire shape, every field optional so
//! that validation can report what is missing. `CompletionRequest` is the
//! validated, provider-agnostic form that the adapters consume.

use crate::error::{GatewayError, GatewayResult};
use crate::provider::ProviderKind;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Sampling temperature used when the caller does not supply one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Chat message with role and content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author
    pub role: MessageRole,

    /// Text content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Keys held by the client (local storage) and sent with the request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuppliedKeys {
    /// OpenAI key
    #[serde(default)]
    pub openai: Option<SecretString>,
    /// OpenRouter key
    #[serde(default)]
    pub openrouter: Option<SecretString>,
    /// Hugging Face key
    #[serde(default)]
    pub huggingface: Option<SecretString>,
}

impl SuppliedKeys {
    /// Set the key for a provider
    #[must_use]
    pub fn with_key(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        let key = Some(SecretString::new(key.into()));
        match provider {
            ProviderKind::OpenAI => self.openai = key,
            ProviderKind::OpenRouter => self.openrouter = key,
            ProviderKind::HuggingFace => self.huggingface = key,
        }
        self
    }

    /// Key supplied for a provider, if any
    #[must_use]
    pub fn get(&self, provider: ProviderKind) -> Option<&SecretString> {
        match provider {
            ProviderKind::OpenAI => self.openai.as_ref(),
            ProviderKind::OpenRouter => self.openrouter.as_ref(),
            ProviderKind::HuggingFace => self.huggingface.as_ref(),
        }
    }
}

/// Inbound completion body as sent by the chat front end
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionBody {
    /// Conversation history, oldest first
    pub messages: Option<Vec<ChatMessage>>,
    /// Thread the messages belong to, used for log correlation only
    pub thread_id: Option<String>,
    /// Target model identifier
    pub model: Option<String>,
    /// Provider identifier
    pub provider: Option<String>,
    /// Sampling temperature, `0` means the default
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    ///
    /// Taken as any JSON number; see [`ChatCompletionBody::token_limit`].
    pub max_tokens: Option<f64>,
    /// Client-held keys
    pub api_keys: Option<SuppliedKeys>,
}

impl ChatCompletionBody {
    /// Usable token limit
    ///
    /// Zero, negative and non-finite values mean "no limit". Fractions are
    /// truncated.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn token_limit(&self) -> Option<u32> {
        self.max_tokens
            .filter(|n| n.is_finite() && *n >= 1.0)
            .map(|n| n.trunc().min(f64::from(u32::MAX)) as u32)
    }
}

/// Validated, provider-agnostic completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    messages: Vec<ChatMessage>,
    model: String,
    provider: ProviderKind,
    temperature: f32,
    max_tokens: Option<u32>,
    supplied_keys: SuppliedKeys,
    thread_id: Option<String>,
}

impl CompletionRequest {
    /// Create a request with the default temperature
    ///
    /// # Errors
    /// Returns `InvalidRequest` if `messages` is empty or `model` is blank
    pub fn new(
        provider: ProviderKind,
        model: impl Into<String>,
        messages: Vec<ChatMessage>,
    ) -> GatewayResult<Self> {
        let model = model.into();
        if messages.is_empty() {
            return Err(GatewayError::invalid_request(
                "Messages array is required and cannot be empty",
            ));
        }
        if model.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                "Model and provider are required parameters",
            ));
        }

        Ok(Self {
            messages,
            model,
            provider,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            supplied_keys: SuppliedKeys::default(),
            thread_id: None,
        })
    }

    /// Set the temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max_tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the client-held keys
    #[must_use]
    pub fn with_supplied_keys(mut self, keys: SuppliedKeys) -> Self {
        self.supplied_keys = keys;
        self
    }

    /// Set the thread ID
    #[must_use]
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Conversation history
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Final message of the conversation
    #[must_use]
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Provider
    #[must_use]
    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Sampling temperature
    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Requested token limit, as given by the caller
    #[must_use]
    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Client-held keys
    #[must_use]
    pub fn supplied_keys(&self) -> &SuppliedKeys {
        &self.supplied_keys
    }

    /// Thread ID, if the caller sent one
    #[must_use]
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }
}

impl TryFrom<ChatCompletionBody> for CompletionRequest {
    type Error = GatewayError;

    fn try_from(body: ChatCompletionBody) -> Result<Self, Self::Error> {
        let max_tokens = body.token_limit();
        let messages = body.messages.unwrap_or_default();
        if messages.is_empty() {
            return Err(GatewayError::invalid_request(
                "Messages array is required and cannot be empty",
            ));
        }

        let (Some(model), Some(provider)) = (
            body.model.filter(|m| !m.trim().is_empty()),
            body.provider.filter(|p| !p.is_empty()),
        ) else {
            return Err(GatewayError::invalid_request(
                "Model and provider are required parameters",
            ));
        };

        let provider: ProviderKind = provider.parse()?;

        let mut request = Self::new(provider, model, messages)?
            .with_supplied_keys(body.api_keys.unwrap_or_default());
        if let Some(temperature) = body.temperature.filter(|t| t.abs() > 0.0) {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(thread_id) = body.thread_id {
            request = request.with_thread_id(thread_id);
        }

        Ok(request)
    }
}
