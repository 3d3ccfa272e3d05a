//! Provider adapter contract.
//!
//! One implementation per wire format. An adapter knows its endpoint, the
//! static headers it needs, how to build the outgoing payload and how to
//! turn the raw reply into a [`CompletionResult`].

use gateway_core::{ChatMessage, CompletionRequest, CompletionResult, GatewayResult, ProviderKind};
use serde::Serialize;

/// Placeholder substituted with the model ID in endpoint templates
pub const MODEL_PLACEHOLDER: &str = "{model}";

/// Capability set implemented once per provider
pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    /// Provider served by this adapter
    fn kind(&self) -> ProviderKind;

    /// Endpoint URL, possibly containing [`MODEL_PLACEHOLDER`]
    fn endpoint_template(&self) -> &str;

    /// Concrete endpoint for a model
    fn endpoint(&self, model: &str) -> String {
        self.endpoint_template().replace(MODEL_PLACEHOLDER, model)
    }

    /// Fixed headers added to every outgoing call
    fn static_headers(&self) -> &[(String, String)] {
        &[]
    }

    /// Build the provider payload
    fn adapt(&self, request: &CompletionRequest) -> ProviderPayload;

    /// Turn a raw upstream reply into a normalized result
    fn normalize(
        &self,
        request: &CompletionRequest,
        status: u16,
        body: &str,
    ) -> GatewayResult<CompletionResult>;
}

/// Outgoing request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderPayload {
    /// OpenAI-style chat completion
    Chat(ChatPayload),
    /// Hugging Face text-generation inference
    Inference(InferencePayload),
}

/// OpenAI-style chat completion body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatPayload {
    /// Model ID
    pub model: String,
    /// Full conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Always false
    pub stream: bool,
    /// Only present when the caller asked for a positive limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Hugging Face inference body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferencePayload {
    /// Prompt text
    pub inputs: String,
    /// Generation parameters
    pub parameters: InferenceParameters,
}

/// Hugging Face generation parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceParameters {
    /// Sampling temperature
    pub temperature: f32,
    /// Output token limit
    pub max_new_tokens: u32,
}

/// Whether an HTTP status is in the 2xx range
pub(crate) fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
