//! Hugging Face inference API adapter.
//!
//! The inference API takes a single prompt, not a conversation. Only the
//! content of the last message is sent; earlier turns are dropped. This is a
//! limitation of the upstream API and callers must not expect history to be
//! honoured for this provider.
//!
//! The API reports no token usage. Usage is estimated at four UTF-16 code
//! units per token, which is a coarse approximation and must not be fed into
//! cost accounting as if it were a tokenizer count.

use crate::adapter::{
    is_success, InferenceParameters, InferencePayload, ProviderAdapter, ProviderPayload,
    MODEL_PLACEHOLDER,
};
use gateway_core::{
    CompletionRequest, CompletionResult, GatewayError, GatewayResult, ProviderKind, Usage,
};
use serde_json::Value;

/// Default Hugging Face inference API base URL
pub const HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";

/// `max_new_tokens` used when the caller gives no positive limit
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;

/// Content returned when the API produced no text
pub const NO_RESPONSE: &str = "No response generated";

const CHARS_PER_TOKEN: usize = 4;

/// Adapter for `POST {base}/models/{model}`
#[derive(Debug, Clone)]
pub struct HuggingFaceAdapter {
    endpoint: String,
}

impl HuggingFaceAdapter {
    /// Adapter rooted at `base_url`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!(
                "{}/models/{MODEL_PLACEHOLDER}",
                base_url.trim_end_matches('/')
            ),
        }
    }
}

impl Default for HuggingFaceAdapter {
    fn default() -> Self {
        Self::new(HUGGINGFACE_BASE_URL)
    }
}

/// Estimated token count for `text`, rounded up
#[must_use]
pub fn estimate_tokens(text: &str) -> u32 {
    let units = text.encode_utf16().count();
    u32::try_from(units.div_ceil(CHARS_PER_TOKEN)).unwrap_or(u32::MAX)
}

fn last_content(request: &CompletionRequest) -> &str {
    request.last_message().map_or("", |m| m.content.as_str())
}

impl ProviderAdapter for HuggingFaceAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn endpoint_template(&self) -> &str {
        &self.endpoint
    }

    fn adapt(&self, request: &CompletionRequest) -> ProviderPayload {
        ProviderPayload::Inference(InferencePayload {
            inputs: last_content(request).to_string(),
            parameters: InferenceParameters {
                temperature: request.temperature(),
                max_new_tokens: request
                    .max_tokens()
                    .filter(|&n| n > 0)
                    .unwrap_or(DEFAULT_MAX_NEW_TOKENS),
            },
        })
    }

    fn normalize(
        &self,
        request: &CompletionRequest,
        status: u16,
        body: &str,
    ) -> GatewayResult<CompletionResult> {
        if !is_success(status) {
            return Err(GatewayError::upstream(ProviderKind::HuggingFace, status, body));
        }

        let value: Value = serde_json::from_str(body).map_err(|e| {
            GatewayError::malformed(
                ProviderKind::HuggingFace,
                format!("Failed to parse response: {e}"),
            )
        })?;

        let content = value
            .get(0)
            .and_then(|first| first.get("generated_text"))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map_or_else(|| NO_RESPONSE.to_string(), str::to_string);

        let prompt_tokens = estimate_tokens(last_content(request));
        let completion_tokens = estimate_tokens(&content);

        Ok(CompletionResult {
            content,
            model: request.model().to_string(),
            provider: ProviderKind::HuggingFace,
            usage: Usage::new(
                prompt_tokens,
                completion_tokens,
                prompt_tokens.saturating_add(completion_tokens),
            ),
        })
    }
}
