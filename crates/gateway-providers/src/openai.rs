//! OpenAI-compatible chat completions adapter.
//!
//! Serves both OpenAI and OpenRouter. The wire format is identical; OpenRouter
//! additionally wants two identification headers on every call.

use crate::adapter::{is_success, ChatPayload, ProviderAdapter, ProviderPayload};
use gateway_core::{
    CompletionRequest, CompletionResult, GatewayError, GatewayResult, ProviderKind, Usage,
};
use serde::Deserialize;

/// Default OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default OpenRouter API base URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default `HTTP-Referer` sent to OpenRouter
pub const DEFAULT_OPENROUTER_REFERER: &str = "https://lovable.dev";

/// Default `X-Title` sent to OpenRouter
pub const DEFAULT_OPENROUTER_TITLE: &str = "Multi-Mind Companion";

/// Adapter for OpenAI-style `/chat/completions` endpoints
#[derive(Debug, Clone)]
pub struct OpenAICompatAdapter {
    kind: ProviderKind,
    endpoint: String,
    headers: Vec<(String, String)>,
}

impl OpenAICompatAdapter {
    /// OpenAI adapter rooted at `base_url`
    #[must_use]
    pub fn openai(base_url: &str) -> Self {
        Self {
            kind: ProviderKind::OpenAI,
            endpoint: chat_endpoint(base_url),
            headers: Vec::new(),
        }
    }

    /// OpenRouter adapter rooted at `base_url` with its identification headers
    #[must_use]
    pub fn openrouter(base_url: &str, referer: &str, title: &str) -> Self {
        Self {
            kind: ProviderKind::OpenRouter,
            endpoint: chat_endpoint(base_url),
            headers: vec![
                ("HTTP-Referer".to_string(), referer.to_string()),
                ("X-Title".to_string(), title.to_string()),
            ],
        }
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

impl ProviderAdapter for OpenAICompatAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn endpoint_template(&self) -> &str {
        &self.endpoint
    }

    fn static_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn adapt(&self, request: &CompletionRequest) -> ProviderPayload {
        ProviderPayload::Chat(ChatPayload {
            model: request.model().to_string(),
            messages: request.messages().to_vec(),
            temperature: request.temperature(),
            stream: false,
            // Some backends read 0 as "no limit", others reject it
            max_tokens: request.max_tokens().filter(|&n| n > 0),
        })
    }

    fn normalize(
        &self,
        request: &CompletionRequest,
        status: u16,
        body: &str,
    ) -> GatewayResult<CompletionResult> {
        if !is_success(status) {
            return Err(GatewayError::upstream(self.kind, status, body));
        }

        let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
            GatewayError::malformed(self.kind, format!("Failed to parse response: {e}"))
        })?;

        let choice = response
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::malformed(self.kind, "No choices in response"))?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .unwrap_or_default();
        let usage = response.usage.unwrap_or_default();

        Ok(CompletionResult {
            content,
            model: request.model().to_string(),
            provider: self.kind,
            usage: Usage::new(
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            ),
        })
    }
}

// ============================================================================
// OpenAI API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Option<Vec<ChatChoice>>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
    #[serde(default)]
    total_tokens: Option<u32>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_core::ChatMessage;
    use serde_json::json;

    fn request(max_tokens: Option<u32>) -> CompletionRequest {
        let request = CompletionRequest::new(
            ProviderKind::OpenAI,
            "gpt-4o-mini",
            vec![ChatMessage::system("Be brief"), ChatMessage::user("Hello")],
        )
        .unwrap();
        match max_tokens {
            Some(n) => request.with_max_tokens(n),
            None => request,
        }
    }

    #[test]
    fn test_endpoints() {
        let openai = OpenAICompatAdapter::openai(OPENAI_BASE_URL);
        assert_eq!(
            openai.endpoint("gpt-4"),
            "https://api.openai.com/v1/chat/completions"
        );

        let openrouter = OpenAICompatAdapter::openrouter(
            "https://openrouter.ai/api/v1/",
            DEFAULT_OPENROUTER_REFERER,
            DEFAULT_OPENROUTER_TITLE,
        );
        assert_eq!(
            openrouter.endpoint("anthropic/claude-3-haiku"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_openrouter_identification_headers() {
        let adapter = OpenAICompatAdapter::openrouter(OPENROUTER_BASE_URL, "https://example.dev", "Companion");
        let headers = adapter.static_headers();
        assert!(headers.contains(&("HTTP-Referer".to_string(), "https://example.dev".to_string())));
        assert!(headers.contains(&("X-Title".to_string(), "Companion".to_string())));

        assert!(OpenAICompatAdapter::openai(OPENAI_BASE_URL).static_headers().is_empty());
    }

    #[test]
    fn test_adapt_omits_max_tokens_when_absent_or_zero() {
        let adapter = OpenAICompatAdapter::openai(OPENAI_BASE_URL);

        for max_tokens in [None, Some(0)] {
            let payload = serde_json::to_value(adapter.adapt(&request(max_tokens))).unwrap();
            assert!(payload.get("max_tokens").is_none(), "{payload}");
        }

        let payload = serde_json::to_value(adapter.adapt(&request(Some(256)))).unwrap();
        assert_eq!(payload["max_tokens"], 256);
    }

    #[test]
    fn test_adapt_sends_full_history() {
        let adapter = OpenAICompatAdapter::openai(OPENAI_BASE_URL);
        let payload = serde_json::to_value(adapter.adapt(&request(None))).unwrap();

        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["stream"], false);
        assert_eq!(
            payload["messages"],
            json!([
                {"role": "system", "content": "Be brief"},
                {"role": "user", "content": "Hello"}
            ])
        );
    }

    #[test]
    fn test_normalize_success() {
        let adapter = OpenAICompatAdapter::openai(OPENAI_BASE_URL);
        let body = json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi!"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14}
        })
        .to_string();

        let result = adapter.normalize(&request(None), 200, &body).unwrap();
        assert_eq!(result.content, "Hi!");
        assert_eq!(result.model, "gpt-4o-mini");
        assert_eq!(result.provider, ProviderKind::OpenAI);
        assert_eq!(result.usage, Usage::new(12, 2, 14));
    }

    #[test]
    fn test_normalize_defaults_missing_usage_and_content() {
        let adapter = OpenAICompatAdapter::openai(OPENAI_BASE_URL);
        let body = json!({"choices": [{"message": {"role": "assistant", "content": null}}]}).to_string();

        let result = adapter.normalize(&request(None), 200, &body).unwrap();
        assert_eq!(result.content, "");
        assert_eq!(result.usage, Usage::default());
    }

    #[test]
    fn test_normalize_without_choices_is_malformed() {
        let adapter = OpenAICompatAdapter::openai(OPENAI_BASE_URL);

        for body in [json!({"choices": []}), json!({"object": "chat.completion"})] {
            let err = adapter
                .normalize(&request(None), 200, &body.to_string())
                .unwrap_err();
            assert_eq!(err.kind(), "malformed_upstream_response");
        }

        let err = adapter.normalize(&request(None), 200, "<html>").unwrap_err();
        assert_eq!(err.kind(), "malformed_upstream_response");
    }

    #[test]
    fn test_normalize_rate_limit_passthrough() {
        let adapter = OpenAICompatAdapter::openrouter(
            OPENROUTER_BASE_URL,
            DEFAULT_OPENROUTER_REFERER,
            DEFAULT_OPENROUTER_TITLE,
        );
        let err = adapter
            .normalize(&request(None), 429, "{\"error\":\"rate limited\"}")
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::Upstream {
                provider: ProviderKind::OpenRouter,
                status_code: 429,
                body: "{\"error\":\"rate limited\"}".to_string(),
            }
        );
    }
}
