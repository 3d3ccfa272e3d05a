//! Thread title generation with a heuristic fallback.
//!
//! Title generation never fails. Any problem on the model path produces a
//! heuristic title instead, and the reason is logged and reported through
//! [`gateway_core::TitleSource`] so callers can count it.

use crate::orchestrator::CompletionGateway;
use chrono::{DateTime, Utc};
use gateway_core::{
    ChatMessage, CompletionRequest, FallbackReason, GatewayError, ProviderKind, Settings,
    SuppliedKeys, TitleResult,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Title model used when settings name none
pub const DEFAULT_TITLE_MODEL: &str = "anthropic/claude-3-haiku";

/// Provider used when settings name none
pub const DEFAULT_TITLE_PROVIDER: &str = "openrouter";

/// System instruction sent with every title request
pub const TITLE_INSTRUCTION: &str = "Generate a short, concise title (max 5 words) for the following message. Only return the title, nothing else.";

/// Title used when the model or heuristic yields nothing
pub const EMPTY_TITLE: &str = "New Chat";

const TITLE_TEMPERATURE: f32 = 0.3;
const TITLE_MAX_TOKENS: u32 = 20;
const HEURISTIC_WORDS: usize = 5;
const HEURISTIC_MAX_CHARS: usize = 30;

/// Title generator sharing the completion path
#[derive(Debug, Clone)]
pub struct TitleGenerator {
    gateway: Arc<CompletionGateway>,
}

impl TitleGenerator {
    /// Create a generator on top of a completion gateway
    #[must_use]
    pub fn new(gateway: Arc<CompletionGateway>) -> Self {
        Self { gateway }
    }

    /// Title for `message` against a fresh settings snapshot
    pub async fn generate(&self, message: &str, keys: &SuppliedKeys) -> TitleResult {
        let settings = self.gateway.settings_snapshot().await;
        self.generate_with(message, keys, settings.as_ref()).await
    }

    /// Title for `message` against the given settings
    pub async fn generate_with(
        &self,
        message: &str,
        keys: &SuppliedKeys,
        settings: Option<&Settings>,
    ) -> TitleResult {
        let model = settings
            .and_then(|s| s.utility_title_model.as_deref())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE_MODEL);
        let provider = settings
            .and_then(|s| s.chat_using.as_deref())
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_TITLE_PROVIDER);

        let kind = match provider.parse::<ProviderKind>() {
            Ok(kind @ (ProviderKind::OpenAI | ProviderKind::OpenRouter)) => kind,
            _ => {
                warn!(provider, "Title provider not supported, using heuristic title");
                return fallback(message, FallbackReason::UnsupportedProvider);
            }
        };

        debug!(provider = %kind, model, "Generating title");

        let request = match CompletionRequest::new(
            kind,
            model,
            vec![ChatMessage::system(TITLE_INSTRUCTION), ChatMessage::user(message)],
        ) {
            Ok(request) => request
                .with_temperature(TITLE_TEMPERATURE)
                .with_max_tokens(TITLE_MAX_TOKENS)
                .with_supplied_keys(keys.clone()),
            Err(e) => {
                warn!(error = %e, "Title request invalid, using heuristic title");
                return fallback(message, FallbackReason::InvalidInput);
            }
        };

        match self.gateway.complete_with(&request, settings).await {
            Ok(result) => {
                let title = result.content.trim();
                let title = if title.is_empty() { EMPTY_TITLE } else { title };
                info!(provider = %kind, model, "Generated title");
                TitleResult::generated(title)
            }
            Err(e) => {
                let reason = fallback_reason(&e);
                warn!(
                    provider = %kind,
                    model,
                    reason = reason.as_str(),
                    error = %e,
                    "Title generation failed, using heuristic title"
                );
                fallback(message, reason)
            }
        }
    }
}

fn fallback(message: &str, reason: FallbackReason) -> TitleResult {
    TitleResult::fallback(heuristic_title(message), reason)
}

fn fallback_reason(err: &GatewayError) -> FallbackReason {
    match err {
        GatewayError::InvalidRequest { .. } => FallbackReason::InvalidInput,
        GatewayError::UnsupportedProvider { .. } => FallbackReason::UnsupportedProvider,
        GatewayError::MissingCredential { .. } => FallbackReason::MissingCredential,
        GatewayError::Upstream { .. } => FallbackReason::UpstreamError,
        GatewayError::MalformedUpstreamResponse { .. } => FallbackReason::MalformedResponse,
        GatewayError::InternalFailure { .. } => FallbackReason::TransportFailure,
    }
}

/// First five words of `message`, cut to 30 characters plus `...` if longer
#[must_use]
pub fn heuristic_title(message: &str) -> String {
    let title = message
        .split_whitespace()
        .take(HEURISTIC_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        return EMPTY_TITLE.to_string();
    }
    if title.chars().count() > HEURISTIC_MAX_CHARS {
        let cut: String = title.chars().take(HEURISTIC_MAX_CHARS).collect();
        return format!("{cut}...");
    }
    title
}

/// `Chat M/D/YYYY`, used when there is no message at all
#[must_use]
pub fn dated_title(now: DateTime<Utc>) -> TitleResult {
    TitleResult::fallback(
        format!("Chat {}", now.format("%-m/%-d/%Y")),
        FallbackReason::InvalidInput,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::UpstreamClient;
    use crate::credentials::EnvCredentials;
    use crate::registry::{ProviderRegistry, RegistryConfig};
    use chrono::TimeZone;
    use gateway_core::{StaticSettingsStore, TitleSource};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer, env: EnvCredentials, settings: Option<Settings>) -> TitleGenerator {
        let config = RegistryConfig::default().with_base_url(server.uri());
        let store = settings.map_or_else(StaticSettingsStore::empty, StaticSettingsStore::new);
        TitleGenerator::new(Arc::new(CompletionGateway::new(
            Arc::new(ProviderRegistry::from_config(&config)),
            UpstreamClient::new(Duration::from_secs(5)).unwrap(),
            Arc::new(env),
            Arc::new(store),
        )))
    }

    fn openrouter_env() -> EnvCredentials {
        EnvCredentials::default().with_key(ProviderKind::OpenRouter, "sk-or")
    }

    const MESSAGE: &str = "one two three four five six seven";

    #[test]
    fn test_heuristic_takes_five_words() {
        assert_eq!(heuristic_title(MESSAGE), "one two three four five");
        assert_eq!(heuristic_title("  spaced\n\tout   words "), "spaced out words");
    }

    #[test]
    fn test_heuristic_truncates_long_titles() {
        let title = heuristic_title("internationalization considerations for distributed systems");
        assert_eq!(title, "internationalization considera...");
        assert_eq!(title.chars().count(), 33);
    }

    #[test]
    fn test_heuristic_empty_message() {
        assert_eq!(heuristic_title(""), EMPTY_TITLE);
        assert_eq!(heuristic_title("   "), EMPTY_TITLE);
    }

    #[test]
    fn test_dated_title() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(dated_title(now).title, "Chat 3/7/2024");
    }

    #[tokio::test]
    async fn test_model_title() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-or"))
            .and(body_partial_json(json!({
                "model": DEFAULT_TITLE_MODEL,
                "max_tokens": 20,
                "messages": [
                    {"role": "system", "content": TITLE_INSTRUCTION},
                    {"role": "user", "content": MESSAGE}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "  Counting To Seven \n"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = generator(&server, openrouter_env(), None)
            .generate(MESSAGE, &SuppliedKeys::default())
            .await;

        assert_eq!(result.title, "Counting To Seven");
        assert_eq!(result.source, TitleSource::Model);
    }

    #[tokio::test]
    async fn test_empty_model_title() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "   "}}]
            })))
            .mount(&server)
            .await;

        let result = generator(&server, openrouter_env(), None)
            .generate(MESSAGE, &SuppliedKeys::default())
            .await;
        assert_eq!(result.title, EMPTY_TITLE);
    }

    #[tokio::test]
    async fn test_upstream_500_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = generator(&server, openrouter_env(), None)
            .generate(MESSAGE, &SuppliedKeys::default())
            .await;

        assert_eq!(result.title, "one two three four five");
        assert_eq!(result.source, TitleSource::Fallback(FallbackReason::UpstreamError));
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let result = generator(&server, openrouter_env(), None)
            .generate(MESSAGE, &SuppliedKeys::default())
            .await;

        assert_eq!(result.title, "one two three four five");
        assert_eq!(
            result.source,
            TitleSource::Fallback(FallbackReason::MalformedResponse)
        );
    }

    #[tokio::test]
    async fn test_missing_key_falls_back_without_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = generator(&server, EnvCredentials::default(), None)
            .generate(MESSAGE, &SuppliedKeys::default())
            .await;

        assert_eq!(
            result.source,
            TitleSource::Fallback(FallbackReason::MissingCredential)
        );
    }

    #[tokio::test]
    async fn test_huggingface_not_used_for_titles() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let settings = Settings::default().with_chat_using("huggingface");
        let env = EnvCredentials::default().with_key(ProviderKind::HuggingFace, "hf");
        let result = generator(&server, env, Some(settings))
            .generate(MESSAGE, &SuppliedKeys::default())
            .await;

        assert_eq!(
            result.source,
            TitleSource::Fallback(FallbackReason::UnsupportedProvider)
        );
    }

    #[tokio::test]
    async fn test_settings_choose_provider_and_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer sk-local"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Local Key Title"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let settings = Settings::default()
            .with_chat_using("openai")
            .with_title_model("gpt-4o-mini");
        let keys = SuppliedKeys::default().with_key(ProviderKind::OpenAI, "sk-local");
        let result = generator(&server, EnvCredentials::default(), Some(settings))
            .generate(MESSAGE, &keys)
            .await;

        assert_eq!(result.title, "Local Key Title");
    }
}
