//! Completion orchestrator.
//!
//! Drives one completion through validation, credential resolution,
//! adaptation, a single upstream call and normalization. Nothing is retried
//! and nothing is persisted. Any failing step ends the invocation with a
//! [`GatewayError`].

use crate::client::UpstreamClient;
use crate::credentials::{presence, resolve_key, EnvCredentials};
use crate::registry::ProviderRegistry;
use crate::settings_store::load_snapshot;
use gateway_core::{
    ChatCompletionBody, CompletionRequest, CompletionResult, GatewayError, GatewayResult,
    Settings, SettingsStore,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Provider-agnostic completion entry point
#[derive(Clone)]
pub struct CompletionGateway {
    registry: Arc<ProviderRegistry>,
    client: UpstreamClient,
    env: Arc<EnvCredentials>,
    settings: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for CompletionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionGateway")
            .field("registry", &self.registry)
            .field("client", &self.client)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

impl CompletionGateway {
    /// Create a gateway from its shared collaborators
    #[must_use]
    pub fn new(
        registry: Arc<ProviderRegistry>,
        client: UpstreamClient,
        env: Arc<EnvCredentials>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            registry,
            client,
            env,
            settings,
        }
    }

    /// Fresh settings snapshot, `None` when absent or unreadable
    pub async fn settings_snapshot(&self) -> Option<Settings> {
        load_snapshot(self.settings.as_ref()).await
    }

    /// Validate an inbound body and complete it
    pub async fn complete_body(&self, body: ChatCompletionBody) -> GatewayResult<CompletionResult> {
        let request = CompletionRequest::try_from(body)?;
        self.complete(&request).await
    }

    /// Complete a validated request against a fresh settings snapshot
    pub async fn complete(&self, request: &CompletionRequest) -> GatewayResult<CompletionResult> {
        let settings = self.settings_snapshot().await;
        self.complete_with(request, settings.as_ref()).await
    }

    /// Complete a validated request against the given settings
    pub async fn complete_with(
        &self,
        request: &CompletionRequest,
        settings: Option<&Settings>,
    ) -> GatewayResult<CompletionResult> {
        let provider = request.provider();
        info!(
            provider = %provider,
            model = %request.model(),
            thread_id = request.thread_id().unwrap_or("-"),
            messages = request.messages().len(),
            "Processing completion request"
        );

        let entry = self
            .registry
            .resolve_kind(provider)
            .ok_or_else(|| GatewayError::unsupported_provider(provider.as_str()))?;

        let resolved = resolve_key(provider, request.supplied_keys(), settings, &self.env)
            .map_err(|e| {
                warn!(
                    provider = %provider,
                    request_key = presence(request.supplied_keys().get(provider)),
                    settings_key = presence(settings.and_then(|s| s.api_key(provider))),
                    env_key = presence(self.env.get(provider)),
                    "No API key available"
                );
                e
            })?;
        debug!(provider = %provider, key_source = resolved.source.as_str(), "Resolved API key");

        let adapter = entry.adapter.as_ref();
        let payload = adapter.adapt(request);
        let url = adapter.endpoint(request.model());

        let reply = self
            .client
            .dispatch(adapter, &url, &resolved.key, &payload)
            .await?;

        let result = adapter
            .normalize(request, reply.status, &reply.body)
            .map_err(|e| {
                warn!(
                    provider = %provider,
                    status = reply.status,
                    kind = e.kind(),
                    error = %e,
                    "Upstream call did not produce a completion"
                );
                e
            })?;

        info!(
            provider = %provider,
            model = %result.model,
            prompt_tokens = result.usage.prompt_tokens,
            completion_tokens = result.usage.completion_tokens,
            total_tokens = result.usage.total_tokens,
            "Completion succeeded"
        );

        Ok(result)
    }
}
