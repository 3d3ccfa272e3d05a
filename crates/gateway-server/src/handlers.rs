//! HTTP request handlers for the gateway API.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use gateway_core::{ChatCompletionBody, CompletionResult, ProviderKind, SuppliedKeys, TitleResult};
use gateway_providers::dated_title;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::ApiError,
    extractors::{JsonBody, RequestId},
    state::AppState,
};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Version
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Metrics endpoint (Prometheus format)
pub async fn metrics_endpoint(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.metrics.render().map_err(|e| {
        error!(error = %e, "Failed to render metrics");
        ApiError::internal("Failed to render metrics")
    })?;

    Ok(([(header::CONTENT_TYPE, state.metrics.content_type())], body))
}

/// Answer for `OPTIONS` requests that are not CORS preflights
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Chat completion endpoint
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn chat_completion(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(body): JsonBody<ChatCompletionBody>,
) -> Result<Json<CompletionResult>, ApiError> {
    // Unknown identifiers share one label
    let provider_label = body
        .provider
        .as_deref()
        .and_then(|p| p.parse::<ProviderKind>().ok())
        .map_or("unknown", ProviderKind::as_str);

    debug!(
        provider = provider_label,
        model = body.model.as_deref().unwrap_or("-"),
        "Received chat completion request"
    );

    let start = Instant::now();
    let result = state.gateway.complete_body(body).await;
    let elapsed = start.elapsed();

    match result {
        Ok(result) => {
            state
                .metrics
                .record_completion(provider_label, "success", elapsed);
            state.metrics.record_tokens(
                provider_label,
                result.usage.prompt_tokens,
                result.usage.completion_tokens,
            );
            info!(
                provider = provider_label,
                latency_ms = elapsed.as_millis(),
                "Chat completion served"
            );
            Ok(Json(result))
        }
        Err(e) => {
            state
                .metrics
                .record_completion(provider_label, e.kind(), elapsed);
            Err(e.into())
        }
    }
}

/// Title request body
///
/// `apiKeys` is decoded separately so a malformed key map does not cost the
/// message.
#[derive(Debug, Deserialize)]
struct TitleBody {
    message: Option<String>,
    #[serde(rename = "apiKeys", default)]
    api_keys: Option<serde_json::Value>,
}

fn supplied_keys(raw: Option<serde_json::Value>) -> SuppliedKeys {
    raw.and_then(|value| {
        serde_json::from_value(value)
            .map_err(|e| warn!(error = %e, "Ignoring malformed apiKeys in title request"))
            .ok()
    })
    .unwrap_or_default()
}

/// Title generation endpoint
///
/// Always answers 200. The body is parsed by hand so that malformed input
/// still yields a title.
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn generate_title(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    body: Bytes,
) -> Json<TitleResult> {
    let result = match serde_json::from_slice::<TitleBody>(&body) {
        Ok(TitleBody {
            message: Some(message),
            api_keys,
        }) => {
            state
                .titles
                .generate(&message, &supplied_keys(api_keys))
                .await
        }
        Ok(_) => {
            warn!("Title request without message, using dated title");
            dated_title(Utc::now())
        }
        Err(e) => {
            warn!(error = %e, "Title request body is not valid JSON, using dated title");
            dated_title(Utc::now())
        }
    };

    state.metrics.record_title(result.source.as_str());
    debug!(source = result.source.as_str(), "Title produced");

    Json(result)
}
