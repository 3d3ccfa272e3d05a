//! Route definitions for the gateway API.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware, state::AppState};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        // Metrics endpoint
        .route("/metrics", get(handlers::metrics_endpoint))
        // Function endpoints, also reachable under the hosted prefix
        .merge(function_routes())
        .nest("/functions/v1", function_routes())
        // Apply middleware
        .layer(middleware::trace_layer())
        .layer(middleware::cors_layer())
        // Add state
        .with_state(state)
}

/// Chat completion and title routes
fn function_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/chat-completion",
            post(handlers::chat_completion).options(handlers::preflight),
        )
        .route(
            "/generate-title",
            post(handlers::generate_title).options(handlers::preflight),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use gateway_core::StaticSettingsStore;
    use gateway_providers::{
        CompletionGateway, EnvCredentials, ProviderRegistry, UpstreamClient,
        DEFAULT_UPSTREAM_TIMEOUT,
    };
    use gateway_telemetry::Metrics;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let gateway = CompletionGateway::new(
            Arc::new(ProviderRegistry::with_defaults()),
            UpstreamClient::new(DEFAULT_UPSTREAM_TIMEOUT).unwrap(),
            Arc::new(EnvCredentials::default()),
            Arc::new(StaticSettingsStore::empty()),
        );
        AppState::new(Arc::new(gateway), Metrics::new().unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_function_routes_need_post() {
        for uri in ["/chat-completion", "/functions/v1/generate-title"] {
            let app = create_router(create_test_state());

            let response = app
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        }
    }
}
