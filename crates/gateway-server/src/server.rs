//! Server lifecycle.

use crate::error::ServerError;
use crate::routes::create_router;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use gateway_config::ServerConfig;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// HTTP server
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a server
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Self::serve(listener, self.state, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// In-flight requests are allowed to finish.
    pub async fn serve(
        listener: TcpListener,
        state: AppState,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            info!(address = %addr, "Server listening");
        }

        axum::serve(listener, create_router(state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        info!("Server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_core::StaticSettingsStore;
    use gateway_providers::{
        CompletionGateway, EnvCredentials, ProviderRegistry, UpstreamClient,
        DEFAULT_UPSTREAM_TIMEOUT,
    };
    use gateway_telemetry::Metrics;
    use std::sync::Arc;

    fn state() -> AppState {
        let gateway = CompletionGateway::new(
            Arc::new(ProviderRegistry::with_defaults()),
            UpstreamClient::new(DEFAULT_UPSTREAM_TIMEOUT).unwrap(),
            Arc::new(EnvCredentials::default()),
            Arc::new(StaticSettingsStore::empty()),
        );
        AppState::new(Arc::new(gateway), Metrics::new().unwrap())
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(Server::serve(listener, state(), async {
            let _ = rx.await;
        }));

        let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_bind_error() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
        };
        let err = Server::new(config, state()).run().await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
    }
}
