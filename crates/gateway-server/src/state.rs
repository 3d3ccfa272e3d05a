//! Shared application state.

use gateway_providers::{CompletionGateway, TitleGenerator};
use gateway_telemetry::Metrics;
use std::sync::Arc;

/// State shared by every handler
///
/// Everything in here is immutable after start-up.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Completion orchestrator
    pub gateway: Arc<CompletionGateway>,
    /// Title generator built on the same gateway
    pub titles: Arc<TitleGenerator>,
    /// Prometheus metrics
    pub metrics: Metrics,
}

impl AppState {
    /// Create state around a gateway
    #[must_use]
    pub fn new(gateway: Arc<CompletionGateway>, metrics: Metrics) -> Self {
        Self {
            titles: Arc::new(TitleGenerator::new(Arc::clone(&gateway))),
            gateway,
            metrics,
        }
    }
}
