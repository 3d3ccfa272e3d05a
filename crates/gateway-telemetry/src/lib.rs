//! # Gateway Telemetry
//!
//! Observability for the companion gateway.
//!
//! This crate provides:
//! - Structured logging initialisation (human or JSON)
//! - Prometheus metrics for completions, token usage and titles

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;
pub mod metrics;

// Re-export main types
pub use logging::{init_logging, LoggingConfig};
pub use metrics::Metrics;

/// Telemetry initialisation error
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Global subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric could not be created or registered
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Metrics could not be rendered
    #[error("Failed to encode metrics: {0}")]
    Encode(String),
}
