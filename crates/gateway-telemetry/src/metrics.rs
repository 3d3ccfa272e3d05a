//! Prometheus metrics.

use crate::TelemetryError;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

const DURATION_BUCKETS: [f64; 9] = [0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0];

/// Gateway metrics on a private registry
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    completions_total: IntCounterVec,
    completion_duration: HistogramVec,
    tokens_total: IntCounterVec,
    titles_total: IntCounterVec,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create and register every metric
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let completions_total = IntCounterVec::new(
            Opts::new(
                "companion_completions_total",
                "Completion requests by provider and outcome",
            ),
            &["provider", "outcome"],
        )?;
        let completion_duration = HistogramVec::new(
            HistogramOpts::new(
                "companion_completion_duration_seconds",
                "Completion latency including the upstream call",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["provider"],
        )?;
        let tokens_total = IntCounterVec::new(
            Opts::new(
                "companion_tokens_total",
                "Tokens reported or estimated by provider and kind",
            ),
            &["provider", "kind"],
        )?;
        let titles_total = IntCounterVec::new(
            Opts::new("companion_titles_total", "Titles produced by source"),
            &["source"],
        )?;

        registry.register(Box::new(completions_total.clone()))?;
        registry.register(Box::new(completion_duration.clone()))?;
        registry.register(Box::new(tokens_total.clone()))?;
        registry.register(Box::new(titles_total.clone()))?;

        Ok(Self {
            registry,
            completions_total,
            completion_duration,
            tokens_total,
            titles_total,
        })
    }

    /// Record one completion
    ///
    /// `outcome` is `success` or the error kind.
    pub fn record_completion(&self, provider: &str, outcome: &str, duration: Duration) {
        self.completions_total
            .with_label_values(&[provider, outcome])
            .inc();
        self.completion_duration
            .with_label_values(&[provider])
            .observe(duration.as_secs_f64());
    }

    /// Record token usage
    pub fn record_tokens(&self, provider: &str, prompt: u32, completion: u32) {
        self.tokens_total
            .with_label_values(&[provider, "prompt"])
            .inc_by(u64::from(prompt));
        self.tokens_total
            .with_label_values(&[provider, "completion"])
            .inc_by(u64::from(completion));
    }

    /// Record one title by source
    pub fn record_title(&self, source: &str) {
        self.titles_total.with_label_values(&[source]).inc();
    }

    /// Render in the Prometheus text exposition format
    pub fn render(&self) -> Result<String, TelemetryError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| TelemetryError::Encode(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Encode(e.to_string()))
    }

    /// Content type of [`Metrics::render`] output
    #[must_use]
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}
