//! Outbound HTTP dispatch.

use crate::adapter::{ProviderAdapter, ProviderPayload};
use gateway_core::{GatewayError, GatewayResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on one upstream call, connect through body
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw upstream reply, handed to the adapter for normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    /// HTTP status
    pub status: u16,
    /// Body text
    pub body: String,
}

/// Shared HTTP client for upstream calls
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    timeout: Duration,
}

impl UpstreamClient {
    /// Client with the given total timeout
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                GatewayError::internal("Failed to create HTTP client", Some(e.to_string()))
            })?;

        Ok(Self { http, timeout })
    }

    /// Send one request, no retries
    ///
    /// Any status is returned as a reply; only transport failures are errors.
    pub async fn dispatch(
        &self,
        adapter: &dyn ProviderAdapter,
        url: &str,
        key: &SecretString,
        payload: &ProviderPayload,
    ) -> GatewayResult<UpstreamReply> {
        let provider = adapter.kind();
        let mut request = self
            .http
            .post(url)
            .bearer_auth(key.expose_secret())
            .json(payload);
        for (name, value) in adapter.static_headers() {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!(provider = %provider, url = %url, "Dispatching upstream request");

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(provider.label(), &e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(provider.label(), &e))?;

        debug!(provider = %provider, status, body_len = body.len(), "Upstream replied");

        Ok(UpstreamReply { status, body })
    }

    fn transport_error(&self, label: &str, err: &reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            warn!(provider = label, timeout_ms = self.timeout.as_millis(), "Upstream request timed out");
            GatewayError::internal(
                format!("{label} request timed out"),
                Some(format!("no response within {}ms", self.timeout.as_millis())),
            )
        } else {
            warn!(provider = label, error = %err, "Upstream request failed");
            GatewayError::internal(format!("{label} request failed"), Some(err.to_string()))
        }
    }
}
