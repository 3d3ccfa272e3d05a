//! PostgREST-backed settings store.
//!
//! Reads the single settings row with the service key. The row is fetched
//! per call and never cached.

use async_trait::async_trait;
use gateway_core::{Settings, SettingsStore, SettingsStoreError};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, warn};

/// Default settings table
pub const DEFAULT_SETTINGS_TABLE: &str = "app_settings";

/// Store reading `{base_url}/rest/v1/{table}`
#[derive(Debug, Clone)]
pub struct PostgrestSettingsStore {
    http: Client,
    endpoint: String,
    service_key: SecretString,
}

impl PostgrestSettingsStore {
    /// Store against a project URL with its service role key
    pub fn new(
        base_url: &str,
        service_key: SecretString,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, SettingsStoreError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SettingsStoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/rest/v1/{table}", base_url.trim_end_matches('/')),
            service_key,
        })
    }
}

#[async_trait]
impl SettingsStore for PostgrestSettingsStore {
    async fn load(&self) -> Result<Option<Settings>, SettingsStoreError> {
        let key = self.service_key.expose_secret();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("select", "*"), ("limit", "1")])
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| SettingsStoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SettingsStoreError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(SettingsStoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<Settings> =
            serde_json::from_str(&body).map_err(|e| SettingsStoreError::Decode(e.to_string()))?;
        debug!(rows = rows.len(), "Loaded settings snapshot");

        Ok(rows.into_iter().next())
    }
}

/// Fetch a snapshot, treating any store failure as "no settings"
pub async fn load_snapshot(store: &dyn SettingsStore) -> Option<Settings> {
    match store.load().await {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "Settings store failed, continuing without settings");
            None
        }
    }
}
