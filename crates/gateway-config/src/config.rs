//! Gateway configuration.
//!
//! Every section has defaults, so an empty file (or no file at all) yields a
//! working configuration pointed at the public provider endpoints.

use crate::error::{ConfigError, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use validator::{Validate, ValidationError};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener.
    #[validate(nested)]
    pub server: ServerConfig,

    /// Outbound provider calls.
    #[validate(nested)]
    pub upstream: UpstreamConfig,

    /// Settings row source.
    #[validate(nested)]
    pub settings: SettingsStoreConfig,

    /// Log output.
    #[validate(nested)]
    pub logging: LogConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    #[validate(length(min = 1))]
    pub host: String,

    /// Bind port.
    #[validate(range(min = 1))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                ConfigError::Validation(format!("invalid bind address {}:{}", self.host, self.port))
            })
    }
}

/// Outbound provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Total time allowed for one upstream call.
    #[serde(with = "humantime_serde")]
    #[validate(custom(function = "validate_timeout"))]
    pub timeout: Duration,

    /// OpenAI API base URL.
    #[validate(url)]
    pub openai_base_url: String,

    /// OpenRouter API base URL.
    #[validate(url)]
    pub openrouter_base_url: String,

    /// Hugging Face inference API base URL.
    #[validate(url)]
    pub huggingface_base_url: String,

    /// `HTTP-Referer` sent to OpenRouter.
    pub openrouter_referer: String,

    /// `X-Title` sent to OpenRouter.
    pub openrouter_title: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openrouter_base_url: "https://openrouter.ai/api/v1".to_string(),
            huggingface_base_url: "https://api-inference.huggingface.co".to_string(),
            openrouter_referer: "https://lovable.dev".to_string(),
            openrouter_title: "Multi-Mind Companion".to_string(),
        }
    }
}

/// Settings store configuration.
///
/// Without a URL the gateway runs with no settings row and relies on
/// request and environment keys only.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct SettingsStoreConfig {
    /// Project URL of the PostgREST backend.
    #[validate(url)]
    pub url: Option<String>,

    /// Service role key.
    pub service_key: Option<SecretString>,

    /// Table holding the settings row.
    #[validate(length(min = 1))]
    pub table: String,

    /// Total time allowed for one settings read.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SettingsStoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            table: "app_settings".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl SettingsStoreConfig {
    /// URL and key, when both are present.
    #[must_use]
    pub fn remote(&self) -> Option<(&str, &SecretString)> {
        match (self.url.as_deref(), self.service_key.as_ref()) {
            (Some(url), Some(key)) if !url.is_empty() => Some((url, key)),
            _ => None,
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct LogConfig {
    /// Default level, overridden by `RUST_LOG`.
    #[validate(custom(function = "validate_level"))]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn validate_level(level: &str) -> std::result::Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("log_level"))
    }
}

fn validate_timeout(timeout: &Duration) -> std::result::Result<(), ValidationError> {
    if timeout.is_zero() {
        Err(ValidationError::new("timeout_zero"))
    } else {
        Ok(())
    }
}

#[derive(Deserialize)]
struct HumanDuration(#[serde(with = "humantime_serde")] Duration);

fn parse_duration(name: &'static str, value: &str) -> Result<Duration> {
    serde_json::from_value::<HumanDuration>(serde_json::Value::String(value.to_string()))
        .map(|d| d.0)
        .map_err(|_| ConfigError::InvalidEnv {
            name,
            value: value.to_string(),
        })
}

impl GatewayConfig {
    /// Apply environment overrides.
    ///
    /// Recognised variables: `GATEWAY_HOST`, `GATEWAY_PORT`,
    /// `GATEWAY_LOG_LEVEL`, `GATEWAY_LOG_JSON`, `GATEWAY_UPSTREAM_TIMEOUT`
    /// (humantime, e.g. `45s`), `SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("GATEWAY_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "GATEWAY_PORT",
                value: port,
            })?;
        }
        if let Some(level) = lookup("GATEWAY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("GATEWAY_LOG_JSON") {
            self.logging.json = json.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "GATEWAY_LOG_JSON",
                value: json,
            })?;
        }
        if let Some(timeout) = lookup("GATEWAY_UPSTREAM_TIMEOUT") {
            self.upstream.timeout = parse_duration("GATEWAY_UPSTREAM_TIMEOUT", &timeout)?;
        }
        if let Some(url) = lookup("SUPABASE_URL") {
            self.settings.url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_SERVICE_ROLE_KEY") {
            self.settings.service_key = Some(SecretString::new(key));
        }
        Ok(())
    }

    /// Validate all sections.
    pub fn validate_all(&self) -> Result<()> {
        self.validate()?;
        if self.settings.url.is_some() && self.settings.service_key.is_none() {
            return Err(ConfigError::Validation(
                "settings.url is set but settings.service_key is missing".to_string(),
            ));
        }
        Ok(())
    }
}
