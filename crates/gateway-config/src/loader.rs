//! Configuration file loading.

use crate::config::GatewayConfig;
use crate::error::{ConfigError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// TOML (`.toml`)
    Toml,
    /// JSON (`.json`)
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

/// Parse configuration content without applying overrides or validation.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<GatewayConfig> {
    if content.trim().is_empty() {
        return Ok(GatewayConfig::default());
    }

    match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::parse(format.name(), e))
        }
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::parse(format.name(), e)),
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::parse(format.name(), e))
        }
    }
}

/// Load configuration from an optional file, then the process environment.
///
/// Order: defaults, file, environment overrides, validation.
pub async fn load_config(path: Option<&Path>) -> Result<GatewayConfig> {
    load_config_with_env(path, |name| std::env::var(name).ok()).await
}

/// Load configuration using an explicit environment lookup.
pub async fn load_config_with_env(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<GatewayConfig> {
    let mut config = match path {
        Some(path) => {
            let format = ConfigFormat::from_path(path)?;
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!(path = %path.display(), format = format.name(), "Loading configuration file");
            parse_config(&content, format)?
        }
        None => {
            debug!("No configuration file given, using defaults");
            GatewayConfig::default()
        }
    };

    config.apply_env_overrides(lookup)?;
    config.validate_all()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("config")).is_err());
    }

    #[tokio::test]
    async fn test_load_yaml() {
        let file = write_config(
            ".yaml",
            r#"
server:
  port: 9090
upstream:
  timeout: 12s
  openrouter_title: "Companion Dev"
settings:
  url: "https://project.supabase.co"
  service_key: "service-role"
logging:
  level: debug
  json: true
"#,
        );

        let config = load_config_with_env(Some(file.path()), no_env).await.unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.upstream.timeout, Duration::from_secs(12));
        assert_eq!(config.upstream.openrouter_title, "Companion Dev");
        assert_eq!(config.upstream.openrouter_referer, "https://lovable.dev");
        assert!(config.settings.remote().is_some());
        assert!(config.logging.json);
    }

    #[tokio::test]
    async fn test_load_toml_with_env_override() {
        let file = write_config(
            ".toml",
            r#"
[server]
host = "127.0.0.1"
port = 8081

[upstream]
timeout = "1m"
"#,
        );

        let config = load_config_with_env(Some(file.path()), |name| {
            (name == "GATEWAY_PORT").then(|| "7000".to_string())
        })
        .await
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.upstream.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_empty_file_uses_defaults() {
        let file = write_config(".yml", "");
        let config = load_config_with_env(Some(file.path()), no_env).await.unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn test_invalid_content() {
        let file = write_config(".yaml", "server: [not, a, map]");
        let err = load_config_with_env(Some(file.path()), no_env).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "yaml", .. }));

        let file = write_config(".yaml", "logging:\n  level: shouting\n");
        let err = load_config_with_env(Some(file.path()), no_env).await.unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_config_with_env(Some(Path::new("/nonexistent/gateway.yaml")), no_env)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[tokio::test]
    async fn test_no_file() {
        let config = load_config_with_env(None, no_env).await.unwrap();
        assert_eq!(config.upstream.timeout, Duration::from_secs(30));
    }
}
