//! # Gateway Config
//!
//! Configuration for the companion gateway: typed sections with defaults,
//! YAML/TOML/JSON file loading, environment overrides and validation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;

pub use config::{GatewayConfig, LogConfig, ServerConfig, SettingsStoreConfig, UpstreamConfig};
pub use error::{ConfigError, Result};
pub use loader::{load_config, load_config_with_env, parse_config, ConfigFormat};
