//! # Companion Gateway
//!
//! LLM request gateway and title generator for the companion chat front end.
//!
//! ## Usage
//!
//! ```bash
//! # Start with default configuration
//! companion-gateway
//!
//! # Start with a config file
//! companion-gateway --config /path/to/config.yaml
//!
//! # Start with environment overrides
//! GATEWAY_PORT=9000 OPENROUTER_API_KEY=sk-or-... companion-gateway
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use gateway_config::{load_config, GatewayConfig};
use gateway_core::{ProviderKind, SettingsStore, StaticSettingsStore};
use gateway_providers::{
    credentials::presence, CompletionGateway, EnvCredentials, PostgrestSettingsStore,
    ProviderRegistry, RegistryConfig, UpstreamClient,
};
use gateway_server::{AppState, Server};
use gateway_telemetry::{init_logging, LoggingConfig, Metrics};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Companion gateway server
#[derive(Parser, Debug)]
#[command(name = "companion-gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (yaml, toml or json)
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Bind host, overrides config and environment
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides config and environment
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level, overrides config and environment
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn apply(&self, config: &mut GatewayConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())
        .await
        .context("failed to load configuration")?;
    args.apply(&mut config);
    config.validate_all().context("invalid configuration")?;

    init_logging(&LoggingConfig::new(&config.logging.level).with_json(config.logging.json))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        upstream_timeout_ms = config.upstream.timeout.as_millis(),
        "Starting companion gateway"
    );

    let state = build_state(&config)?;
    Server::new(config.server.clone(), state).run().await?;

    Ok(())
}

/// Wire the shared collaborators together
fn build_state(config: &GatewayConfig) -> Result<AppState> {
    let upstream = &config.upstream;
    let registry = ProviderRegistry::from_config(&RegistryConfig {
        openai_base_url: upstream.openai_base_url.clone(),
        openrouter_base_url: upstream.openrouter_base_url.clone(),
        huggingface_base_url: upstream.huggingface_base_url.clone(),
        openrouter_referer: upstream.openrouter_referer.clone(),
        openrouter_title: upstream.openrouter_title.clone(),
    });

    let env = EnvCredentials::from_env();
    for kind in ProviderKind::ALL {
        info!(provider = %kind, key = presence(env.get(kind)), "Environment credential");
    }

    let settings: Arc<dyn SettingsStore> = match config.settings.remote() {
        Some((url, key)) => {
            info!(url, table = %config.settings.table, "Using PostgREST settings store");
            Arc::new(PostgrestSettingsStore::new(
                url,
                key.clone(),
                &config.settings.table,
                config.settings.timeout,
            )?)
        }
        None => {
            warn!("No settings store configured, keys come from requests and environment only");
            Arc::new(StaticSettingsStore::empty())
        }
    };

    let gateway = CompletionGateway::new(
        Arc::new(registry),
        UpstreamClient::new(upstream.timeout)?,
        Arc::new(env),
        settings,
    );

    Ok(AppState::new(Arc::new(gateway), Metrics::new()?))
}
