//! podconfig: web editor for a podsync feed configuration.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request         ┌───────────────────────────────────────────────┐
//!     ───────────────────────┼─▶ http (axum router + handlers)               │
//!                            │       │                 │            │        │
//!                            │       ▼                 ▼            ▼        │
//!                            │   feeds::FeedService  channel      reload     │
//!                            │       │   │            lookup     (docker     │
//!                            │       │   └─▶ changes  (reqwest)   restart)   │
//!                            │       ▼                                       │
//!                            │   store::ConfigStore ──▶ podsync config.toml  │
//!                            └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use podconfig::config::{load_config, validate_config, AppConfig, ConfigError};
use podconfig::http::HttpServer;
use podconfig::lifecycle::{spawn_signal_listener, Shutdown};
use podconfig::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "podconfig")]
#[command(about = "Web editor for podsync feed configuration", long_about = None)]
struct Cli {
    /// Optional settings file for the editor itself (TOML).
    #[arg(short, long, env = "PODCONFIG_SETTINGS")]
    config: Option<PathBuf>,

    /// Path of the podsync config.toml to edit.
    #[arg(long, env = "PODSYNC_CONFIG_PATH")]
    podsync_config: Option<String>,

    /// Docker container restarted on reload.
    #[arg(long, env = "DOCKER_CONTAINER_NAME")]
    container: Option<String>,

    /// Port to listen on (all interfaces).
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Full bind address; wins over --port.
    #[arg(long, env = "BIND_ADDRESS")]
    bind: Option<String>,

    /// Log level or filter directive.
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };

        if let Some(path) = self.podsync_config {
            config.podsync.config_path = path;
        }
        if let Some(name) = self.container {
            config.podsync.container_name = name;
        }
        if let Some(port) = self.port {
            config.listener.bind_address = format!("0.0.0.0:{}", port);
        }
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("podconfig v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        podsync_config = %config.podsync.config_path,
        container = %config.podsync.container_name,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
