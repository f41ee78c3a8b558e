//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Build the feed service and external collaborators from config
//! - Serve until the shutdown signal fires

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::changes::ChangeLog;
use crate::channel::{ChannelLookup, HttpChannelLookup, LookupError};
use crate::config::AppConfig;
use crate::feeds::FeedService;
use crate::http::handlers;
use crate::lifecycle::Shutdown;
use crate::reload::{CommandReloader, ServiceReloader};
use crate::store::ConfigStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub feeds: Arc<FeedService>,
    pub lookup: Arc<dyn ChannelLookup>,
    pub reloader: Arc<dyn ServiceReloader>,
}

impl AppState {
    /// Build the production state: podsync file store, HTTP channel
    /// lookup and `docker restart` reloader.
    pub fn from_config(config: &AppConfig) -> Result<Self, LookupError> {
        let store = ConfigStore::new(&config.podsync.config_path);
        let feeds = Arc::new(FeedService::new(store, Arc::new(ChangeLog::new())));

        Ok(Self {
            feeds,
            lookup: Arc::new(HttpChannelLookup::new(&config.lookup)?),
            reloader: Arc::new(CommandReloader::docker(&config.podsync)),
        })
    }
}

/// HTTP server for the feed editor.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, LookupError> {
        let state = AppState::from_config(&config)?;
        Ok(Self::with_state(config, state))
    }

    /// Create a server around an already assembled state.
    pub fn with_state(config: AppConfig, state: AppState) -> Self {
        let router = build_router(state, Duration::from_secs(config.timeouts.request_secs));
        Self { router, config }
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            podsync_config = %self.config.podsync.config_path,
            container = %self.config.podsync.container_name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/feeds", get(handlers::list_feeds))
        .route("/add", post(handlers::add_feed))
        .route("/modify", post(handlers::modify_feed))
        .route("/remove", post(handlers::remove_feed))
        .route("/changelog", get(handlers::changelog))
        .route("/reload", post(handlers::reload))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
