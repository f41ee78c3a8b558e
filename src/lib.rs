//! podconfig library: feed configuration store, registry operations and
//! pending-change tracking for a podsync installation, plus the HTTP API
//! that exposes them.

pub mod changes;
pub mod channel;
pub mod config;
pub mod feeds;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod reload;
pub mod store;

pub use changes::{ChangeLog, ChangeRecord};
pub use config::AppConfig;
pub use feeds::FeedService;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::ConfigStore;
