//! Configuration schema definitions.
//!
//! Settings of the editor service itself, not the podsync file it edits.
//! All types derive Serde traits for deserialization from a TOML file.

use serde::{Deserialize, Serialize};

/// Root configuration for the editor service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The managed podsync installation.
    pub podsync: PodsyncConfig,

    /// Channel page lookups.
    pub lookup: LookupConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Location of the podsync config file and how to restart podsync.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PodsyncConfig {
    /// Path of the podsync `config.toml` being edited.
    pub config_path: String,

    /// Docker container restarted on reload.
    pub container_name: String,

    /// Upper bound for one restart, in seconds.
    pub reload_timeout_secs: u64,
}

impl Default for PodsyncConfig {
    fn default() -> Self {
        Self {
            config_path: "../config.toml".to_string(),
            container_name: "podsync".to_string(),
            reload_timeout_secs: 30,
        }
    }
}

/// Channel page fetch settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LookupConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with page fetches.
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("podconfig/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must exceed the reload timeout or reloads get cut off.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or full filter directive (e.g. "info", "podconfig=debug").
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
