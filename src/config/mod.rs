//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI flags / environment overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the service runs with no settings file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, ListenerConfig, LookupConfig, ObservabilityConfig, PodsyncConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
