//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, feed service, reload trigger
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout log lines
//!     → optional Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
