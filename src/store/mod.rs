//! Config store subsystem.
//!
//! # Data Flow
//! ```text
//! podsync config.toml
//!     → accessor.rs (lock, read whole file)
//!     → document.rs (typed Document)
//!     → caller mutates Document
//!     → document.rs (render TOML)
//!     → accessor.rs (replace whole file, unlock)
//! ```

pub mod accessor;
pub mod document;
pub mod error;

pub use accessor::ConfigStore;
pub use document::{
    CleanSettings, CustomSettings, Document, FeedEntry, FeedView, FilterSettings,
    ServerSection,
};
pub use error::StoreError;
