//! Feed registry subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (FeedService: lock + read via ConfigStore)
//!     → registry.rs (list/add/remove/modify on the Document)
//!     → service.rs (write back, unlock, record pending change)
//! ```

pub mod error;
pub mod key;
pub mod registry;
pub mod service;
pub mod types;

pub use error::FeedError;
pub use key::derive_feed_key;
pub use registry::{add_feed, list_feeds, modify_feed, remove_feed};
pub use service::FeedService;
pub use types::{ChannelInfo, FeedListItem, FeedPatch, NestedMerge, NewFeed};
