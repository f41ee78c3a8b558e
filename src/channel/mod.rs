//! Channel metadata lookup.
//!
//! # Data Flow
//! ```text
//! source URL (channel page, handle or canonical)
//!     → lookup.rs (validate, fetch with reqwest)
//!     → parser.rs (canonical link, channelId, og:title, og:image)
//!     → ChannelInfo
//! ```

pub mod error;
pub mod lookup;
pub mod parser;

pub use error::LookupError;
pub use lookup::{ChannelLookup, HttpChannelLookup};
pub use parser::parse_channel_page;
