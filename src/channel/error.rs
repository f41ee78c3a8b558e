//! Channel lookup errors.

use thiserror::Error;

/// Errors that can occur while resolving a channel.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Source is not an absolute http(s) URL.
    #[error("invalid source URL '{0}'")]
    InvalidUrl(String),

    /// Request could not be sent or the body not read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Page answered with something other than 200.
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("canonical link not found")]
    MissingCanonical,

    #[error("channel id not found")]
    MissingChannelId,
}
