//! Feed registry errors.

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by feed registry operations.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Reading or rewriting the config file failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No feed with this key (or no `feeds` table at all).
    #[error("feed '{0}' not found")]
    NotFound(String),

    /// Stored entry is not a feed table or has mistyped fields.
    #[error("feed '{key}' has an invalid format: {reason}")]
    InvalidShape { key: String, reason: String },

    /// Channel name yields an empty feed key.
    #[error("channel name '{0}' does not produce a usable feed key")]
    InvalidKey(String),
}
