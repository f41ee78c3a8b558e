//! Errors raised while reading or rewriting the feed configuration file.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the config store accessor.
///
/// A failed operation never leaves a partially written file behind: the
/// replacement is serialized in full before the on-disk file is touched.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File could not be read, written or renamed into place.
    #[error("config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid configuration document.
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// In-memory document could not be rendered back to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
