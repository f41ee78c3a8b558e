//! Exclusive access to the on-disk configuration file.
//!
//! # Responsibilities
//! - Read and parse the whole file on every operation (no caching)
//! - Serialize and replace the whole file
//! - Serialize read-modify-write cycles behind one lock
//!
//! # Design Decisions
//! - The lock covers the full cycle, not the individual read or write, so
//!   two concurrent mutations never start from the same snapshot
//! - The replacement is fully rendered before the file is touched; a
//!   failed mutation or serialization leaves the file as it was
//! - Writes go to a sibling temp file that is renamed over the target

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::NamedTempFile;

use crate::store::document::Document;
use crate::store::error::StoreError;

/// Owner of the configuration file and of its mutual-exclusion discipline.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConfigStore {
    /// Create a store for the file at `path`. The file is not touched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the managed file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the current file contents.
    pub fn read(&self) -> Result<Document, StoreError> {
        let _guard = self.acquire();
        self.read_unlocked()
    }

    /// Replace the file with `doc`.
    pub fn write(&self, doc: &Document) -> Result<(), StoreError> {
        let _guard = self.acquire();
        self.write_unlocked(doc)
    }

    /// Run a read-modify-write cycle under the store lock.
    ///
    /// `mutate` receives the freshly read document. If it returns an error
    /// nothing is written and the error is passed through.
    pub fn update<T, E, F>(&self, mutate: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.acquire();
        let mut doc = self.read_unlocked()?;
        let out = mutate(&mut doc)?;
        self.write_unlocked(&doc)?;
        Ok(out)
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_unlocked(&self) -> Result<Document, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Document::from_toml(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_unlocked(&self, doc: &Document) -> Result<(), StoreError> {
        let rendered = doc.to_toml()?;

        match self.replace_atomically(rendered.as_bytes()) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Bind-mounted files cannot be renamed over; fall back to an
                // in-place overwrite of the already rendered content.
                tracing::warn!(
                    path = ?self.path,
                    error = %e,
                    "Atomic replace failed, overwriting in place"
                );
                fs::write(&self.path, rendered.as_bytes()).map_err(|e| StoreError::io(&self.path, e))
            }
        }
    }

    fn replace_atomically(&self, bytes: &[u8]) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;

        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }

        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
