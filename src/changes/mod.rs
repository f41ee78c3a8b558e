//! Pending-change tracker.
//!
//! Records edits made to the feed configuration since the dependent podsync
//! service was last reloaded.
//!
//! # Design Decisions
//! - Append-only until cleared; no deduplication and no size bound
//! - Own lock, held only for the append/snapshot/clear itself and never
//!   across file I/O
//! - Snapshots are copies; later appends do not show up in them

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::observability::metrics;

/// What kind of edit a change record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    /// Free-text note; the record's `key` holds the text.
    Note,
}

/// One pending change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub key: String,
    /// Seconds since the Unix epoch.
    pub at: u64,
}

impl ChangeRecord {
    pub fn new(kind: ChangeKind, key: impl Into<String>) -> Self {
        let at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            kind,
            key: key.into(),
            at,
        }
    }

    pub fn added(key: impl Into<String>) -> Self {
        Self::new(ChangeKind::Added, key)
    }

    pub fn modified(key: impl Into<String>) -> Self {
        Self::new(ChangeKind::Modified, key)
    }

    pub fn removed(key: impl Into<String>) -> Self {
        Self::new(ChangeKind::Removed, key)
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self::new(ChangeKind::Note, text)
    }

    /// Human-readable description.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChangeKind::Added => write!(f, "Added feed '{}'", self.key),
            ChangeKind::Modified => write!(f, "Modified feed '{}'", self.key),
            ChangeKind::Removed => write!(f, "Removed feed '{}'", self.key),
            ChangeKind::Note => f.write_str(&self.key),
        }
    }
}

/// Thread-safe, ordered list of pending changes.
#[derive(Debug, Default)]
pub struct ChangeLog {
    pending: Mutex<Vec<ChangeRecord>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<ChangeRecord>> {
        // Every critical section is a single Vec call; a panic inside one
        // cannot leave the list half-updated.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a change.
    pub fn add_change(&self, record: ChangeRecord) {
        let len = {
            let mut pending = self.entries();
            pending.push(record);
            pending.len()
        };
        metrics::record_pending_changes(len);
    }

    /// Append a free-text note.
    pub fn note(&self, text: impl Into<String>) {
        self.add_change(ChangeRecord::note(text));
    }

    /// Point-in-time copy of all pending changes, oldest first.
    pub fn get_changes(&self) -> Vec<ChangeRecord> {
        self.entries().clone()
    }

    /// Messages of all pending changes, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.entries().iter().map(ChangeRecord::message).collect()
    }

    /// Drop all pending changes. Call only after a successful reload.
    pub fn clear_changes(&self) {
        self.entries().clear();
        metrics::record_pending_changes(0);
    }

    /// Drop the `n` oldest changes, keeping anything appended after them.
    pub fn clear_first(&self, n: usize) {
        let len = {
            let mut pending = self.entries();
            let n = n.min(pending.len());
            pending.drain(..n);
            pending.len()
        };
        metrics::record_pending_changes(len);
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
