//! Feed service: registry operations bound to the config store.
//!
//! # Responsibilities
//! - Run each mutation as one locked read-modify-write cycle
//! - Record a pending change after every successful write
//!
//! # Design Decisions
//! - The change is recorded after the store lock is released; the
//!   changelog lock is never held across file I/O
//! - Failures are returned to the caller and nothing is retried

use std::sync::Arc;

use crate::changes::{ChangeLog, ChangeRecord};
use crate::feeds::error::FeedError;
use crate::feeds::registry;
use crate::feeds::types::{ChannelInfo, FeedListItem, FeedPatch, NewFeed};
use crate::observability::metrics;
use crate::store::ConfigStore;

/// Feed operations over one configuration file.
#[derive(Debug)]
pub struct FeedService {
    store: ConfigStore,
    changes: Arc<ChangeLog>,
}

impl FeedService {
    pub fn new(store: ConfigStore, changes: Arc<ChangeLog>) -> Self {
        Self { store, changes }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn changes(&self) -> &Arc<ChangeLog> {
        &self.changes
    }

    /// Current feeds, sorted by display name.
    pub fn list(&self) -> Result<Vec<FeedListItem>, FeedError> {
        let doc = self.store.read()?;
        Ok(registry::list_feeds(&doc))
    }

    /// Add (or replace) the feed for `channel`, returning its key.
    pub fn add(&self, channel: &ChannelInfo, opts: &NewFeed) -> Result<String, FeedError> {
        let result = self
            .store
            .update(|doc| registry::add_feed(doc, channel, opts));
        metrics::record_feed_operation("add", result.is_ok());

        let key = result?;
        tracing::info!(feed = %key, channel = %channel.title, "Feed added");
        self.changes.add_change(ChangeRecord::added(&key));
        Ok(key)
    }

    /// Remove the feed stored under `key`.
    pub fn remove(&self, key: &str) -> Result<(), FeedError> {
        let result = self.store.update(|doc| registry::remove_feed(doc, key));
        metrics::record_feed_operation("remove", result.is_ok());

        result?;
        tracing::info!(feed = %key, "Feed removed");
        self.changes.add_change(ChangeRecord::removed(key));
        Ok(())
    }

    /// Apply `patch` to the feed stored under `key`.
    pub fn modify(&self, key: &str, patch: &FeedPatch) -> Result<(), FeedError> {
        if patch.is_empty() {
            tracing::info!(feed = %key, "Modify request carries no fields; rewriting unchanged");
        }
        let result = self
            .store
            .update(|doc| registry::modify_feed(doc, key, patch));
        metrics::record_feed_operation("modify", result.is_ok());

        result?;
        tracing::info!(feed = %key, nested = ?patch.nested, "Feed modified");
        self.changes.add_change(ChangeRecord::modified(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn service(content: &str) -> (TempDir, FeedService) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        let svc = FeedService::new(ConfigStore::new(path), Arc::new(ChangeLog::new()));
        (dir, svc)
    }

    fn channel(title: &str) -> ChannelInfo {
        ChannelInfo {
            url: "https://www.youtube.com/channel/UCxyz".into(),
            title: title.into(),
            cover_art: None,
        }
    }

    #[test]
    fn test_mutations_record_changes() {
        let (_dir, svc) = service("[server]\nhostname = \"http://localhost:8080\"\n");

        let key = svc.add(&channel("Tech Talk"), &NewFeed::default()).unwrap();
        svc.modify(
            &key,
            &FeedPatch {
                format: Some("audio".into()),
                ..Default::default()
            },
        )
        .unwrap();
        svc.remove(&key).unwrap();

        assert_eq!(
            svc.changes().messages(),
            vec![
                "Added feed 'techtalk'".to_string(),
                "Modified feed 'techtalk'".to_string(),
                "Removed feed 'techtalk'".to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_remove_leaves_file_and_changelog_untouched() {
        let original = "[server]\nhostname = \"http://localhost\"\n";
        let (_dir, svc) = service(original);

        assert!(matches!(svc.remove("ghost"), Err(FeedError::NotFound(_))));
        assert_eq!(fs::read_to_string(svc.store().path()).unwrap(), original);
        assert!(svc.changes().is_empty());
    }

    #[test]
    fn test_add_persists_to_disk() {
        let (_dir, svc) = service("");
        svc.add(&channel("My Channel!"), &NewFeed::default()).unwrap();

        let content = fs::read_to_string(svc.store().path()).unwrap();
        assert!(content.contains("mychannel"));

        let items = svc.list().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "My Channel!");
        assert_eq!(items[0].key, "mychannel");
    }

    #[test]
    fn test_empty_modify_is_a_recorded_no_op() {
        let (_dir, svc) = service("[feeds.show]\nformat = \"audio\"\npage_size = \"ten\"\n");
        svc.modify("show", &FeedPatch::default()).unwrap();

        let items = svc.list().unwrap();
        assert_eq!(items[0].format, "audio");
        let content = fs::read_to_string(svc.store().path()).unwrap();
        assert!(content.contains("page_size = \"ten\""));
        assert_eq!(svc.changes().messages(), vec!["Modified feed 'show'".to_string()]);
    }
}
