//! Feed registry operations on an in-memory document.
//!
//! # Responsibilities
//! - List feeds with display values for the presentation layer
//! - Add, remove and patch `[feeds.<key>]` entries
//!
//! # Design Decisions
//! - Pure functions over `Document`; locking and persistence belong to the
//!   caller (see `FeedService`)
//! - Adding a feed whose key already exists replaces it
//! - Listing is lenient per field: a missing field, or one that is not a
//!   scalar, renders as an empty string. Only entries that are not tables
//!   are skipped
//! - Modify needs the entry to be a table and writes just the patched keys

use std::collections::BTreeMap;

use crate::feeds::error::FeedError;
use crate::feeds::key::derive_feed_key;
use crate::feeds::types::{ChannelInfo, FeedListItem, FeedPatch, NewFeed};
use crate::store::{Document, FeedView, StoreError};

/// List all feeds sorted by display name (byte-wise, case-sensitive).
pub fn list_feeds(doc: &Document) -> Vec<FeedListItem> {
    let Some(feeds) = &doc.feeds else {
        return Vec::new();
    };
    let base = doc.hostname().map(|h| h.trim_end_matches('/'));

    let mut items: Vec<FeedListItem> = feeds
        .iter()
        .filter_map(|(key, raw)| match FeedView::new(raw) {
            Some(view) => Some(list_item(key, view, base)),
            None => {
                tracing::warn!(feed = %key, "Skipping feed entry that is not a table");
                None
            }
        })
        .collect();

    items.sort_by(|a, b| a.name.cmp(&b.name));
    items
}

fn list_item(key: &str, view: FeedView<'_>, base: Option<&str>) -> FeedListItem {
    let text = |path: &[&str]| view.text(path).unwrap_or_default();
    FeedListItem {
        key: key.to_string(),
        name: view.title().unwrap_or(key).to_string(),
        url: text(&["url"]),
        xml_url: base
            .map(|b| format!("{}/{}.xml", b, key))
            .unwrap_or_default(),
        update_period: text(&["update_period"]),
        format: text(&["format"]),
        max_age: text(&["filters", "max_age"]),
        clean_keep_last: text(&["clean", "keep_last"]),
    }
}

/// Insert a feed for `channel`, returning its key. An existing feed with
/// the same key is replaced.
pub fn add_feed(doc: &mut Document, channel: &ChannelInfo, opts: &NewFeed) -> Result<String, FeedError> {
    let key = derive_feed_key(&channel.title);
    if key.is_empty() {
        return Err(FeedError::InvalidKey(channel.title.clone()));
    }

    let value = opts
        .build_entry(channel)
        .to_value()
        .map_err(StoreError::from)?;

    let feeds = doc.feeds.get_or_insert_with(BTreeMap::new);
    if feeds.insert(key.clone(), value).is_some() {
        tracing::info!(feed = %key, "Replacing existing feed with the same key");
    }
    Ok(key)
}

/// Delete the feed stored under `key`.
pub fn remove_feed(doc: &mut Document, key: &str) -> Result<(), FeedError> {
    doc.feeds
        .as_mut()
        .and_then(|feeds| feeds.remove(key))
        .map(|_| ())
        .ok_or_else(|| FeedError::NotFound(key.to_string()))
}

/// Apply `patch` to the feed stored under `key`.
pub fn modify_feed(doc: &mut Document, key: &str, patch: &FeedPatch) -> Result<(), FeedError> {
    let raw = doc
        .feeds
        .as_mut()
        .and_then(|feeds| feeds.get_mut(key))
        .ok_or_else(|| FeedError::NotFound(key.to_string()))?;

    let found = raw.type_str();
    let entry = raw.as_table_mut().ok_or_else(|| FeedError::InvalidShape {
        key: key.to_string(),
        reason: format!("expected a table, found {}", found),
    })?;

    patch.apply(entry);
    Ok(())
}
