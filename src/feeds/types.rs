//! Inputs and outputs of the feed registry.

use serde::{Deserialize, Serialize};

use crate::store::{CleanSettings, CustomSettings, FeedEntry, FilterSettings};

pub const DEFAULT_UPDATE_PERIOD: &str = "1h";
pub const DEFAULT_FORMAT: &str = "video";
pub const DEFAULT_KEEP_LAST: i64 = 20;
pub const DEFAULT_MAX_AGE: i64 = 90;
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const DEFAULT_QUALITY: &str = "high";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_YOUTUBE_DL_ARGS: [&str; 3] =
    ["--add-metadata", "--embed-thumbnail", "--write-description"];

/// One row of the feed listing. Every field is a display string; fields
/// missing from the stored entry are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedListItem {
    pub key: String,
    pub name: String,
    pub url: String,
    pub xml_url: String,
    pub update_period: String,
    pub format: String,
    pub max_age: String,
    pub clean_keep_last: String,
}

/// Channel metadata resolved from a source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Canonical channel URL stored as the feed `url`.
    pub url: String,
    /// Display title, also the source of the feed key.
    pub title: String,
    pub cover_art: Option<String>,
}

/// Tunables for a new feed; `None` selects the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeed {
    pub update_period: Option<String>,
    pub format: Option<String>,
    pub keep_last: Option<i64>,
    pub max_age: Option<i64>,
}

impl NewFeed {
    /// Build the complete entry written for `channel`.
    pub fn build_entry(&self, channel: &ChannelInfo) -> FeedEntry {
        let name = &channel.title;
        FeedEntry {
            url: Some(channel.url.clone()),
            page_size: Some(DEFAULT_PAGE_SIZE),
            update_period: Some(
                self.update_period
                    .clone()
                    .unwrap_or_else(|| DEFAULT_UPDATE_PERIOD.to_string()),
            ),
            quality: Some(DEFAULT_QUALITY.to_string()),
            format: Some(
                self.format
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
            ),
            opml: Some(true),
            private_feed: Some(false),
            youtube_dl_args: Some(DEFAULT_YOUTUBE_DL_ARGS.iter().map(|a| a.to_string()).collect()),
            clean: Some(CleanSettings {
                keep_last: Some(self.keep_last.unwrap_or(DEFAULT_KEEP_LAST)),
                ..Default::default()
            }),
            filters: Some(FilterSettings {
                max_age: Some(self.max_age.unwrap_or(DEFAULT_MAX_AGE)),
                ..Default::default()
            }),
            custom: Some(CustomSettings {
                title: Some(name.clone()),
                description: Some(format!(
                    "Episodes from the '{}' Youtube channel in a podcast format.",
                    name
                )),
                author: Some(name.clone()),
                cover_art: Some(channel.cover_art.clone().unwrap_or_default()),
                lang: Some(DEFAULT_LANG.to_string()),
                explicit: Some(false),
                ..Default::default()
            }),
            extra: toml::Table::new(),
        }
    }
}

/// How nested tables (`clean`, `filters`) are updated by a patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedMerge {
    /// Set only the supplied key inside the existing table.
    #[default]
    Deep,
    /// Replace the whole table with one holding only the supplied key.
    Replace,
}

/// Partial update for an existing feed. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPatch {
    pub update_period: Option<String>,
    pub format: Option<String>,
    pub quality: Option<String>,
    pub page_size: Option<i64>,
    /// `clean.keep_last`
    pub keep_last: Option<i64>,
    /// `filters.max_age`
    pub max_age: Option<i64>,
    #[serde(default)]
    pub nested: NestedMerge,
}

impl FeedPatch {
    pub fn is_empty(&self) -> bool {
        self.update_period.is_none()
            && self.format.is_none()
            && self.quality.is_none()
            && self.page_size.is_none()
            && self.keep_last.is_none()
            && self.max_age.is_none()
    }

    /// Apply the patch to a stored feed table according to `self.nested`.
    ///
    /// Only the supplied keys are written; every other key keeps its stored
    /// value and type.
    pub fn apply(&self, entry: &mut toml::Table) {
        use toml::Value;

        for (key, value) in [
            ("update_period", &self.update_period),
            ("format", &self.format),
            ("quality", &self.quality),
        ] {
            if let Some(v) = value {
                entry.insert(key.to_string(), Value::String(v.clone()));
            }
        }
        if let Some(v) = self.page_size {
            entry.insert("page_size".to_string(), Value::Integer(v));
        }

        if let Some(v) = self.keep_last {
            self.merge_nested(entry, "clean", "keep_last", v);
        }
        if let Some(v) = self.max_age {
            self.merge_nested(entry, "filters", "max_age", v);
        }
    }

    /// Write `key` into the sub-table `name`. A stored value that is not a
    /// table is replaced.
    fn merge_nested(&self, entry: &mut toml::Table, name: &str, key: &str, value: i64) {
        let mut table = match (self.nested, entry.remove(name)) {
            (NestedMerge::Deep, Some(toml::Value::Table(existing))) => existing,
            _ => toml::Table::new(),
        };
        table.insert(key.to_string(), toml::Value::Integer(value));
        entry.insert(name.to_string(), toml::Value::Table(table));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> ChannelInfo {
        ChannelInfo {
            url: "https://www.youtube.com/channel/UC1".into(),
            title: "Some Show".into(),
            cover_art: None,
        }
    }

    #[test]
    fn test_build_entry_defaults() {
        let entry = NewFeed::default().build_entry(&channel());
        assert_eq!(entry.update_period.as_deref(), Some("1h"));
        assert_eq!(entry.format.as_deref(), Some("video"));
        assert_eq!(entry.page_size, Some(50));
        assert_eq!(entry.quality.as_deref(), Some("high"));
        assert_eq!(entry.opml, Some(true));
        assert_eq!(entry.private_feed, Some(false));
        assert_eq!(entry.clean.unwrap().keep_last, Some(20));
        assert_eq!(entry.filters.unwrap().max_age, Some(90));

        let custom = entry.custom.unwrap();
        assert_eq!(custom.title.as_deref(), Some("Some Show"));
        assert_eq!(custom.author.as_deref(), Some("Some Show"));
        assert_eq!(
            custom.description.as_deref(),
            Some("Episodes from the 'Some Show' Youtube channel in a podcast format.")
        );
        assert_eq!(custom.cover_art.as_deref(), Some(""));
        assert_eq!(custom.lang.as_deref(), Some("en"));
        assert_eq!(custom.explicit, Some(false));
    }

    #[test]
    fn test_build_entry_overrides() {
        let opts = NewFeed {
            update_period: Some("6h".into()),
            format: Some("audio".into()),
            keep_last: Some(5),
            max_age: Some(30),
        };
        let entry = opts.build_entry(&channel());
        assert_eq!(entry.update_period.as_deref(), Some("6h"));
        assert_eq!(entry.format.as_deref(), Some("audio"));
        assert_eq!(entry.clean.unwrap().keep_last, Some(5));
        assert_eq!(entry.filters.unwrap().max_age, Some(30));
    }

    fn stored(text: &str) -> toml::Table {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_deep_patch_keeps_nested_siblings() {
        let mut entry = stored("[filters]\nmax_age = 90\ntitle = \"ep\"\n");
        let patch = FeedPatch {
            max_age: Some(7),
            ..Default::default()
        };
        patch.apply(&mut entry);

        let filters = entry["filters"].as_table().unwrap();
        assert_eq!(filters["max_age"].as_integer(), Some(7));
        assert_eq!(filters["title"].as_str(), Some("ep"));
    }

    #[test]
    fn test_replace_patch_drops_nested_siblings() {
        let mut entry = stored("[filters]\nmax_age = 90\ntitle = \"ep\"\n");
        let patch = FeedPatch {
            max_age: Some(7),
            nested: NestedMerge::Replace,
            ..Default::default()
        };
        patch.apply(&mut entry);

        let filters = entry["filters"].as_table().unwrap();
        assert_eq!(filters["max_age"].as_integer(), Some(7));
        assert!(!filters.contains_key("title"));
    }

    #[test]
    fn test_patch_leaves_unrelated_keys_untouched() {
        let mut entry = stored(
            "url = \"u\"\npage_size = \"fifty\"\ncron_schedule = \"@every 1h\"\n[clean]\nkeep_last = \"all\"\n",
        );
        let patch = FeedPatch {
            update_period: Some("2h".into()),
            ..Default::default()
        };
        patch.apply(&mut entry);

        assert_eq!(entry["update_period"].as_str(), Some("2h"));
        assert_eq!(entry["page_size"].as_str(), Some("fifty"));
        assert_eq!(entry["cron_schedule"].as_str(), Some("@every 1h"));
        assert_eq!(entry["clean"]["keep_last"].as_str(), Some("all"));
    }

    #[test]
    fn test_deep_patch_replaces_non_table_nested_value() {
        let mut entry = stored("clean = 3\n");
        let patch = FeedPatch {
            keep_last: Some(4),
            ..Default::default()
        };
        patch.apply(&mut entry);
        assert_eq!(entry["clean"]["keep_last"].as_integer(), Some(4));
    }

    #[test]
    fn test_empty_patch() {
        assert!(FeedPatch::default().is_empty());
        assert!(!FeedPatch {
            page_size: Some(10),
            ..Default::default()
        }
        .is_empty());
    }
}
