//! Typed model of the podsync configuration file.
//!
//! # Design Decisions
//! - Only the sections this service edits are typed (`server`, `feeds`)
//! - Every other key is carried in a flattened table so a rewrite keeps
//!   sections such as `[storage]` or `[downloader]` intact
//! - Feed entries stay raw at document level. `FeedEntry` is the shape new
//!   feeds are written in; existing entries are read through `FeedView`, so
//!   a field with an unexpected type never hides the rest of the entry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerSection>,

    /// Feed key -> raw feed entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeds: Option<BTreeMap<String, toml::Value>>,

    /// Sections this service does not interpret.
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl Document {
    /// Parse a document from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render the document as TOML text.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Configured public hostname, if any.
    pub fn hostname(&self) -> Option<&str> {
        self.server
            .as_ref()
            .and_then(|s| s.hostname.as_deref())
            .filter(|h| !h.is_empty())
    }
}

/// The `[server]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(flatten)]
    pub extra: toml::Table,
}

/// A single `[feeds.<key>]` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FeedEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,

    /// Duration expression such as `1h` or `30m`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_period: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opml: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_feed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_dl_args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean: Option<CleanSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomSettings>,

    #[serde(flatten)]
    pub extra: toml::Table,
}

impl FeedEntry {
    /// Encode the entry into a raw table value.
    pub fn to_value(&self) -> Result<toml::Value, toml::ser::Error> {
        toml::Value::try_from(self)
    }
}

/// Read-only view of a stored `[feeds.<key>]` table.
///
/// Reads never fail on type: a field holding any scalar renders as text,
/// anything else reads as absent.
#[derive(Debug, Clone, Copy)]
pub struct FeedView<'a> {
    table: &'a toml::Table,
}

impl<'a> FeedView<'a> {
    /// `None` when the stored entry is not a table.
    pub fn new(value: &'a toml::Value) -> Option<Self> {
        value.as_table().map(|table| Self { table })
    }

    /// Custom title when it is a non-empty string.
    pub fn title(&self) -> Option<&'a str> {
        self.lookup(&["custom", "title"])
            .and_then(toml::Value::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Display text of the scalar at `path`, e.g. `["filters", "max_age"]`.
    pub fn text(&self, path: &[&str]) -> Option<String> {
        self.lookup(path).and_then(display_scalar)
    }

    fn lookup(&self, path: &[&str]) -> Option<&'a toml::Value> {
        let (last, parents) = path.split_last()?;
        let mut table = self.table;
        for key in parents {
            table = table.get(*key)?.as_table()?;
        }
        table.get(*last)
    }
}

/// Render a scalar the way it would read in the file, minus string quotes.
fn display_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Episode retention (`clean` table).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CleanSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_last: Option<i64>,

    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Episode filters (`filters` table).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FilterSettings {
    /// Maximum episode age in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,

    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Podcast metadata overrides (`custom` table).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CustomSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_art: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,

    #[serde(flatten)]
    pub extra: toml::Table,
}
