//! Extraction of channel metadata from a fetched channel page.
//!
//! Only the `<link>` and `<meta>` tags of the page are inspected.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::channel::error::LookupError;
use crate::feeds::ChannelInfo;

const CHANNEL_URL_PREFIX: &str = "https://www.youtube.com/channel/";
const UNKNOWN_CHANNEL: &str = "Unknown Channel";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(link|meta)\b([^>]*)>").expect("valid tag regex"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute regex")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([A-Za-z]+));").expect("valid entity regex")
});

struct Tag {
    name: String,
    attrs: HashMap<String, String>,
}

impl Tag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn attr_is(&self, name: &str, value: &str) -> bool {
        self.attr(name).is_some_and(|v| v.eq_ignore_ascii_case(value))
    }
}

fn scan_tags(html: &str) -> Vec<Tag> {
    TAG_RE
        .captures_iter(html)
        .map(|cap| {
            let attrs = ATTR_RE
                .captures_iter(&cap[2])
                .map(|a| {
                    let value = a
                        .get(2)
                        .or_else(|| a.get(3))
                        .or_else(|| a.get(4))
                        .map(|m| decode_entities(m.as_str()))
                        .unwrap_or_default();
                    (a[1].to_ascii_lowercase(), value)
                })
                .collect();
            Tag {
                name: cap[1].to_ascii_lowercase(),
                attrs,
            }
        })
        .collect()
}

fn find_attr<'a>(tags: &'a [Tag], tag: &str, key: &str, value: &str, wanted: &str) -> Option<&'a str> {
    tags.iter()
        .filter(|t| t.name == tag && t.attr_is(key, value))
        .find_map(|t| t.attr(wanted).filter(|v| !v.is_empty()))
}

/// Parse channel metadata out of a channel page.
///
/// The canonical link is required. When it is not a `/channel/` URL the
/// page must carry a `channelId` meta tag, which is used to build one.
pub fn parse_channel_page(html: &str) -> Result<ChannelInfo, LookupError> {
    let tags = scan_tags(html);

    let canonical = find_attr(&tags, "link", "rel", "canonical", "href")
        .ok_or(LookupError::MissingCanonical)?;

    let url = if canonical.contains("/channel/") {
        canonical.to_string()
    } else {
        let id = find_attr(&tags, "meta", "itemprop", "channelId", "content")
            .ok_or(LookupError::MissingChannelId)?;
        format!("{CHANNEL_URL_PREFIX}{id}")
    };

    let title = find_attr(&tags, "meta", "property", "og:title", "content")
        .unwrap_or(UNKNOWN_CHANNEL)
        .to_string();
    let cover_art = find_attr(&tags, "meta", "property", "og:image", "content").map(str::to_string);

    Ok(ChannelInfo {
        url,
        title,
        cover_art,
    })
}

/// Decode character references in one pass. Unknown names and code points
/// that are not valid `char`s are left as written.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    ENTITY_RE
        .replace_all(raw, |cap: &Captures<'_>| {
            let decoded = if let Some(dec) = cap.get(1) {
                dec.as_str().parse().ok().and_then(char::from_u32)
            } else if let Some(hex) = cap.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                match &cap[3] {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::derive_feed_key;

    #[test]
    fn test_canonical_channel_url() {
        let html = r#"<html><head>
            <link rel="canonical" href="https://www.youtube.com/channel/UC42">
            <meta property="og:title" content="Rock &amp; Roll Hour">
            <meta property="og:image" content="https://yt3.example/pic.jpg">
        </head></html>"#;
        let info = parse_channel_page(html).unwrap();
        assert_eq!(info.url, "https://www.youtube.com/channel/UC42");
        assert_eq!(info.title, "Rock & Roll Hour");
        assert_eq!(info.cover_art.as_deref(), Some("https://yt3.example/pic.jpg"));
    }

    #[test]
    fn test_handle_url_uses_channel_id() {
        let html = r#"<LINK href='https://www.youtube.com/@someone' REL='canonical'/>
            <meta itemprop="channelId" content="UCabc">"#;
        let info = parse_channel_page(html).unwrap();
        assert_eq!(info.url, "https://www.youtube.com/channel/UCabc");
        assert_eq!(info.title, "Unknown Channel");
        assert_eq!(info.cover_art, None);
    }

    #[test]
    fn test_missing_markers() {
        assert!(matches!(
            parse_channel_page("<html><head></head></html>"),
            Err(LookupError::MissingCanonical)
        ));
        assert!(matches!(
            parse_channel_page(r#"<link rel="canonical" href="https://www.youtube.com/@x">"#),
            Err(LookupError::MissingChannelId)
        ));
        assert!(matches!(
            parse_channel_page(r#"<link rel="canonical" href="">"#),
            Err(LookupError::MissingCanonical)
        ));
    }

    #[test]
    fn test_numeric_entities_in_title() {
        let html = r#"<link rel="canonical" href="https://www.youtube.com/channel/UC7">
            <meta property="og:title" content="Tom&#8217;s Show">"#;
        let info = parse_channel_page(html).unwrap();
        assert_eq!(info.title, "Tom\u{2019}s Show");
        assert_eq!(derive_feed_key(&info.title), "tomsshow");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Tom&#x2019;s"), "Tom\u{2019}s");
        assert_eq!(decode_entities("a&#39;b&apos;c"), "a'b'c");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&copy; &#xD800; &#99999999;"), "&copy; &#xD800; &#99999999;");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
    }
}
