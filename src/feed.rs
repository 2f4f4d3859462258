//! Release feed parsing.
//!
//! The published feed is an Atom document with one `entry` element per
//! build/platform combination. The document is parsed once into a list of
//! entry records, and the records are then filtered for the platform marker;
//! the first match in document order wins. The marker is a URL path fragment
//! and normally appears in an entry's link rather than its title text.

use crate::error::{Result, WatchError};
use scraper::{Html, Selector};

/// One release announcement selected from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    /// Entry title, trimmed of surrounding whitespace.
    pub title: String,
    /// Download page URL from the entry's first link.
    pub download_url: String,
}

/// Per-entry record collected during the single parse pass.
struct EntryRecord {
    title: Option<String>,
    link: Option<String>,
    text: String,
}

impl EntryRecord {
    fn contains_marker(&self, marker: &str) -> bool {
        self.link.as_deref().is_some_and(|link| link.contains(marker))
            || self.title.as_deref().is_some_and(|title| title.contains(marker))
            || self.text.contains(marker)
    }
}

/// Selects the release entry for the given platform marker.
///
/// Each `entry` element becomes a record holding its first `title` text
/// (trimmed), its first `link` href, and its accumulated text content. The
/// first record whose link, title, or text contains the marker is returned.
///
/// # Errors
///
/// Returns [`WatchError::FeedFormat`] when no entry contains the marker, or
/// when the matching entry has no title element or no link href. There is no
/// fallback platform and no partial extraction.
pub fn select_release(document: &str, platform_marker: &str) -> Result<ReleaseEntry> {
    let document = Html::parse_document(document);
    let entry_selector = Selector::parse("entry")
        .map_err(|e| WatchError::FeedFormat(format!("invalid entry selector: {e:?}")))?;
    let title_selector = Selector::parse("title")
        .map_err(|e| WatchError::FeedFormat(format!("invalid title selector: {e:?}")))?;
    let link_selector = Selector::parse("link")
        .map_err(|e| WatchError::FeedFormat(format!("invalid link selector: {e:?}")))?;

    let record = document
        .select(&entry_selector)
        .map(|entry| {
            let title = entry
                .select(&title_selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string());
            let link = entry
                .select(&link_selector)
                .next()
                .and_then(|el| el.value().attr("href"))
                .map(str::to_string);
            let text = entry.text().collect::<String>();
            EntryRecord { title, link, text }
        })
        .find(|record| record.contains_marker(platform_marker))
        .ok_or_else(|| {
            WatchError::FeedFormat(format!(
                "no release entry matching platform marker {platform_marker:?}"
            ))
        })?;

    let title = record
        .title
        .ok_or_else(|| WatchError::FeedFormat("matching entry has no title".to_string()))?;
    let download_url = record
        .link
        .ok_or_else(|| WatchError::FeedFormat("matching entry has no download link".to_string()))?;

    Ok(ReleaseEntry {
        title,
        download_url,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    const WINDOWS_64: &str = "/windows/64bit/";

    const MOCK_FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ungoogled-chromium binary downloads</title>
  <link href="https://example.github.io/binaries/" />
  <updated>2023-11-15T08:30:00Z</updated>
  <entry>
    <title>
      119.0.6045.123-1.1
    </title>
    <link href="https://example.github.io/binaries/releases/macos/119.0.6045.123-1.1" />
    <id>https://example.github.io/binaries/releases/macos/119.0.6045.123-1.1</id>
    <updated>2023-11-15T08:30:00Z</updated>
  </entry>
  <entry>
    <title>119.0.6045.123-1</title>
    <link href="https://example.github.io/binaries/releases/windows/64bit/119.0.6045.123-1" />
    <id>https://example.github.io/binaries/releases/windows/64bit/119.0.6045.123-1</id>
    <updated>2023-11-14T20:12:00Z</updated>
  </entry>
  <entry>
    <title>118.0.5993.117-1</title>
    <link href="https://example.github.io/binaries/releases/windows/64bit/118.0.5993.117-1" />
    <id>https://example.github.io/binaries/releases/windows/64bit/118.0.5993.117-1</id>
    <updated>2023-10-26T17:45:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn selects_first_matching_entry_in_document_order() {
        let entry = select_release(MOCK_FEED, WINDOWS_64).unwrap();
        assert_eq!(entry.title, "119.0.6045.123-1");
        assert_eq!(
            entry.download_url,
            "https://example.github.io/binaries/releases/windows/64bit/119.0.6045.123-1"
        );
    }

    #[test]
    fn skips_entries_for_other_platforms() {
        let entry = select_release(MOCK_FEED, "/macos/").unwrap();
        assert_eq!(entry.title, "119.0.6045.123-1.1");
    }

    #[test]
    fn title_whitespace_is_trimmed() {
        // The macos entry's title spans multiple lines in the fixture.
        let entry = select_release(MOCK_FEED, "/macos/").unwrap();
        assert_eq!(entry.title, "119.0.6045.123-1.1");
    }

    #[test]
    fn no_matching_entry_is_a_feed_format_error() {
        let err = select_release(MOCK_FEED, "/freebsd/").unwrap_err();
        assert!(matches!(err, WatchError::FeedFormat(_)));
        assert!(err.to_string().contains("/freebsd/"));
    }

    #[test]
    fn empty_document_is_a_feed_format_error() {
        let err = select_release("", WINDOWS_64).unwrap_err();
        assert!(matches!(err, WatchError::FeedFormat(_)));
    }

    #[test]
    fn matching_entry_without_title_is_an_error() {
        let feed = r#"<feed>
  <entry>
    <link href="https://example.com/releases/windows/64bit/120.0.1.2-1" />
  </entry>
</feed>"#;
        let err = select_release(feed, WINDOWS_64).unwrap_err();
        assert!(matches!(err, WatchError::FeedFormat(_)));
        assert!(err.to_string().contains("no title"));
    }

    #[test]
    fn matching_entry_without_link_is_an_error() {
        let feed = r#"<feed>
  <entry>
    <title>120.0.1.2-1</title>
    <id>https://example.com/releases/windows/64bit/120.0.1.2-1</id>
  </entry>
</feed>"#;
        let err = select_release(feed, WINDOWS_64).unwrap_err();
        assert!(matches!(err, WatchError::FeedFormat(_)));
        assert!(err.to_string().contains("no download link"));
    }

    #[test]
    fn link_without_href_counts_as_missing() {
        let feed = r#"<feed>
  <entry>
    <title>120.0.1.2-1</title>
    <link rel="alternate" />
    <id>https://example.com/releases/windows/64bit/120.0.1.2-1</id>
  </entry>
</feed>"#;
        let err = select_release(feed, WINDOWS_64).unwrap_err();
        assert!(matches!(err, WatchError::FeedFormat(_)));
    }

    #[test]
    fn marker_in_id_text_matches_when_link_points_elsewhere() {
        let feed = r#"<feed>
  <entry>
    <title>120.0.1.2-1</title>
    <link href="https://mirror.example.com/dl/120.0.1.2-1" />
    <id>https://example.com/releases/windows/64bit/120.0.1.2-1</id>
  </entry>
</feed>"#;
        let entry = select_release(feed, WINDOWS_64).unwrap();
        assert_eq!(entry.download_url, "https://mirror.example.com/dl/120.0.1.2-1");
    }

    #[test]
    fn feed_level_title_and_link_are_not_entry_fields() {
        // The document-level title would match any marker-less query; only
        // entry elements may be selected.
        let feed = r#"<feed>
  <title>windows/64bit builds</title>
  <link href="https://example.com/releases/windows/64bit/" />
</feed>"#;
        let err = select_release(feed, WINDOWS_64).unwrap_err();
        assert!(matches!(err, WatchError::FeedFormat(_)));
    }
}
