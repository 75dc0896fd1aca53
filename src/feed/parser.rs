use anyhow::Result;
use feed_rs::parser;

use crate::util::{strip_control_chars, strip_markup};

/// A feed as the report needs it: an optional title and its entries in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

/// One feed item. Missing titles and links are empty strings; the summary
/// is plain text with markup already removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEntry {
    pub title: String,
    pub link: String,
    pub summary: Option<String>,
}

/// Parse RSS/Atom bytes into a [`ParsedFeed`].
///
/// Format detection is left to `feed-rs`. The summary falls back to the
/// entry's content body when the feed carries no separate summary.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)?;

    let title = feed
        .title
        .map(|t| strip_control_chars(t.content.trim()).into_owned())
        .filter(|t| !t.is_empty());

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| strip_control_chars(t.content.trim()).into_owned())
                .unwrap_or_default();
            let link = entry
                .links
                .first()
                .map(|l| l.href.trim().to_string())
                .unwrap_or_default();
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .map(|s| strip_markup(&s))
                .filter(|s| !s.is_empty());

            ParsedEntry {
                title,
                link,
                summary,
            }
        })
        .collect();

    Ok(ParsedFeed { title, entries })
}
