//! HTML report assembly.
//!
//! [`ReportBuilder`] owns the document buffer for a whole run. Sections are
//! appended in source order and the document is closed by
//! [`ReportBuilder::finish`]. Everything that comes from a feed is escaped
//! before it reaches the buffer; only the template and the highlight markup
//! are written raw.

mod ident;
mod writer;

pub use ident::{sanitize_id, IdAllocator};
pub use writer::{write_report, WriteError};

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

use crate::feed::ParsedEntry;
use crate::highlight::Highlighter;
use crate::util::validate_url;

/// Used only if a caller bypasses config validation with an empty palette.
const FALLBACK_COLOR: &str = "#333333";

const STYLE: &str = r#"
        body {
            font-family: Arial, sans-serif;
            background-color: #f9f9f9;
            margin: 20px;
        }
        h1 {
            color: #333;
        }
        .generated {
            color: #888;
            font-size: 0.9em;
        }
        .feed-section {
            margin-bottom: 50px;
        }
        .feed-section h2 {
            font-size: 2em;
            color: #fff;
            padding: 10px;
        }
        p {
            font-size: 1.1em;
            color: #555;
        }
        a {
            color: #007BFF;
            text-decoration: none;
        }
        a:hover {
            text-decoration: underline;
        }
        .entry {
            background-color: #fff;
            border: 1px solid #ddd;
            padding: 15px;
            margin-bottom: 10px;
            border-radius: 5px;
            box-shadow: 0 0 5px rgba(0,0,0,0.1);
        }
        .entry h3 {
            margin-top: 0;
        }
        .feed-error {
            background-color: #fdecea;
            border: 1px solid #e74c3c;
            color: #a94442;
            padding: 15px;
            border-radius: 5px;
        }
        .highlight {
            background-color: yellow;
            font-weight: bold;
        }
"#;

/// Heading color for the source at `index`: cycles through the palette.
///
/// ```
/// use tagwatch::report::palette_color;
///
/// let palette = vec!["#111".to_string(), "#222".to_string()];
/// assert_eq!(palette_color(&palette, 0), "#111");
/// assert_eq!(palette_color(&palette, 3), "#222");
/// ```
pub fn palette_color(palette: &[String], index: usize) -> &str {
    match palette.len() {
        0 => FALLBACK_COLOR,
        n => &palette[index % n],
    }
}

/// Heading used when a feed has no title (or could not be fetched).
pub fn fallback_title(index: usize) -> String {
    format!("RSS_Feed_{}", index + 1)
}

/// An entry that matched at least one keyword, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub title_html: String,
    pub link_html: String,
    /// Escaped `href` value; `None` when the link is not an http(s) URL.
    pub href: Option<String>,
    /// Highlighted summary; `None` when the entry has no summary.
    pub summary_html: Option<String>,
}

/// Highlight an entry's title, link and summary.
///
/// Returns `None` unless at least one of the three fields contains a
/// keyword: entries without a match never appear in the report.
pub fn render_entry(highlighter: &Highlighter, entry: &ParsedEntry) -> Option<RenderedEntry> {
    let title = highlighter.highlight_html(&entry.title);
    let link = highlighter.highlight_html(&entry.link);
    let summary = entry
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| highlighter.highlight_html(s));

    let matched =
        title.is_match() || link.is_match() || summary.as_ref().is_some_and(|s| s.is_match());
    if !matched {
        return None;
    }

    // Feed links are untrusted; never emit javascript: or data: hrefs
    let href = validate_url(&entry.link)
        .ok()
        .map(|_| encode_double_quoted_attribute(&entry.link).into_owned());

    Some(RenderedEntry {
        title_html: title.html,
        link_html: link.html,
        href,
        summary_html: summary.map(|s| s.html),
    })
}

/// Incrementally built HTML report.
#[derive(Debug)]
pub struct ReportBuilder {
    buf: String,
    ids: IdAllocator,
    sections: usize,
    entries: usize,
}

impl ReportBuilder {
    /// Start a document with the given title and generation timestamp.
    pub fn new(title: &str, generated_at: DateTime<Utc>) -> Self {
        let title = encode_text(title);
        let mut buf = String::with_capacity(16 * 1024);

        // Writing to a String cannot fail
        let _ = write!(
            buf,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}    </style>
</head>
<body>
    <h1>{title}</h1>
    <p class="generated">Generated {generated}</p>
"#,
            generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );

        Self {
            buf,
            ids: IdAllocator::new(),
            sections: 0,
            entries: 0,
        }
    }

    /// Append a section for a fetched feed. The heading is always written,
    /// even when `entries` is empty.
    pub fn add_feed_section(&mut self, title: &str, color: &str, entries: &[RenderedEntry]) {
        self.open_section(title, color);
        for entry in entries {
            self.push_entry(entry);
        }
        self.buf.push_str("    </div>\n");
    }

    /// Append a section for a source that could not be fetched.
    pub fn add_failed_section(&mut self, title: &str, color: &str, url: &str, error: &str) {
        self.open_section(title, color);
        let _ = writeln!(
            self.buf,
            r#"        <div class="feed-error"><strong>Could not load</strong> {}: {}</div>"#,
            encode_text(url),
            encode_text(error),
        );
        self.buf.push_str("    </div>\n");
    }

    /// Number of sections appended so far.
    pub fn section_count(&self) -> usize {
        self.sections
    }

    /// Number of entry blocks appended so far.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Close the document and hand back the finished HTML.
    pub fn finish(mut self) -> String {
        self.buf.push_str("</body>\n</html>\n");
        self.buf
    }

    fn open_section(&mut self, title: &str, color: &str) {
        let id = self.ids.allocate(title);
        let _ = write!(
            self.buf,
            r#"    <div class="feed-section" id="{id}">
        <h2 style="background-color: {color};">{title}</h2>
"#,
            id = encode_double_quoted_attribute(&id),
            color = encode_double_quoted_attribute(color),
            title = encode_text(title),
        );
        self.sections += 1;
    }

    fn push_entry(&mut self, entry: &RenderedEntry) {
        let _ = writeln!(self.buf, r#"        <div class="entry">"#);
        let _ = writeln!(self.buf, "            <h3>Title: {}</h3>", entry.title_html);
        match &entry.href {
            Some(href) => {
                let _ = writeln!(
                    self.buf,
                    r#"            <p><strong>Link:</strong> <a href="{}" target="_blank" rel="noopener noreferrer">{}</a></p>"#,
                    href, entry.link_html
                );
            }
            None => {
                let _ = writeln!(
                    self.buf,
                    "            <p><strong>Link:</strong> {}</p>",
                    entry.link_html
                );
            }
        }
        if let Some(summary) = &entry.summary_html {
            let _ = writeln!(
                self.buf,
                "            <p><strong>Summary:</strong> {}</p>",
                summary
            );
        }
        self.buf.push_str("        </div>\n");
        self.entries += 1;
    }
}
