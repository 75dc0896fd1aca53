//! Case-insensitive keyword highlighting.
//!
//! All keywords are compiled into one alternation and the text is scanned
//! once, leftmost-first: at each position the earliest keyword in list order
//! that matches wins, and scanning resumes after the match. Inserted markup
//! is never scanned again.
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use thiserror::Error;

/// Opening tag placed before every matched keyword.
pub const HIGHLIGHT_OPEN: &str = r#"<span class="highlight">"#;
/// Closing tag placed after every matched keyword.
pub const HIGHLIGHT_CLOSE: &str = "</span>";

// Keeps pathological keyword lists from compiling into a huge automaton.
const MATCHER_SIZE_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("Failed to compile keyword matcher: {0}")]
    Compile(#[from] regex::Error),
}

/// Result of [`Highlighter::highlight_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    /// Escaped text with each match wrapped in highlight markup.
    pub html: String,
    /// Number of keyword occurrences found.
    pub matches: usize,
}

impl Highlighted {
    pub fn is_match(&self) -> bool {
        self.matches > 0
    }
}

/// Compiled keyword set.
#[derive(Debug, Clone)]
pub struct Highlighter {
    matcher: Option<Regex>,
}

impl Highlighter {
    /// Compile `keywords` into a matcher. Keywords are literal: regex
    /// metacharacters are escaped and surrounding spaces are kept, so
    /// `" IT "` only matches the word with a space on each side.
    /// Empty keywords are skipped; with none left, nothing ever matches.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, HighlightError> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(AsRef::as_ref)
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { matcher: None });
        }

        let matcher = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .size_limit(MATCHER_SIZE_LIMIT)
            .build()?;

        Ok(Self {
            matcher: Some(matcher),
        })
    }

    /// True when at least one keyword occurs in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(text))
    }

    /// Wrap every keyword occurrence in highlight markup, keeping the
    /// matched text's original casing. The rest of the text is copied
    /// verbatim (not escaped).
    ///
    /// Returns the input borrowed when nothing matches.
    pub fn highlight<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let Some(matcher) = &self.matcher else {
            return Cow::Borrowed(text);
        };

        let mut out: Option<String> = None;
        let mut last = 0;
        for m in matcher.find_iter(text) {
            let buf = out.get_or_insert_with(|| String::with_capacity(text.len() + 64));
            buf.push_str(&text[last..m.start()]);
            buf.push_str(HIGHLIGHT_OPEN);
            buf.push_str(m.as_str());
            buf.push_str(HIGHLIGHT_CLOSE);
            last = m.end();
        }

        match out {
            Some(mut buf) => {
                buf.push_str(&text[last..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(text),
        }
    }

    /// Like [`highlight`](Self::highlight), but HTML-escapes everything
    /// outside the inserted markup so the result is safe to embed as
    /// element content.
    pub fn highlight_html(&self, text: &str) -> Highlighted {
        let mut html = String::with_capacity(text.len());
        let mut matches = 0;
        let mut last = 0;

        if let Some(matcher) = &self.matcher {
            for m in matcher.find_iter(text) {
                html.push_str(&html_escape::encode_text(&text[last..m.start()]));
                html.push_str(HIGHLIGHT_OPEN);
                html.push_str(&html_escape::encode_text(m.as_str()));
                html.push_str(HIGHLIGHT_CLOSE);
                last = m.end();
                matches += 1;
            }
        }
        html.push_str(&html_escape::encode_text(&text[last..]));

        Highlighted { html, matches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn wrapped(s: &str) -> String {
        format!("{}{}{}", HIGHLIGHT_OPEN, s, HIGHLIGHT_CLOSE)
    }

    #[test]
    fn test_wraps_preserving_case() {
        let h = Highlighter::new(&["ransomware"]).unwrap();
        assert_eq!(
            h.highlight("Major Ransomware Attack"),
            format!("Major {} Attack", wrapped("Ransomware"))
        );
    }

    #[test]
    fn test_every_occurrence_wrapped() {
        let h = Highlighter::new(&["patch"]).unwrap();
        assert_eq!(
            h.highlight("PATCH now, patch often"),
            format!("{} now, {} often", wrapped("PATCH"), wrapped("patch"))
        );
    }

    #[test]
    fn test_no_match_is_borrowed_identity() {
        let h = Highlighter::new(&["malware"]).unwrap();
        let text = "Nothing to see here";
        let out = h.highlight(text);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, text);
    }

    #[test]
    fn test_empty_inputs() {
        let none: [&str; 0] = [];
        let h = Highlighter::new(&none).unwrap();
        assert_eq!(h.highlight("breach"), "breach");
        assert!(!h.is_match("breach"));

        let h = Highlighter::new(&["", "breach"]).unwrap();
        assert_eq!(h.highlight(""), "");
        assert!(h.is_match("Data BREACH"));
    }

    #[test]
    fn test_substring_match_inside_word() {
        let h = Highlighter::new(&["worm"]).unwrap();
        assert_eq!(
            h.highlight("bookworms"),
            format!("book{}s", wrapped("worm"))
        );
    }

    #[test]
    fn test_spaced_keyword_acts_as_boundary() {
        let h = Highlighter::new(&[" IT "]).unwrap();
        assert!(!h.is_match("Italy's iterative edits"));
        assert_eq!(
            h.highlight("the it team"),
            format!("the{}team", wrapped(" it "))
        );
    }

    #[test]
    fn test_first_keyword_in_list_wins_at_same_position() {
        let h = Highlighter::new(&["zero day", "zero day exploit"]).unwrap();
        assert_eq!(
            h.highlight("a zero day exploit"),
            format!("a {} exploit", wrapped("zero day"))
        );

        let h = Highlighter::new(&["zero day exploit", "zero day"]).unwrap();
        assert_eq!(
            h.highlight("a zero day exploit"),
            format!("a {}", wrapped("zero day exploit"))
        );
    }

    #[test]
    fn test_markup_is_not_rescanned() {
        // "span" and "highlight" appear in the inserted markup
        let h = Highlighter::new(&["ransom", "span", "highlight"]).unwrap();
        assert_eq!(h.highlight("ransom"), wrapped("ransom"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let h = Highlighter::new(&["c++", "(beta)"]).unwrap();
        assert!(h.is_match("Written in C++ (BETA)"));
        assert!(!h.is_match("c and beta"));
    }

    #[test]
    fn test_highlight_html_escapes_surrounding_text() {
        let h = Highlighter::new(&["breach"]).unwrap();
        let out = h.highlight_html("<script>Breach & leak</script>");
        assert_eq!(out.matches, 1);
        assert_eq!(
            out.html,
            format!("&lt;script&gt;{} &amp; leak&lt;/script&gt;", wrapped("Breach"))
        );
    }

    #[test]
    fn test_highlight_html_without_match() {
        let h = Highlighter::new(&["breach"]).unwrap();
        let out = h.highlight_html("a < b");
        assert!(!out.is_match());
        assert_eq!(out.html, "a &lt; b");
    }

    #[test]
    fn test_highlight_html_matches_keyword_containing_ampersand() {
        let h = Highlighter::new(&["AT&T"]).unwrap();
        let out = h.highlight_html("at&t outage");
        assert_eq!(out.matches, 1);
        assert_eq!(out.html, format!("{} outage", wrapped("at&amp;t")));
    }

    proptest! {
        #[test]
        fn prop_contained_keyword_is_wrapped(
            keyword in "[a-m]{1,8}",
            prefix in "[n-z0-9 ]{0,12}",
            suffix in "[n-z0-9 ]{0,12}",
            upper in any::<bool>(),
        ) {
            let cased = if upper { keyword.to_uppercase() } else { keyword.clone() };
            let text = format!("{}{}{}", prefix, cased, suffix);
            let h = Highlighter::new(&[keyword]).unwrap();
            let out = h.highlight(&text);
            prop_assert!(out.contains(HIGHLIGHT_OPEN));
            prop_assert!(out.contains(&wrapped(&cased)));
        }

        #[test]
        fn prop_absent_keywords_are_identity(
            keywords in proptest::collection::vec("[a-m]{3,6}", 0..5),
            text in "[n-z .,]{0,40}",
        ) {
            let h = Highlighter::new(&keywords).unwrap();
            prop_assert_eq!(h.highlight(&text), text.as_str());
            prop_assert!(!h.is_match(&text));
        }
    }
}
