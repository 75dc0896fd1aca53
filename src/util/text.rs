use std::borrow::Cow;

/// Strip control characters that have no business in rendered HTML.
///
/// Removes ASCII control chars 0x00-0x08, 0x0B-0x0C, 0x0E-0x1F and DEL (0x7F).
/// Preserves tab, newline and carriage return.
///
/// Returns `Cow::Borrowed` when the input contains no control characters
/// (the common case for feed titles).
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_control = |c: char| {
        c == '\u{7f}' || (c < '\u{20}' && c != '\t' && c != '\n' && c != '\r')
    };

    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| !is_control(c)).collect())
}

/// Reduce an HTML fragment from a feed summary to plain text.
///
/// - Drops whole `<script>` and `<style>` blocks (case-insensitive)
/// - Strips every other tag, keeping the text between them
/// - Decodes HTML entities (`&amp;`, `&#8217;`, ...) after tags are gone
/// - Collapses whitespace runs into a single space and trims the ends
///
/// A `<` only opens a tag when followed by a letter, `/`, `!` or `?`; a
/// bare `<` (as in `count < 5`) is kept as text, and so is an unterminated
/// tag. Tags are replaced by a space so that `a<br>b` reads as `a b`.
///
/// Runs in a single forward pass over the input.
pub fn strip_markup(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    // ASCII lowercasing keeps byte offsets aligned with `input`
    let lower = input.to_ascii_lowercase();
    let mut text = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(rel) = input[pos..].find('<') {
        let lt = pos + rel;
        text.push_str(&input[pos..lt]);

        if !opens_tag(&input[lt + 1..]) {
            text.push('<');
            pos = lt + 1;
            continue;
        }

        if let Some(tag) = raw_text_block(&lower[lt + 1..]) {
            let close = format!("</{}", tag);
            let block_end = lower[lt..]
                .find(&close)
                .map(|c| lt + c + close.len())
                .and_then(|after| lower[after..].find('>').map(|g| after + g + 1));
            match block_end {
                Some(end) => {
                    text.push(' ');
                    pos = end;
                }
                None => {
                    // Unterminated block swallows the rest of the fragment
                    pos = input.len();
                }
            }
            continue;
        }

        match input[lt..].find('>') {
            Some(gt) => {
                text.push(' ');
                pos = lt + gt + 1;
            }
            None => {
                text.push_str(&input[lt..]);
                pos = input.len();
            }
        }
    }
    text.push_str(&input[pos..]);

    let decoded = html_escape::decode_html_entities(&text);
    collapse_whitespace(&strip_control_chars(&decoded))
}

fn opens_tag(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// `script` or `style` when `rest` (lowercased, just past `<`) opens one.
fn raw_text_block(rest: &str) -> Option<&'static str> {
    ["script", "style"].into_iter().find(|tag| {
        rest.strip_prefix(tag).is_some_and(|after| {
            after
                .chars()
                .next()
                .map_or(true, |c| c == '>' || c == '/' || c.is_whitespace())
        })
    })
}

/// Collapse whitespace runs into single spaces and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "Hello, world!";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_preserves_tabs_newlines_cr() {
        assert_eq!(strip_control_chars("a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn test_strip_control_chars_removes_controls() {
        assert_eq!(strip_control_chars("a\x00b\x07c\x1bd\x7fe"), "abcde");
    }

    #[test]
    fn test_strip_unicode_preserved() {
        assert_eq!(strip_control_chars("Zürich \u{1F512}"), "Zürich \u{1F512}");
    }

    #[test]
    fn test_markup_tags_removed() {
        assert_eq!(
            strip_markup("<p>New <b>ransomware</b> strain</p>"),
            "New ransomware strain"
        );
    }

    #[test]
    fn test_markup_break_separates_words() {
        assert_eq!(strip_markup("first<br/>second"), "first second");
    }

    #[test]
    fn test_markup_script_and_style_dropped() {
        let input = "<style>p{color:red}</style>Body<SCRIPT>alert(1)</SCRIPT> text";
        assert_eq!(strip_markup(input), "Body text");
    }

    #[test]
    fn test_markup_unterminated_script_truncates() {
        assert_eq!(strip_markup("Visible<script>var x = 1;"), "Visible");
    }

    #[test]
    fn test_markup_entities_decoded() {
        assert_eq!(
            strip_markup("Patch &amp; update &#8217;now&#8217;"),
            "Patch & update \u{2019}now\u{2019}"
        );
    }

    #[test]
    fn test_markup_empty() {
        assert_eq!(strip_markup(""), "");
        assert_eq!(strip_markup("<p></p>"), "");
    }

    #[test]
    fn test_markup_bare_less_than_kept() {
        assert_eq!(
            strip_markup("Patch count < 5 this week; new ransomware strain seen"),
            "Patch count < 5 this week; new ransomware strain seen"
        );
        assert_eq!(strip_markup("a <3 b"), "a <3 b");
    }

    #[test]
    fn test_markup_escaped_tag_survives_as_text() {
        // Entities decode after stripping, so `&lt;b&gt;` stays literal
        assert_eq!(strip_markup("use &lt;b&gt; for bold"), "use <b> for bold");
    }

    #[test]
    fn test_markup_unterminated_tag_kept_as_text() {
        assert_eq!(strip_markup("ends with <b"), "ends with <b");
    }

    #[test]
    fn test_markup_script_prefix_is_ordinary_tag() {
        assert_eq!(strip_markup("<scripture>verse</scripture>"), "verse");
    }

    #[test]
    fn test_markup_many_blocks() {
        let input = "<style></style>x".repeat(40_000);
        let out = strip_markup(&input);
        assert_eq!(out.len(), 40_000 * 2 - 1);
        assert!(out.split(' ').all(|w| w == "x"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}
