//! Raw mode: show a message body's HTML source instead of rendering it.
//!
//! Useful when the renderer's heuristics get a comment wrong. Only the
//! entities that make HN bodies unreadable (`&#x2F;`, `&#x27;`, `&quot;`)
//! are unescaped; everything else is shown as-is, with long lines wrapped.

use crate::pipeline::wrap::{wrap, WrapOptions};

const RAW_UNESCAPES: [(&str, &str); 3] = [("&#x2F;", "/"), ("&#x27;", "'"), ("&quot;", "\"")];

/// Split the raw body into lines wrapped at `width`.
///
/// Whitespace inside a line is preserved; blank lines produce no output.
/// Hyphenated words may be split after a hyphen.
pub fn raw_lines(body: &str, width: usize) -> Vec<String> {
    let mut text = body.to_string();
    for (from, to) in RAW_UNESCAPES {
        text = text.replace(from, to);
    }

    let options = WrapOptions {
        replace_whitespace: false,
        ..WrapOptions::new(width.max(1))
    };

    text.split('\n')
        .flat_map(|line| wrap(line, &options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescapes_selected_entities_only() {
        assert_eq!(
            raw_lines("a&#x2F;b &#x27;c&#x27; &quot;d&quot; &gt;e", 120),
            vec!["a/b 'c' \"d\" &gt;e"]
        );
    }

    #[test]
    fn test_blank_lines_dropped() {
        assert_eq!(raw_lines("a\n\nb\n", 120), vec!["a", "b"]);
    }

    #[test]
    fn test_long_lines_wrapped_and_words_broken() {
        assert_eq!(
            raw_lines("<p>aaaa bbbb</p>", 8),
            vec!["<p>aaaa", "bbbb</p>"]
        );
        assert_eq!(raw_lines("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_breaks_after_hyphen() {
        assert_eq!(raw_lines("aaaa-bbbb cc", 8), vec!["aaaa-", "bbbb cc"]);
    }

    #[test]
    fn test_inner_whitespace_kept() {
        assert_eq!(raw_lines("a   b", 120), vec!["a   b"]);
    }
}
