//! Sanitizer: drop control characters before the markup reaches the parser.
//!
//! Comment bodies come straight from third-party APIs and occasionally carry
//! NULs, stray carriage returns or terminal escape sequences. Any of those
//! would corrupt a character-grid pager, so everything in Unicode category
//! `Cc` goes except `\n` and `\t`.

use std::borrow::Cow;

/// Remove control characters, keeping newlines and tabs.
///
/// Borrows the input unchanged when there is nothing to strip.
pub fn strip_control_chars(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_stripped) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.chars().filter(|&c| !is_stripped(c)).collect())
}

/// Clean text produced by entity decoding.
///
/// The raw input has already been through [`strip_control_chars`], so any
/// C1 control left here came from a numeric reference like `&#x80;`. Those
/// are read as Windows-1252, the way browsers do; controls that still
/// remain are dropped.
pub(crate) fn clean_decoded(decoded: &str) -> Cow<'_, str> {
    if !decoded.chars().any(is_stripped) {
        return Cow::Borrowed(decoded);
    }
    Cow::Owned(
        decoded
            .chars()
            .map(cp1252_control)
            .filter(|&c| !is_stripped(c))
            .collect(),
    )
}

pub(crate) fn is_stripped(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t'
}

/// Windows-1252 reading of a C1 control; other characters pass through.
fn cp1252_control(c: char) -> char {
    match c {
        '\u{80}' => '\u{20ac}',
        '\u{82}' => '\u{201a}',
        '\u{83}' => '\u{192}',
        '\u{84}' => '\u{201e}',
        '\u{85}' => '\u{2026}',
        '\u{86}' => '\u{2020}',
        '\u{87}' => '\u{2021}',
        '\u{88}' => '\u{2c6}',
        '\u{89}' => '\u{2030}',
        '\u{8a}' => '\u{160}',
        '\u{8b}' => '\u{2039}',
        '\u{8c}' => '\u{152}',
        '\u{8e}' => '\u{17d}',
        '\u{91}' => '\u{2018}',
        '\u{92}' => '\u{2019}',
        '\u{93}' => '\u{201c}',
        '\u{94}' => '\u{201d}',
        '\u{95}' => '\u{2022}',
        '\u{96}' => '\u{2013}',
        '\u{97}' => '\u{2014}',
        '\u{98}' => '\u{2dc}',
        '\u{99}' => '\u{2122}',
        '\u{9a}' => '\u{161}',
        '\u{9b}' => '\u{203a}',
        '\u{9c}' => '\u{153}',
        '\u{9e}' => '\u{17e}',
        '\u{9f}' => '\u{178}',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_newline_and_tab() {
        assert_eq!(strip_control_chars("a\n\tb"), "a\n\tb");
        assert!(matches!(strip_control_chars("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strips_nul_cr_and_escape() {
        assert_eq!(strip_control_chars("a\u{0}b\r\nc\u{1b}[31md"), "ab\nc[31md");
    }

    #[test]
    fn test_decoded_c1_read_as_cp1252() {
        assert_eq!(clean_decoded("a\u{80}b\u{93}q\u{94}"), "a\u{20ac}b\u{201c}q\u{201d}");
        assert_eq!(clean_decoded("x\u{81}y\u{1}z\r"), "xyz");
        assert!(matches!(clean_decoded("plain\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strips_c1_controls() {
        assert_eq!(strip_control_chars("x\u{85}y\u{9f}z"), "xyz");
    }
}
