//! Paragraph wrapper: greedy line breaking that knows about quotes, code
//! indentation and numbered link references.
//!
//! ## Heuristics
//!
//! Discussion sites have no markup for most of their structure; readers type
//! it. Three conventions are recognised per logical line:
//!
//! - `>` / `> >` / `>>` at the start is a quote; continuation lines repeat it
//! - two leading spaces is code; the line is left alone
//! - `[3]: https://…` is a numbered reference; it is never split so the
//!   number stays next to its link
//!
//! Widths count characters, not display columns.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(> ?)+").unwrap());

static RE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\d+\][ :-]*https?://[^ ]*$").unwrap());

/// Characters that separate words when wrapping.
const WRAP_WHITESPACE: [char; 6] = ['\t', '\n', '\u{b}', '\u{c}', '\r', ' '];

/// Tab stops used when expanding tabs.
const TAB_SIZE: usize = 8;

/// Knobs for [`wrap`].
#[derive(Debug, Clone)]
pub struct WrapOptions<'a> {
    /// Maximum line length in characters, indent included.
    pub width: usize,
    /// Prefix for every line after the first.
    pub subsequent_indent: &'a str,
    /// Split words longer than the line instead of letting them overflow.
    pub break_long_words: bool,
    /// Allow breaks after the hyphen of a hyphenated word (`well-known`).
    pub break_on_hyphens: bool,
    /// Turn every whitespace character into a plain space before wrapping.
    pub replace_whitespace: bool,
}

impl<'a> WrapOptions<'a> {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            subsequent_indent: "",
            break_long_words: true,
            break_on_hyphens: true,
            replace_whitespace: true,
        }
    }
}

/// Wrap one logical line of rendered text to `width`.
///
/// Empty lines, code-indented lines and reference lines come back as-is;
/// everything else is wrapped with its quote prefix carried onto each
/// continuation line.
pub fn text_wrap(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() || line.starts_with("  ") || RE_REFERENCE.is_match(line) {
        return vec![line.to_string()];
    }

    let indent = RE_QUOTE.find(line).map_or("", |m| m.as_str());

    let options = WrapOptions {
        width,
        subsequent_indent: indent,
        break_long_words: false,
        break_on_hyphens: false,
        replace_whitespace: true,
    };

    wrap(line, &options)
        .into_iter()
        .map(|l| l.trim_end().to_string())
        .collect()
}

/// Greedy word wrap.
///
/// Whitespace at the start of continuation lines and at the end of every
/// line is dropped. A whitespace-only input produces no lines.
pub fn wrap(text: &str, options: &WrapOptions<'_>) -> Vec<String> {
    let mut text = expand_tabs(text);
    if options.replace_whitespace {
        text = text.replace(WRAP_WHITESPACE, " ");
    }

    // Reversed so the next chunk is always at the end.
    let mut chunks: Vec<String> = split_chunks(&text, options.break_on_hyphens)
        .into_iter()
        .rev()
        .collect();
    let mut lines: Vec<String> = Vec::new();

    while !chunks.is_empty() {
        let indent = if lines.is_empty() {
            ""
        } else {
            options.subsequent_indent
        };
        let width = options.width.saturating_sub(char_len(indent));

        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        let mut line: Vec<String> = Vec::new();
        let mut line_len = 0usize;

        while let Some(chunk) = chunks.last() {
            let len = char_len(chunk);
            if line_len + len > width {
                break;
            }
            line_len += len;
            line.extend(chunks.pop());
        }

        if chunks.last().is_some_and(|c| char_len(c) > width) {
            handle_long_word(&mut chunks, &mut line, line_len, width, options);
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }

        if !line.is_empty() {
            lines.push(format!("{indent}{}", line.concat()));
        }
    }

    lines
}

fn handle_long_word(
    chunks: &mut Vec<String>,
    line: &mut Vec<String>,
    line_len: usize,
    width: usize,
    options: &WrapOptions<'_>,
) {
    let space_left = if width < 1 { 1 } else { width - line_len };

    if options.break_long_words {
        if let Some(chunk) = chunks.pop() {
            let mut split = chunk
                .char_indices()
                .nth(space_left)
                .map_or(chunk.len(), |(i, _)| i);
            if options.break_on_hyphens {
                // Prefer ending the piece right after its last hyphen.
                if let Some(hyphen) = chunk[..split].rfind('-') {
                    if hyphen > 0 && chunk[..hyphen].chars().any(|c| c != '-') {
                        split = hyphen + 1;
                    }
                }
            }
            line.push(chunk[..split].to_string());
            if split < chunk.len() {
                chunks.push(chunk[split..].to_string());
            }
        }
    } else if line.is_empty() {
        line.extend(chunks.pop());
    }
}

/// Split into alternating word / whitespace chunks.
///
/// With `hyphens`, a word is also split after each hyphen that joins two
/// letter runs (`state-of-the-art` → `state-`, `of-`, `the-`, `art`).
fn split_chunks(text: &str, hyphens: bool) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_blank = false;

    for (i, &c) in chars.iter().enumerate() {
        let blank = WRAP_WHITESPACE.contains(&c);
        if !current.is_empty() && blank != current_blank {
            chunks.push(std::mem::take(&mut current));
        }
        current_blank = blank;
        current.push(c);
        if hyphens && c == '-' && is_hyphen_break(&chars, i) {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// A hyphen at `i` is a break point when it follows two letters (or a
/// letter, hyphen, letter) and is followed by a letter, an optional hyphen
/// and another letter.
fn is_hyphen_break(chars: &[char], i: usize) -> bool {
    let letter = |j: usize| chars.get(j).is_some_and(|&c| c.is_alphabetic() || c == '_');
    let hyphen = |j: usize| chars.get(j) == Some(&'-');

    let behind = (i >= 2 && letter(i - 2) && letter(i - 1))
        || (i >= 3 && letter(i - 3) && hyphen(i - 2) && letter(i - 1));
    let ahead = letter(i + 1) && (letter(i + 2) || (hyphen(i + 2) && letter(i + 3)));

    behind && ahead
}

fn expand_tabs(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + TAB_SIZE);
    let mut column = 0usize;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

fn is_blank(chunk: &str) -> bool {
    chunk.chars().all(|c| WRAP_WHITESPACE.contains(&c))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
