//! Tree builder: a permissive tokenizer feeding a soup-style tree builder.
//!
//! ## Never fail
//!
//! Comment bodies on discussion sites are hand-written snippets, not
//! documents: unclosed paragraphs, stray closing tags and tags closed out of
//! order are routine. The builder therefore has no error path at all:
//!
//! - unrecognized tags are skipped outright (their content still attaches
//!   to the nearest recognized ancestor)
//! - a closing tag walks up to the nearest matching open node, closing
//!   everything in between; with no match it stops at the root
//! - `<br>` and `<hr>` never hold children and are closed by whatever
//!   follows them
//! - anything that does not parse as markup is character data
//!
//! The worst outcome for bad markup is a tree flatter than intended.

use super::sanitize::clean_decoded;
use crate::tree::{NodeId, Tag, Text, Tree};
use tracing::trace;

/// Opening tags below this depth are ignored so later recursive passes
/// stay within a bounded stack.
pub const MAX_DEPTH: usize = 256;

/// Parse `html` into a tree rooted at a synthetic `root` node.
pub fn build_tree(html: &str) -> Tree {
    let mut builder = TreeBuilder::new();
    for token in Tokenizer::new(html) {
        builder.feed(token);
    }
    builder.finish()
}

// ── Tokens ───────────────────────────────────────────────────────────────

/// A lexical unit of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name attr=value …>`; names are lowercased, values entity-decoded.
    Start {
        name: String,
        attrs: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    /// `</name>`
    End { name: String },
    /// Raw character data (entities still encoded).
    Data(&'a str),
}

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// Streaming tokenizer over a `&str`.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a raw-text start tag; holds its name.
    raw_text: Option<&'static str>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text: None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Emit everything up to the raw-text element's end tag as data.
    fn raw_text_data(&mut self, tag: &'static str) -> Option<Token<'a>> {
        let rest = self.rest();
        let needle = format!("</{tag}");
        let end = find_ascii_case_insensitive(rest, &needle).unwrap_or(rest.len());
        self.pos += end;
        (end > 0).then(|| Token::Data(&rest[..end]))
    }

    /// Classify the markup starting at `self.pos` (which is a `<`).
    ///
    /// Returns `None` when the `<` is literal text.
    fn markup(&mut self) -> Option<Option<Token<'a>>> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let next = bytes.get(1).copied()?;

        if next.is_ascii_alphabetic() {
            let end = find_tag_end(bytes, 0)?;
            let token = parse_start_tag(&rest[1..end]);
            self.pos += end + 1;
            if let Token::Start { ref name, self_closing: false, .. } = token {
                self.raw_text = RAW_TEXT_TAGS.iter().copied().find(|t| t == name);
            }
            return Some(Some(token));
        }

        match next {
            b'/' => {
                let end = rest.find('>')?;
                self.pos += end + 1;
                let inner = &rest[2..end];
                if inner.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    let name = inner
                        .split(|c: char| c.is_ascii_whitespace() || c == '/')
                        .next()
                        .unwrap_or("")
                        .to_ascii_lowercase();
                    Some(Some(Token::End { name }))
                } else {
                    // `</>` and bogus comments
                    Some(None)
                }
            }
            b'!' if rest.starts_with("<!--") => {
                let end = rest[4..].find("-->").map_or(rest.len(), |i| i + 4 + 3);
                self.pos += end;
                Some(None)
            }
            b'!' | b'?' => {
                let end = rest.find('>')?;
                self.pos += end + 1;
                Some(None)
            }
            _ => None,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            if let Some(tag) = self.raw_text.take() {
                if let Some(token) = self.raw_text_data(tag) {
                    return Some(token);
                }
            }

            let rest = self.rest();
            if rest.starts_with('<') {
                match self.markup() {
                    Some(Some(token)) => return Some(token),
                    // Comment, doctype, processing instruction: nothing to emit.
                    Some(None) => continue,
                    None => {}
                }
            }

            // Character data runs up to the next `<` that opens real markup.
            let start = self.pos;
            let mut scan = if rest.starts_with('<') { 1 } else { 0 };
            loop {
                match self.input[start + scan..].find('<') {
                    None => {
                        self.pos = self.input.len();
                        break;
                    }
                    Some(offset) => {
                        let at = start + scan + offset;
                        if opens_markup(&self.input.as_bytes()[at..]) {
                            self.pos = at;
                            break;
                        }
                        scan += offset + 1;
                    }
                }
            }
            if self.pos > start {
                return Some(Token::Data(&self.input[start..self.pos]));
            }
        }
    }
}

/// Whether the bytes at a `<` begin something other than literal text.
///
/// Unterminated markup (no closing `>`) counts as literal text.
fn opens_markup(bytes: &[u8]) -> bool {
    match bytes.get(1) {
        Some(b) if b.is_ascii_alphabetic() => find_tag_end(bytes, 0).is_some(),
        Some(b'/') | Some(b'?') => bytes.contains(&b'>'),
        Some(b'!') => bytes.starts_with(b"<!--") || bytes.contains(&b'>'),
        _ => false,
    }
}

/// Find the `>` closing a tag that starts at `i` (`s[i] == b'<'`), skipping
/// over quoted attribute values.
fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    i += 1;
    let mut quote: u8 = 0;
    while i < s.len() {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if (b == b'"' || b == b'\'') && is_after_equals(s, i) {
            quote = b;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Quotes only open a value right after `=` (optionally with spaces between).
fn is_after_equals(s: &[u8], i: usize) -> bool {
    s[..i]
        .iter()
        .rev()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'=')
}

/// Parse the inside of a start tag (between `<` and `>`).
fn parse_start_tag(inner: &str) -> Token<'static> {
    let (body, self_closing) = match inner.strip_suffix('/') {
        Some(body) => (body, true),
        None => (inner, false),
    };

    let name_end = body
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();

    Token::Start {
        name,
        attrs: parse_attributes(&body[name_end..]),
        self_closing,
    }
}

fn parse_attributes(mut s: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
        if s.is_empty() {
            return attrs;
        }

        let name_end = s
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .unwrap_or(s.len());
        let name = s[..name_end].to_ascii_lowercase();
        s = s[name_end..].trim_start();

        let value = if let Some(after_eq) = s.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (raw, rest) = match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    match body.find(q) {
                        Some(end) => (&body[..end], &body[end + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = after_eq
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            s = rest;
            let decoded = html_escape::decode_html_entities(raw);
            Some(clean_decoded(&decoded).into_owned())
        } else {
            None
        };

        attrs.push((name, value));
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

// ── Tree builder ─────────────────────────────────────────────────────────

struct TreeBuilder {
    tree: Tree,
    current: NodeId,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            tree: Tree::new(),
            current: Tree::ROOT,
        }
    }

    fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::Start {
                name,
                attrs,
                self_closing,
            } => {
                self.start_tag(&name, attrs);
                if self_closing {
                    self.end_tag(&name);
                }
            }
            Token::End { name } => self.end_tag(&name),
            Token::Data(raw) => self.data(raw),
        }
    }

    fn finish(self) -> Tree {
        self.tree
    }

    /// `<br>` and `<hr>` never have content: close them before anything
    /// else is attached.
    fn close_auto_closing(&mut self) {
        if self.tree[self.current].tag.is_auto_closing() {
            if let Some(parent) = self.tree.parent(self.current) {
                self.current = parent;
            }
        }
    }

    fn start_tag(&mut self, name: &str, attrs: Vec<(String, Option<String>)>) {
        let Some(tag) = Tag::from_name(name) else {
            trace!(tag = name, "skipping unrecognized tag");
            return;
        };

        self.close_auto_closing();

        if self.tree[self.current].depth >= MAX_DEPTH {
            trace!(tag = name, "nesting too deep, ignoring tag");
            return;
        }

        let id = self.tree.append_child(self.current, tag);
        if tag == Tag::A {
            self.tree[id].href = attrs
                .into_iter()
                .find(|(k, _)| k == "href")
                .and_then(|(_, v)| v);
        }
        self.current = id;
    }

    fn end_tag(&mut self, name: &str) {
        let Some(tag) = Tag::from_name(name) else {
            return;
        };

        // Close through any still-open descendants up to the match.
        while let Some(parent) = self.tree.parent(self.current) {
            let closed = self.current;
            self.current = parent;
            if self.tree[closed].tag == tag {
                return;
            }
        }
        trace!(tag = name, "no open element to close");
    }

    fn data(&mut self, raw: &str) {
        self.close_auto_closing();
        let decoded = html_escape::decode_html_entities(raw);
        self.tree
            .append_text(self.current, Text::from(clean_decoded(&decoded).as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(html: &str) -> String {
        build_tree(html).outline()
    }

    #[test]
    fn test_tokenizer_basic_stream() {
        let tokens: Vec<_> = Tokenizer::new(r#"<p class="x">Hi <a HREF='/u'>u</a></p>"#).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Start {
                    name: "p".into(),
                    attrs: vec![("class".into(), Some("x".into()))],
                    self_closing: false
                },
                Token::Data("Hi "),
                Token::Start {
                    name: "a".into(),
                    attrs: vec![("href".into(), Some("/u".into()))],
                    self_closing: false
                },
                Token::Data("u"),
                Token::End { name: "a".into() },
                Token::End { name: "p".into() },
            ]
        );
    }

    #[test]
    fn test_tokenizer_literal_lt() {
        let tokens: Vec<_> = Tokenizer::new("a < b <3 x<").collect();
        assert_eq!(tokens, vec![Token::Data("a < b <3 x<")]);
    }

    #[test]
    fn test_tokenizer_unterminated_tag_is_data() {
        let tokens: Vec<_> = Tokenizer::new("x <a href=").collect();
        assert_eq!(tokens, vec![Token::Data("x <a href=")]);
    }

    #[test]
    fn test_tokenizer_skips_comments_and_doctype() {
        let tokens: Vec<_> = Tokenizer::new("<!DOCTYPE html>a<!-- <p> -->b<?xml x?>c").collect();
        assert_eq!(
            tokens,
            vec![Token::Data("a"), Token::Data("b"), Token::Data("c")]
        );
    }

    #[test]
    fn test_tokenizer_script_is_raw_text() {
        let tokens: Vec<_> = Tokenizer::new("<script>if (a<b) {}</SCRIPT>").collect();
        assert_eq!(tokens[1], Token::Data("if (a<b) {}"));
        assert_eq!(tokens[2], Token::End { name: "script".into() });
    }

    #[test]
    fn test_tokenizer_self_closing_and_bare_attribute() {
        let tokens: Vec<_> = Tokenizer::new("<br/><input disabled>").collect();
        assert_eq!(
            tokens,
            vec![
                Token::Start {
                    name: "br".into(),
                    attrs: vec![],
                    self_closing: true
                },
                Token::Start {
                    name: "input".into(),
                    attrs: vec![("disabled".into(), None)],
                    self_closing: false
                },
            ]
        );
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let tree = build_tree(r#"<a href="/x?a>b">t</a>"#);
        assert_eq!(tree[1].href.as_deref(), Some("/x?a>b"));
    }

    #[test]
    fn test_entities_decoded_in_data_and_href() {
        let tree = build_tree(r#"<a href="/i?a=1&amp;b=2">&gt;&#x27;q&#x27;</a>"#);
        assert_eq!(tree[1].href.as_deref(), Some("/i?a=1&b=2"));
        assert_eq!(tree.text_content(Tree::ROOT), ">'q'");
    }

    #[test]
    fn test_decoded_references_never_yield_controls() {
        let tree = build_tree(r#"<a href="/x&#x85;y">a&#x80;b&#x9d;c</a>"#);
        assert_eq!(tree[1].href.as_deref(), Some("/x\u{2026}y"));
        assert_eq!(tree.text_content(Tree::ROOT), "a\u{20ac}bc");
    }

    #[test]
    fn test_nested_structure() {
        assert_eq!(
            outline("<blockquote><p>a</p></blockquote><p>b</p>"),
            r#"(root (blockquote (p "a")) (p "b"))"#
        );
    }

    #[test]
    fn test_unknown_tags_skipped_content_kept() {
        assert_eq!(
            outline("<div><span>x</span><p>y</p></div>"),
            r#"(root "x" (p "y"))"#
        );
    }

    #[test]
    fn test_auto_closing_br_and_hr() {
        assert_eq!(outline("a<br>b"), r#"(root "a" (br) "b")"#);
        assert_eq!(outline("<hr><p>x</p>"), r#"(root (hr) (p "x"))"#);
        assert_eq!(outline("a<br/>b"), r#"(root "a" (br) "b")"#);
    }

    #[test]
    fn test_close_walks_through_open_descendants() {
        assert_eq!(
            outline("<p><b><i>x</p>y"),
            r#"(root (p (b (i "x"))) "y")"#
        );
    }

    #[test]
    fn test_unmatched_close_goes_to_root() {
        assert_eq!(outline("<p>a</li>b"), r#"(root (p "a") "b")"#);
        assert_eq!(outline("</p>a"), r#"(root "a")"#);
    }

    #[test]
    fn test_unclosed_paragraphs_nest() {
        assert_eq!(outline("a<p>b<p>c"), r#"(root "a" (p "b" (p "c")))"#);
    }

    #[test]
    fn test_preformatted_flag() {
        let tree = build_tree("<pre><code>x</code></pre>y");
        assert!(tree[3].is_preformatted);
        assert!(!tree[4].is_preformatted);
    }

    #[test]
    fn test_depth_limit_ignores_deep_tags() {
        let html = "<b>".repeat(MAX_DEPTH + 10) + "x";
        let tree = build_tree(&html);
        assert_eq!(tree.node_count(), MAX_DEPTH + 2);
        assert_eq!(tree.text_content(Tree::ROOT), "x");
    }
}
