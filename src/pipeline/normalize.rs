//! Text normalizer: merge, trim and prune text nodes after flattening.
//!
//! Runs over sibling lists only. Once it is done every text node holds a
//! single run of characters (forced breaks already turned into `\n`), no two
//! adjacent text siblings share a preformatted flag, and no text node is
//! empty, so the block renderer never special-cases split or blank runs.

use crate::tree::{Fragment, NodeId, Text, Tree};

/// Whitespace stripped from the ends of a text run.
const TRIM_CHARS: [char; 4] = ['\r', '\n', '\t', ' '];

/// Normalize every text node of a flattened tree in place.
pub fn normalize(tree: &mut Tree) {
    normalize_node(tree, Tree::ROOT);
    tree.compact();
}

fn normalize_node(tree: &mut Tree, id: NodeId) {
    merge_text_siblings(tree, id);

    let children = tree.children(id).to_vec();
    for &child in &children {
        if tree[child].is_text() {
            let node = &tree[child];
            let trimmed = if node.is_preformatted {
                trim_preformatted(&node.text)
            } else {
                collapse_whitespace(&node.text)
            };
            tree[child].text = Text::from(trimmed);
        } else {
            normalize_node(tree, child);
        }
    }

    let keep: Vec<NodeId> = children
        .into_iter()
        .filter(|&c| !(tree[c].is_text() && tree[c].text.is_empty()))
        .collect();
    tree[id].children = keep;
}

/// Concatenate runs of adjacent text siblings that share a preformatted flag.
fn merge_text_siblings(tree: &mut Tree, id: NodeId) {
    let children = tree.children(id).to_vec();
    let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());

    for child in children {
        if let Some(&prev) = kept.last() {
            let mergeable = tree[prev].is_text()
                && tree[child].is_text()
                && tree[prev].is_preformatted == tree[child].is_preformatted;
            if mergeable {
                let text = std::mem::take(&mut tree[child].text);
                tree[prev].text.append(text);
                continue;
            }
        }
        kept.push(child);
    }

    tree[id].children = kept;
}

/// Preformatted text keeps its layout; only trailing whitespace goes.
fn trim_preformatted(text: &Text) -> String {
    text.to_plain().trim_end_matches(TRIM_CHARS).to_string()
}

/// Collapse whitespace outside `pre`.
///
/// Strips the ends, turns each whitespace run into one space, replaces
/// forced breaks with `\n` and drops the spaces on either side of them.
fn collapse_whitespace(text: &Text) -> String {
    enum Piece {
        Char(char),
        Break,
    }

    let mut pieces: Vec<Piece> = Vec::new();
    for fragment in text.fragments() {
        match fragment {
            Fragment::Chars(s) => pieces.extend(s.chars().map(Piece::Char)),
            Fragment::Break => pieces.push(Piece::Break),
        }
    }

    let is_trimmed = |p: &Piece| matches!(p, Piece::Char(c) if TRIM_CHARS.contains(c));
    let start = pieces.iter().position(|p| !is_trimmed(p)).unwrap_or(pieces.len());
    let end = pieces
        .iter()
        .rposition(|p| !is_trimmed(p))
        .map_or(start, |i| i + 1);

    let mut out = String::with_capacity(end.saturating_sub(start));
    let mut pending_space = false;
    let mut after_break = false;

    for piece in &pieces[start..end] {
        match *piece {
            Piece::Char(c) if c.is_whitespace() => {
                if !after_break {
                    pending_space = true;
                }
            }
            Piece::Char(c) => {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                after_break = false;
                out.push(c);
            }
            Piece::Break => {
                pending_space = false;
                after_break = true;
                out.push('\n');
            }
        }
    }
    if pending_space {
        out.push(' ');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{flatten::flatten, parse::build_tree};

    fn normalized(html: &str) -> String {
        let mut tree = build_tree(html);
        flatten(&mut tree);
        normalize(&mut tree);
        tree.outline()
    }

    #[test]
    fn test_merges_adjacent_text() {
        assert_eq!(
            normalized("<p>a <b>b</b> <i>c</i></p>"),
            r#"(root (p "a *b* /c/"))"#
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalized("<p>  a \n\t b   c\n</p>"), r#"(root (p "a b c"))"#);
    }

    #[test]
    fn test_break_becomes_newline_without_surrounding_spaces() {
        assert_eq!(normalized("<p>a <br> b</p>"), r#"(root (p "a\nb"))"#);
        assert_eq!(normalized("<p>a<br><br>b</p>"), r#"(root (p "a\n\nb"))"#);
    }

    #[test]
    fn test_trailing_break_is_kept() {
        assert_eq!(normalized("<p>a<br></p>"), r#"(root (p "a\n"))"#);
    }

    #[test]
    fn test_literal_newline_in_text_is_collapsed() {
        assert_eq!(normalized("<p>a\nb</p>"), r#"(root (p "a b"))"#);
    }

    #[test]
    fn test_preformatted_keeps_inner_whitespace() {
        assert_eq!(
            normalized("<pre><code>  fn x() {\n      y\n  }\n\n</code></pre>"),
            r#"(root (pre "  fn x() {\n      y\n  }"))"#
        );
    }

    #[test]
    fn test_prunes_whitespace_only_text() {
        assert_eq!(
            normalized("<ul>\n  <li>A</li>\n  <li>B</li>\n</ul>"),
            r#"(root (ul (li "A") (li "B")))"#
        );
    }

    #[test]
    fn test_preformatted_flag_blocks_merge() {
        let mut tree = build_tree("<pre>x</pre>");
        let pre = tree.children(Tree::ROOT)[0];
        tree.append_text(pre, Text::from("y"));
        let plain = tree.append_text(pre, Text::from("z"));
        tree[plain].is_preformatted = false;
        flatten(&mut tree);
        normalize(&mut tree);
        assert_eq!(tree.outline(), r#"(root (pre "xy" "z"))"#);
    }

    #[test]
    fn test_non_breaking_space_collapses_but_is_not_trimmed() {
        assert_eq!(normalized("<p>a\u{a0}\u{a0}b</p>"), r#"(root (p "a b"))"#);
    }
}
