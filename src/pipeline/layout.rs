//! Block renderer: lay out a flattened, normalized tree as fixed-width text.
//!
//! Each block gets the width of its parent minus whatever its own indent
//! prefix will take, renders its children, and then prefixes the whole
//! multi-line result:
//!
//! | Tag          | Width for children | Prefix                          |
//! |--------------|--------------------|---------------------------------|
//! | `blockquote` | `width - 2`        | `"> "` on every line            |
//! | `pre`        | `width - 2`        | `"| "` on every line            |
//! | `li`         | `width - 2`        | `"- "` first line, `"  "` after |
//! | `hr`         | n/a                | a rule of `-` across `width`    |
//! | others       | `width`            | none                            |

use super::wrap::text_wrap;
use crate::tree::{NodeId, Tag, Tree};

/// Render the whole tree at `width` columns.
pub fn render_tree(tree: &Tree, width: usize) -> String {
    render_block(tree, Tree::ROOT, width.max(1))
}

fn render_block(tree: &Tree, id: NodeId, width: usize) -> String {
    let tag = tree[id].tag;

    if tag == Tag::Hr {
        return "-".repeat(width);
    }

    let inner_width = match tag {
        Tag::Blockquote | Tag::Li | Tag::Pre => width.saturating_sub(2).max(1),
        _ => width,
    };

    let mut out = String::new();
    let mut prev_tag: Option<Tag> = None;

    for &child in tree.children(id) {
        let node = &tree[child];
        let rendered = if node.is_text() {
            render_text(tree, child, inner_width)
        } else {
            render_block(tree, child, inner_width)
        };
        if rendered.is_empty() {
            continue;
        }

        if let Some(prev) = prev_tag {
            // List items carry their own marker; no blank line between them.
            if prev == Tag::Li && node.tag == Tag::Li {
                out.push('\n');
            } else {
                out.push_str("\n\n");
            }
        }
        out.push_str(&rendered);
        prev_tag = Some(node.tag);
    }

    match tag {
        Tag::Blockquote => prefix_lines(&out, "> ", "> "),
        Tag::Pre => prefix_lines(&out, "| ", "| "),
        Tag::Li => prefix_lines(&out, "- ", "  "),
        _ => out,
    }
}

fn render_text(tree: &Tree, id: NodeId, width: usize) -> String {
    let node = &tree[id];
    let text = node.text.to_plain();
    if node.is_preformatted {
        return text;
    }

    text.split('\n')
        .flat_map(|line| text_wrap(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix the first line with `first` and every later line with `rest`.
fn prefix_lines(block: &str, first: &str, rest: &str) -> String {
    let mut out = String::with_capacity(block.len() + first.len() * 4);
    for (i, line) in block.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(rest);
        } else {
            out.push_str(first);
        }
        out.push_str(line);
    }
    out
}
