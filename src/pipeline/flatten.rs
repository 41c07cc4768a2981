//! Inline flattener: collapse every inline subtree into a single text node.
//!
//! After this pass the tree holds only block tags and `text` nodes. Inline
//! mode is inherited: once a walk enters a non-block tag, everything below
//! it is flattened, block tags included.

use crate::tree::{NodeId, Tag, Text, Tree};

/// Flatten every inline subtree of `tree` in place.
pub fn flatten(tree: &mut Tree) {
    flatten_node(tree, Tree::ROOT, false);
    tree.compact();
}

fn flatten_node(tree: &mut Tree, id: NodeId, inline: bool) {
    let inline = inline || !tree[id].tag.is_block();

    if !inline {
        let children = tree.children(id).to_vec();
        for child in children {
            flatten_node(tree, child, false);
        }
        return;
    }

    let text = collapse(tree, id);
    let node = &mut tree[id];
    node.tag = Tag::Text;
    node.text = text;
    node.href = None;
    node.children.clear();
}

/// Render the subtree at `id` to text, children first.
fn collapse(tree: &Tree, id: NodeId) -> Text {
    let node = &tree[id];
    if node.is_text() {
        return node.text.clone();
    }

    let mut inner = Text::new();
    for &child in tree.children(id) {
        inner.append(collapse(tree, child));
    }

    match node.tag {
        Tag::Br => Text::line_break(),
        Tag::Em | Tag::I => inner.enclosed("/", "/"),
        Tag::Strong | Tag::B => inner.enclosed("*", "*"),
        Tag::Code if !node.is_preformatted => inner.enclosed("`", "`"),
        Tag::A => link_text(inner, node.href.as_deref()),
        _ => inner,
    }
}

/// Decide how a link shows up in plain text.
fn link_text(inner: Text, href: Option<&str>) -> Text {
    let Some(href) = href.filter(|h| !h.is_empty()) else {
        return inner;
    };

    let visible = inner.to_plain();
    if visible == href {
        return Text::from(href);
    }

    // HN shortens long link labels to `prefix...`; show the whole URL instead.
    if let Some(prefix) = visible.strip_suffix("...") {
        if href.starts_with(prefix) {
            return Text::from(href);
        }
    }

    let mut out = inner;
    out.push_str(" ");
    out.push_str(href);
    out
}
