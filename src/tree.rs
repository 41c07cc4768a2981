//! Arena-backed node tree shared by every pipeline stage.
//!
//! The tree is built fresh for each render call. Nodes are addressed by
//! [`NodeId`] (an index into the arena); every node stores its parent index
//! and an ordered list of child indices, so re-parenting during the
//! close-tag walk is O(1) and nothing needs reference counting.
//!
//! Stages that drop nodes (flattening, pruning) leave orphans behind in the
//! arena; [`Tree::compact`] copies the reachable nodes into a fresh arena so
//! each pass hands the next one a smaller node set.

use std::ops::{Index, IndexMut};

/// Index of a node inside its [`Tree`].
pub type NodeId = usize;

/// Every tag the renderer understands. Anything else is skipped by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    // ── Block tags ───────────────────────────────────────────────────────
    Root,
    P,
    Pre,
    Blockquote,
    Ul,
    Ol,
    Li,
    Hr,
    // ── Inline tags ──────────────────────────────────────────────────────
    Code,
    A,
    Em,
    I,
    Strong,
    B,
    Br,
    // ── Synthetic ────────────────────────────────────────────────────────
    Text,
}

impl Tag {
    /// Look up a tag by its (case-insensitive) HTML name.
    ///
    /// `root` and `text` are synthetic and never produced from markup.
    pub fn from_name(name: &str) -> Option<Tag> {
        let tag = match name.to_ascii_lowercase().as_str() {
            "p" => Tag::P,
            "pre" => Tag::Pre,
            "blockquote" => Tag::Blockquote,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "hr" => Tag::Hr,
            "code" => Tag::Code,
            "a" => Tag::A,
            "em" => Tag::Em,
            "i" => Tag::I,
            "strong" => Tag::Strong,
            "b" => Tag::B,
            "br" => Tag::Br,
            _ => return None,
        };
        Some(tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Root => "root",
            Tag::P => "p",
            Tag::Pre => "pre",
            Tag::Blockquote => "blockquote",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Hr => "hr",
            Tag::Code => "code",
            Tag::A => "a",
            Tag::Em => "em",
            Tag::I => "i",
            Tag::Strong => "strong",
            Tag::B => "b",
            Tag::Br => "br",
            Tag::Text => "text",
        }
    }

    /// Block tags start a new structural unit and survive flattening.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Tag::Root | Tag::P | Tag::Pre | Tag::Blockquote | Tag::Ul | Tag::Ol | Tag::Li | Tag::Hr
        )
    }

    /// Tags that never hold children and are closed by whatever follows them.
    pub fn is_auto_closing(self) -> bool {
        matches!(self, Tag::Hr | Tag::Br)
    }
}

/// One piece of text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Ordinary characters, subject to whitespace collapsing.
    Chars(String),
    /// A forced line break (`<br>`), never collapsed.
    Break,
}

/// Text content as a run of [`Fragment`]s.
///
/// Keeping forced breaks as their own variant means whitespace collapsing
/// can never confuse them with newlines that came from the markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    fragments: Vec<Fragment>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single forced line break.
    pub fn line_break() -> Self {
        Self {
            fragments: vec![Fragment::Break],
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| match f {
            Fragment::Chars(s) => s.is_empty(),
            Fragment::Break => false,
        })
    }

    pub fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        match self.fragments.last_mut() {
            Some(Fragment::Chars(last)) => last.push_str(s),
            _ => self.fragments.push(Fragment::Chars(s.to_string())),
        }
    }

    pub fn push_break(&mut self) {
        self.fragments.push(Fragment::Break);
    }

    /// Append `other`, joining neighbouring character runs.
    pub fn append(&mut self, other: Text) {
        for fragment in other.fragments {
            match fragment {
                Fragment::Chars(s) => self.push_str(&s),
                Fragment::Break => self.push_break(),
            }
        }
    }

    /// Surround the content with `open` and `close`.
    pub fn enclosed(self, open: &str, close: &str) -> Self {
        let mut out = Text::from(open);
        out.append(self);
        out.push_str(close);
        out
    }

    /// Flatten to a plain string, forced breaks becoming `\n`.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Chars(s) => out.push_str(s),
                Fragment::Break => out.push('\n'),
            }
        }
        out
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        let mut text = Text::new();
        text.push_str(s);
        text
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::from(s.as_str())
    }
}

/// A single tree node.
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: Tag,
    /// Link target; only meaningful on `a`.
    pub href: Option<String>,
    /// Content; only meaningful on `text`.
    pub text: Text,
    /// Created inside a `pre` (the `pre` node itself included).
    pub is_preformatted: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Distance from the root.
    pub depth: usize,
}

impl Node {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            href: None,
            text: Text::new(),
            is_preformatted: false,
            parent: None,
            children: Vec::new(),
            depth: 0,
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == Tag::Text
    }
}

/// The node arena. Index 0 is always the root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub const ROOT: NodeId = 0;

    /// A tree holding only the `root` node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Tag::Root)],
        }
    }

    /// Number of nodes in the arena (including orphans left by a pass).
    /// Never below 1: the root is always there.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has any children.
    pub fn has_content(&self) -> bool {
        !self.nodes[Self::ROOT].children.is_empty()
    }

    /// Create a new node with `tag` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, tag: Tag) -> NodeId {
        let id = self.nodes.len();
        let mut node = Node::new(tag);
        node.parent = Some(parent);
        node.depth = self.nodes[parent].depth + 1;
        node.is_preformatted = tag == Tag::Pre || self.nodes[parent].is_preformatted;
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Create a new `text` node carrying `text` as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: Text) -> NodeId {
        let id = self.append_child(parent, Tag::Text);
        self.nodes[id].text = text;
        id
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Number of nodes reachable from the root.
    pub fn reachable_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[id].children.iter().copied());
        }
        count
    }

    /// Rebuild the arena from the nodes reachable from the root, in
    /// document order, dropping orphans.
    pub fn compact(&mut self) {
        let mut fresh = Vec::with_capacity(self.reachable_count());
        let mut root = self.nodes[Self::ROOT].clone();
        root.children.clear();
        fresh.push(root);

        // (old id, new parent id)
        let mut stack: Vec<(NodeId, NodeId)> = self.nodes[Self::ROOT]
            .children
            .iter()
            .rev()
            .map(|&child| (child, Self::ROOT))
            .collect();

        while let Some((old, new_parent)) = stack.pop() {
            let new_id = fresh.len();
            let mut node = self.nodes[old].clone();
            node.parent = Some(new_parent);
            node.children.clear();
            fresh.push(node);
            fresh[new_parent].children.push(new_id);
            stack.extend(self.nodes[old].children.iter().rev().map(|&c| (c, new_id)));
        }

        self.nodes = fresh;
    }

    /// Concatenated text of every `text` node under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            if node.is_text() {
                out.push_str(&node.text.to_plain());
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Compact s-expression dump, handy in tests and `trace!` output.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_into(Self::ROOT, &mut out);
        out
    }

    fn outline_into(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        if node.is_text() {
            out.push_str(&format!("{:?}", node.text.to_plain()));
            return;
        }
        out.push('(');
        out.push_str(node.tag.name());
        for &child in &node.children {
            out.push(' ');
            self.outline_into(child, out);
        }
        out.push(')');
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_lookup_is_case_insensitive() {
        assert_eq!(Tag::from_name("BLOCKQUOTE"), Some(Tag::Blockquote));
        assert_eq!(Tag::from_name("div"), None);
        assert_eq!(Tag::from_name("root"), None);
        assert_eq!(Tag::from_name("text"), None);
    }

    #[test]
    fn test_block_and_auto_closing_sets() {
        assert!(Tag::Li.is_block());
        assert!(!Tag::A.is_block());
        assert!(Tag::Br.is_auto_closing());
        assert!(Tag::Hr.is_auto_closing());
        assert!(!Tag::P.is_auto_closing());
    }

    #[test]
    fn test_append_marks_preformatted_descendants() {
        let mut tree = Tree::new();
        let pre = tree.append_child(Tree::ROOT, Tag::Pre);
        let code = tree.append_child(pre, Tag::Code);
        let text = tree.append_text(code, Text::from("x"));
        let p = tree.append_child(Tree::ROOT, Tag::P);

        assert!(tree[pre].is_preformatted);
        assert!(tree[code].is_preformatted);
        assert!(tree[text].is_preformatted);
        assert!(!tree[p].is_preformatted);
        assert_eq!(tree[text].depth, 3);
    }

    #[test]
    fn test_text_joins_adjacent_chars() {
        let mut text = Text::from("a");
        text.push_str("b");
        text.push_break();
        text.push_str("c");
        assert_eq!(text.fragments().len(), 3);
        assert_eq!(text.to_plain(), "ab\nc");
        assert_eq!(text.enclosed("*", "*").to_plain(), "*ab\nc*");
    }

    #[test]
    fn test_break_only_text_is_not_empty() {
        assert!(Text::new().is_empty());
        assert!(!Text::line_break().is_empty());
    }

    #[test]
    fn test_fresh_tree_has_root_but_no_content() {
        let mut tree = Tree::new();
        assert_eq!(tree.node_count(), 1);
        assert!(!tree.has_content());
        tree.append_child(Tree::ROOT, Tag::Hr);
        assert!(tree.has_content());
    }

    #[test]
    fn test_compact_drops_orphans() {
        let mut tree = Tree::new();
        let p = tree.append_child(Tree::ROOT, Tag::P);
        tree.append_text(p, Text::from("kept"));
        let orphan = tree.append_child(p, Tag::B);
        tree.append_text(orphan, Text::from("dropped"));
        tree[p].children.retain(|&c| c != orphan);

        assert_eq!(tree.node_count(), 5);
        tree.compact();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.outline(), r#"(root (p "kept"))"#);
        assert_eq!(tree.parent(1), Some(Tree::ROOT));
    }
}
