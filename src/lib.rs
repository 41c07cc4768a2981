//! # thread2text
//!
//! Render discussion-thread HTML (Hacker News / Lobsters story bodies and
//! comments) as fixed-width plain text for a terminal pager.
//!
//! ## Why this crate?
//!
//! Stripping tags from a comment loses the structure readers rely on:
//! quoted replies, code blocks, lists, and the links behind shortened
//! labels. This crate keeps that structure in a form that reads well on a
//! character grid: quotes get `>` prefixes that survive wrapping, code is
//! fenced with `|`, list items get hanging indents, and links are shown in
//! full.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML
//!  │
//!  ├─ 1. Sanitize   drop control characters (keep \n, \t)
//!  ├─ 2. Parse      permissive tokenizer → arena node tree
//!  ├─ 3. Flatten    inline subtrees → single text nodes (/em/, *b*, `code`, links)
//!  ├─ 4. Normalize  merge, trim and prune text nodes
//!  └─ 5. Layout     wrap paragraphs, indent blocks → String
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! let html = "<p>&gt; quoted</p><pre><code>fn main() {}</code></pre>";
//! assert_eq!(thread2text::render(html, 70), "> quoted\n\n| fn main() {}");
//! ```
//!
//! Malformed markup never causes an error; the worst case is a flatter
//! layout than the author intended.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `thread2text` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod classify;
pub mod config;
pub mod error;
pub mod message;
pub mod pipeline;
pub mod raw;
pub mod render;
pub mod tree;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use classify::{classify_line, url_spans, LineKind};
pub use config::{
    RenderConfig, RenderConfigBuilder, RenderMode, DEFAULT_RAW_WIDTH, DEFAULT_WIDTH,
};
pub use error::RenderError;
pub use message::{HnItem, Message};
pub use pipeline::wrap::text_wrap;
pub use raw::raw_lines;
pub use render::{
    read_input, render, render_default, render_lines, render_to_file, sanitize_lines,
    write_text_atomic, Renderer,
};
