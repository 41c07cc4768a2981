//! Pipeline stages for HTML-to-text rendering.
//!
//! Each submodule implements exactly one transformation step and can be
//! tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! sanitize ──▶ parse ──▶ flatten ──▶ normalize ──▶ layout
//!  (&str)      (Tree)    (Tree)      (Tree)        (String)
//! ```
//!
//! 1. [`sanitize`]: drop control characters except `\n` and `\t`
//! 2. [`parse`]: permissive tokenizer and soup-style tree builder
//! 3. [`flatten`]: collapse inline subtrees into single text nodes
//! 4. [`normalize`]: merge, trim and prune text nodes
//! 5. [`layout`]: render blocks with indentation, using [`wrap`] for
//!    paragraph wrapping

pub mod flatten;
pub mod layout;
pub mod normalize;
pub mod parse;
pub mod sanitize;
pub mod wrap;
