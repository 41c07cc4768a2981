//! Rendering entry points.
//!
//! [`render`] is the whole engine behind one call: a pure function from an
//! HTML snippet to `\n`-joined text. [`Renderer`] wraps it with a
//! [`RenderConfig`] for pager-style callers that also need raw mode and
//! per-line sanitizing, and [`render_to_file`] writes the result atomically.

use crate::config::{RenderConfig, RenderMode, DEFAULT_WIDTH};
use crate::error::RenderError;
use crate::pipeline::{flatten, layout, normalize, parse, sanitize};
use crate::raw;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Render an HTML snippet to plain text at `width` columns.
///
/// Never fails: malformed markup produces an imperfect layout, not an
/// error. Lines are joined with `\n`; normal text stays within `width`,
/// while code blocks and numbered reference lines may exceed it.
///
/// # Example
/// ```rust
/// let text = thread2text::render("<p>Hello <i>world</i></p><ul><li>a</li><li>b</li></ul>", 70);
/// assert_eq!(text, "Hello /world/\n\n- a\n- b");
/// ```
pub fn render(html: &str, width: usize) -> String {
    let width = width.max(1);

    // ── Step 1: Sanitize ─────────────────────────────────────────────────
    let clean = sanitize::strip_control_chars(html);

    // ── Step 2: Build tree ───────────────────────────────────────────────
    let mut tree = parse::build_tree(&clean);
    debug!(nodes = tree.node_count(), "parsed tree");
    trace!(tree = %tree.outline(), "parsed");

    // ── Step 3: Flatten inline subtrees ──────────────────────────────────
    flatten::flatten(&mut tree);
    debug!(nodes = tree.node_count(), "flattened tree");

    // ── Step 4: Normalize text ───────────────────────────────────────────
    normalize::normalize(&mut tree);
    debug!(nodes = tree.node_count(), "normalized tree");
    trace!(tree = %tree.outline(), "normalized");
    if !tree.has_content() {
        return String::new();
    }

    // ── Step 5: Lay out blocks ───────────────────────────────────────────
    layout::render_tree(&tree, width)
}

/// [`render`] at the default width of 70 columns.
pub fn render_default(html: &str) -> String {
    render(html, DEFAULT_WIDTH)
}

/// Render and split into pager lines. An empty rendering has no lines.
pub fn render_lines(html: &str, width: usize) -> Vec<String> {
    split_lines(&render(html, width))
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(str::to_string).collect()
}

/// Remove NUL characters from each line.
pub fn sanitize_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| {
            if line.contains('\0') {
                line.replace('\0', "")
            } else {
                line
            }
        })
        .collect()
}

/// A configured renderer.
///
/// Holds no per-call state, so one instance can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Turn a message body into pager lines according to the config.
    pub fn lines(&self, body: &str) -> Vec<String> {
        self.sanitized(self.body_lines(body))
    }

    /// Body lines in the configured mode, before NUL removal.
    pub(crate) fn body_lines(&self, body: &str) -> Vec<String> {
        let width = self.config.effective_width();
        match self.config.mode {
            RenderMode::Rendered => render_lines(body, width),
            RenderMode::Raw => raw::raw_lines(body, width),
        }
    }

    /// Apply `sanitize_lines` when the config asks for it.
    pub(crate) fn sanitized(&self, lines: Vec<String>) -> Vec<String> {
        if self.config.sanitize_lines {
            sanitize_lines(lines)
        } else {
            lines
        }
    }

    /// Same as [`Renderer::lines`], joined with `\n`.
    pub fn render(&self, body: &str) -> String {
        self.lines(body).join("\n")
    }
}

/// Render `html` with `renderer` and write the text to `output_path`.
///
/// A trailing newline is added to non-empty output. Returns the number of
/// bytes written.
pub fn render_to_file(
    html: &str,
    output_path: impl AsRef<Path>,
    renderer: &Renderer,
) -> Result<usize, RenderError> {
    let mut text = renderer.render(html);
    if !text.is_empty() {
        text.push('\n');
    }
    write_text_atomic(output_path, &text)
}

/// Read an input document; `None` or `-` reads standard input.
pub fn read_input(path: Option<&Path>) -> Result<String, RenderError> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).map_err(|source| RenderError::InputReadFailed {
                path: p.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| RenderError::InputReadFailed {
                    path: PathBuf::from("-"),
                    source,
                })?;
            Ok(buf)
        }
    }
}

/// Write `text` to `path` atomically (temp file in the same directory +
/// rename) so readers never see a partial file.
pub fn write_text_atomic(path: impl AsRef<Path>, text: &str) -> Result<usize, RenderError> {
    let path = path.as_ref();
    let write_err = |source| RenderError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), bytes = text.len(), "wrote output");
    Ok(text.len())
}
