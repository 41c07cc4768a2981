//! Error types for the thread2text library.
//!
//! Rendering itself never fails: malformed markup degrades to a flatter
//! tree instead of an error. [`RenderError`] only covers the edges that
//! touch the outside world (reading input, writing output, decoding item
//! JSON) and configuration validation.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the thread2text library.
#[derive(Debug, Error)]
pub enum RenderError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input file.
    #[error("Failed to read input '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Item errors ───────────────────────────────────────────────────────
    /// The item JSON could not be decoded.
    #[error("Invalid item JSON: {detail}")]
    InvalidItem { detail: String },
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::InvalidItem {
            detail: e.to_string(),
        }
    }
}
