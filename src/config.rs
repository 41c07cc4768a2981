//! Configuration types for rendering message bodies.
//!
//! All rendering behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`]. The free function [`crate::render`] covers
//! the common case of "HTML in, text out at N columns"; the config is for
//! callers that also want raw mode or per-line sanitizing, such as a pager.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};

/// Default column width for rendered mode.
pub const DEFAULT_WIDTH: usize = 70;

/// Default column width for raw mode.
pub const DEFAULT_RAW_WIDTH: usize = 120;

/// Configuration for turning a message body into pager lines.
///
/// # Example
/// ```rust
/// use thread2text::{RenderConfig, RenderMode};
///
/// let config = RenderConfig::builder()
///     .width(60)
///     .mode(RenderMode::Raw)
///     .build()
///     .unwrap();
/// assert_eq!(config.width, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Column width used in [`RenderMode::Rendered`]. Default: 70.
    ///
    /// Code blocks and numbered reference lines may still exceed it.
    pub width: usize,

    /// Rendered text or the raw HTML source. Default: rendered.
    pub mode: RenderMode,

    /// Column width used in [`RenderMode::Raw`]. Default: 120.
    pub raw_width: usize,

    /// Remove NUL characters from every produced line. Default: true.
    pub sanitize_lines: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            mode: RenderMode::default(),
            raw_width: DEFAULT_RAW_WIDTH,
            sanitize_lines: true,
        }
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }

    /// Width that applies to the configured mode.
    pub fn effective_width(&self) -> usize {
        match self.mode {
            RenderMode::Rendered => self.width,
            RenderMode::Raw => self.raw_width,
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn width(mut self, width: usize) -> Self {
        self.config.width = width;
        self
    }

    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn raw_width(mut self, width: usize) -> Self {
        self.config.raw_width = width;
        self
    }

    pub fn sanitize_lines(mut self, v: bool) -> Self {
        self.config.sanitize_lines = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, RenderError> {
        let c = &self.config;
        if c.width == 0 {
            return Err(RenderError::InvalidConfig(
                "width must be at least 1".into(),
            ));
        }
        if c.raw_width == 0 {
            return Err(RenderError::InvalidConfig(
                "raw width must be at least 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How a message body is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Interpret the HTML: quotes, lists, code blocks, links. (default)
    #[default]
    Rendered,
    /// Show the HTML source with only a few entities unescaped.
    Raw,
}
