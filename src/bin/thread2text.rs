//! CLI binary for thread2text.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RenderConfig` and prints the resulting lines.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use thread2text::{
    classify_line, read_input, url_spans, write_text_atomic, LineKind, Message, RenderConfig,
    RenderMode, Renderer, DEFAULT_RAW_WIDTH, DEFAULT_WIDTH,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render a comment body (stdout)
  thread2text comment.html

  # Narrow terminal
  thread2text -w 50 comment.html

  # Read from stdin
  curl -s https://example.org/comment.html | thread2text

  # A whole Hacker News thread from the Algolia items API
  curl -s https://hn.algolia.com/api/v1/items/1 | thread2text --item --color | less -R

  # Show the HTML source instead of rendering it
  thread2text --raw comment.html

  # Lines as a JSON array
  thread2text --json comment.html > lines.json

ENVIRONMENT VARIABLES:
  THREAD2TEXT_WIDTH   Column width for rendered text (default 70)
  THREAD2TEXT_RAW     Show raw HTML source (true/false)
  RUST_LOG            Log filter, e.g. thread2text=debug
"#;

/// Render discussion-thread HTML as wrapped plain text.
#[derive(Parser, Debug)]
#[command(
    name = "thread2text",
    version,
    about = "Render discussion-thread HTML as wrapped plain text",
    long_about = "Render Hacker News / Lobsters story and comment HTML as fixed-width plain \
text: quotes keep their '>' prefixes when wrapped, code blocks are fenced with '|', list \
items get hanging indents and links are shown in full.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML file path (or item JSON with --item); `-` or absent reads stdin.
    input: Option<PathBuf>,

    /// Write text to this file instead of stdout.
    #[arg(short, long, env = "THREAD2TEXT_OUTPUT")]
    output: Option<PathBuf>,

    /// Column width for rendered text.
    #[arg(short, long, env = "THREAD2TEXT_WIDTH", default_value_t = DEFAULT_WIDTH,
          value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    width: usize,

    /// Show the HTML source instead of rendering it.
    #[arg(long, env = "THREAD2TEXT_RAW")]
    raw: bool,

    /// Wrap width for --raw.
    #[arg(long, env = "THREAD2TEXT_RAW_WIDTH", default_value_t = DEFAULT_RAW_WIDTH,
          value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    raw_width: usize,

    /// Treat INPUT as a Hacker News item JSON and render the whole thread.
    #[arg(long)]
    item: bool,

    /// Output the lines as a JSON array instead of text.
    #[arg(long)]
    json: bool,

    /// Colour quotes, code, headers and links with ANSI escapes.
    /// Ignored unless stdout is a terminal.
    #[arg(long, env = "THREAD2TEXT_COLOR")]
    color: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "THREAD2TEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "THREAD2TEXT_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let renderer = Renderer::new(build_config(&cli)?);

    let input = read_input(cli.input.as_deref()).context("Failed to read input")?;

    // ── Render ───────────────────────────────────────────────────────────
    let lines = if cli.item {
        let thread = Message::thread_from_json(&input).context("Failed to parse item")?;
        tracing::debug!(messages = thread.len(), "loaded thread");
        thread_lines(&thread, &renderer)
    } else {
        renderer.lines(&input)
    };

    // ── Output ───────────────────────────────────────────────────────────
    let text = if cli.json {
        let mut json = serde_json::to_string_pretty(&lines).context("Failed to serialise lines")?;
        json.push('\n');
        json
    } else {
        let colour = use_colour(cli.color, cli.output.is_some(), io::stdout().is_terminal());
        let mut text = lines
            .iter()
            .map(|line| if colour { colorize(line) } else { line.clone() })
            .collect::<Vec<_>>()
            .join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    };

    if let Some(ref output_path) = cli.output {
        let bytes = write_text_atomic(output_path, &text).context("Failed to write output")?;
        if !cli.quiet {
            eprintln!(
                "{}  {} lines  {}  →  {}",
                green("✔"),
                lines.len(),
                dim(&format!("{bytes} bytes")),
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Map CLI args to `RenderConfig`.
fn build_config(cli: &Cli) -> Result<RenderConfig> {
    let mode = if cli.raw {
        RenderMode::Raw
    } else {
        RenderMode::Rendered
    };

    RenderConfig::builder()
        .width(cli.width)
        .raw_width(cli.raw_width)
        .mode(mode)
        .build()
        .context("Invalid configuration")
}

/// Every message's lines, with a blank line between messages.
fn thread_lines(thread: &[Message], renderer: &Renderer) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, message) in thread.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(message.lines(renderer));
    }
    lines
}

/// Escapes go to a terminal only: never into `-o` files or pipes.
fn use_colour(requested: bool, to_file: bool, stdout_is_tty: bool) -> bool {
    requested && !to_file && stdout_is_tty
}

fn colorize(line: &str) -> String {
    match classify_line(line) {
        LineKind::ContentLocation | LineKind::Date | LineKind::Filler => dim(line),
        LineKind::From | LineKind::Subject => bold(line),
        LineKind::NestedQuote => dim(line),
        LineKind::Quote => cyan(line),
        LineKind::Code => green(line),
        LineKind::Plain => highlight_urls(line),
    }
}

fn highlight_urls(line: &str) -> String {
    let spans = url_spans(line);
    if spans.is_empty() {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + spans.len() * 10);
    let mut last = 0;
    for span in spans {
        out.push_str(&line[last..span.start]);
        out.push_str(&cyan(&line[span.clone()]));
        last = span.end;
    }
    out.push_str(&line[last..]);
    out
}
