//! Pager line classification.
//!
//! The renderer's output is plain text, but a pager still wants to colour
//! quotes, code and headers differently. These helpers recover that from
//! the text conventions the renderer produces.

use std::ops::Range;

/// What a rendered line represents, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    ContentLocation,
    Date,
    From,
    Subject,
    /// `>>` or `> >`: a quote inside a quote.
    NestedQuote,
    Quote,
    /// Two-space indented code.
    Code,
    /// `~` padding shown past the end of a message.
    Filler,
    Plain,
}

/// Classify one pager line.
pub fn classify_line(line: &str) -> LineKind {
    if line.starts_with("Content-Location: ") {
        LineKind::ContentLocation
    } else if line.starts_with("Date: ") {
        LineKind::Date
    } else if line.starts_with("From: ") {
        LineKind::From
    } else if line.starts_with("Subject: ") {
        LineKind::Subject
    } else if line.starts_with(">>") || line.starts_with("> >") {
        LineKind::NestedQuote
    } else if line.starts_with('>') {
        LineKind::Quote
    } else if line.starts_with("  ") {
        LineKind::Code
    } else if line == "~" {
        LineKind::Filler
    } else {
        LineKind::Plain
    }
}

/// Byte ranges of the space-separated words that look like URLs.
pub fn url_spans(line: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for word in line.split(' ') {
        if word.starts_with("http://") || word.starts_with("https://") {
            spans.push(offset..offset + word.len());
        }
        offset += word.len() + 1;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        assert_eq!(classify_line("Content-Location: x"), LineKind::ContentLocation);
        assert_eq!(classify_line("Date: 2024-01-01 00:00"), LineKind::Date);
        assert_eq!(classify_line("From: pg"), LineKind::From);
        assert_eq!(classify_line("Subject: hi"), LineKind::Subject);
    }

    #[test]
    fn test_quotes() {
        assert_eq!(classify_line(">> deep"), LineKind::NestedQuote);
        assert_eq!(classify_line("> > deep"), LineKind::NestedQuote);
        assert_eq!(classify_line("> shallow"), LineKind::Quote);
        assert_eq!(classify_line(">shallow"), LineKind::Quote);
    }

    #[test]
    fn test_code_filler_plain() {
        assert_eq!(classify_line("  let x = 1;"), LineKind::Code);
        assert_eq!(classify_line("~"), LineKind::Filler);
        assert_eq!(classify_line("~ not filler"), LineKind::Plain);
        assert_eq!(classify_line(""), LineKind::Plain);
        assert_eq!(classify_line("| code block"), LineKind::Plain);
    }

    #[test]
    fn test_url_spans() {
        let line = "see https://a.org/x and http://b.org ok";
        let spans = url_spans(line);
        assert_eq!(spans.len(), 2);
        assert_eq!(&line[spans[0].clone()], "https://a.org/x");
        assert_eq!(&line[spans[1].clone()], "http://b.org");
        assert!(url_spans("no links here").is_empty());
    }
}
