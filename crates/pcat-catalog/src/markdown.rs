//! # Markdown Line Scanner
//!
//! Classifies every line of a document as heading, prose, fence, or code.
//! The document parser and the link resolver both work from this scan, so
//! they agree on what is inside a fenced code block.
//!
//! Only the constructs the catalog needs are recognized: ATX headings
//! (`#` through `######`, at most three spaces of indentation, optional
//! closing `#` run) and fenced code blocks (three or more backticks or
//! tildes, closed by a run of the same marker at least as long). An
//! unclosed fence runs to the end of the document. A leading UTF-8 byte
//! order mark is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

/// Inline link or image: `[text](target "title")`.
pub(crate) static INLINE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(!?)\[([^\]]*)\]\(\s*<?([^)\s>]*)>?(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)"#)
        .expect("Invalid regex")
});

/// Classification of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// An ATX heading with its stripped text.
    Heading { level: u8, text: String },
    /// Any line outside a fenced block that is not a heading.
    Text(&'a str),
    /// Opening fence with its (trimmed) info string.
    FenceOpen { info: &'a str },
    /// A line inside a fenced block.
    Code(&'a str),
    /// Closing fence.
    FenceClose,
}

/// A classified line with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScannedLine<'a> {
    pub number: usize,
    pub line: Line<'a>,
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

/// Scan `text` into classified lines.
pub(crate) fn scan(text: &str) -> Vec<ScannedLine<'_>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = Vec::new();
    let mut open: Option<Fence> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = match open {
            Some(fence) if closes_fence(fence, raw) => {
                open = None;
                Line::FenceClose
            }
            Some(_) => Line::Code(raw),
            None => {
                if let Some((fence, info)) = opening_fence(raw) {
                    open = Some(fence);
                    Line::FenceOpen { info }
                } else if let Some((level, text)) = atx_heading(raw) {
                    Line::Heading { level, text }
                } else {
                    Line::Text(raw)
                }
            }
        };
        lines.push(ScannedLine {
            number: idx + 1,
            line,
        });
    }

    lines
}

/// The language named by a fence info string, lowercased.
///
/// Takes the first word and strips the `{.lang}` attribute syntax.
pub(crate) fn info_language(info: &str) -> Option<String> {
    let word = info.split_whitespace().next()?;
    let word = word.trim_matches(|c| c == '{' || c == '}' || c == '.');
    if word.is_empty() {
        None
    } else {
        Some(word.to_ascii_lowercase())
    }
}

/// Replace inline code spans with spaces so their content is not mistaken
/// for links. Byte offsets are preserved.
pub(crate) fn blank_code_spans(line: &str) -> String {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run = backtick_run(bytes, i);
        let mut j = i + run;
        let mut close = None;
        while j < bytes.len() {
            if bytes[j] == b'`' {
                let other = backtick_run(bytes, j);
                if other == run {
                    close = Some(j + other);
                    break;
                }
                j += other;
            } else {
                j += 1;
            }
        }
        match close {
            Some(end) => {
                spans.push(i..end);
                i = end;
            }
            None => i += run,
        }
    }

    let mut blanked = line.to_string();
    for span in spans {
        let width = span.len();
        blanked.replace_range(span, &" ".repeat(width));
    }
    blanked
}

/// Replace inline links and images with their text, as a renderer shows
/// them: `[Singleton](Creational/Singleton.md)` becomes `Singleton`.
pub(crate) fn strip_link_markup(text: &str) -> String {
    INLINE_LINK.replace_all(text, "$2").into_owned()
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|b| **b == b'`').count()
}

/// Strip up to three spaces of indentation. Four or more spaces (or a tab)
/// make an indented code line, which never opens a heading or fence.
fn strip_indent(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 || rest.starts_with('\t') {
        None
    } else {
        Some(rest)
    }
}

fn opening_fence(line: &str) -> Option<(Fence, &str)> {
    let rest = strip_indent(line)?;
    let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.chars().take_while(|c| *c == marker).count();
    if len < 3 {
        return None;
    }
    let info = rest[len..].trim();
    if marker == '`' && info.contains('`') {
        return None;
    }
    Some((Fence { marker, len }, info))
}

fn closes_fence(fence: Fence, line: &str) -> bool {
    let Some(rest) = strip_indent(line) else {
        return false;
    };
    let len = rest.chars().take_while(|c| *c == fence.marker).count();
    len >= fence.len && rest[len..].trim().is_empty()
}

fn atx_heading(line: &str) -> Option<(u8, String)> {
    let rest = strip_indent(line)?;
    let level = rest.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let after = &rest[level..];
    if !(after.is_empty() || after.starts_with(' ') || after.starts_with('\t')) {
        return None;
    }

    let mut text = after.trim();
    let without_closing = text.trim_end_matches('#');
    if without_closing.is_empty() {
        text = "";
    } else if without_closing.ends_with(' ') || without_closing.ends_with('\t') {
        text = without_closing.trim_end();
    }

    Some((level as u8, text.to_string()))
}
