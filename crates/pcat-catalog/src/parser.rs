//! # Document Parser
//!
//! Turns the text of one Markdown file into a [`PatternDocument`].
//!
//! The parser is a pure function of the path and the text: it performs no
//! I/O and shares no state, so documents can be parsed in parallel.
//!
//! ## Extracted Fields
//!
//! - **Title**: text of the first level-1 heading. A document without one
//!   is rejected with [`ParseError::NoTopLevelHeading`].
//! - **Category**: from the first path component (`Creational/Builder.md`);
//!   documents at the root are `Meta`. Unknown directories also map to
//!   `Meta`; the consistency checker reports them.
//! - **Declared label**: the value of a `Category: <label>` line (bold
//!   markers allowed) appearing before the first level-2 heading.
//! - **Headings**: every ATX heading outside fenced code, with its slug.
//!   Links in heading text are reduced to their text, as rendered.
//! - **Code samples**: every fenced block, with its language tag
//!   (or `"unspecified"`) and body length in bytes, line terminators
//!   included.

use pcat_core::{
    Category, CodeSample, Heading, ParseError, PatternDocument, Slugger, UNSPECIFIED_LANGUAGE,
};

use crate::markdown::{info_language, scan, strip_link_markup, Line};

/// Parse one document.
///
/// `path` is the root-relative, `/`-separated path of the document; it
/// determines the category and becomes the document's identity.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for a whitespace-only document and
/// [`ParseError::NoTopLevelHeading`] when no level-1 heading exists outside
/// fenced code blocks.
pub fn parse_document(path: &str, text: &str) -> Result<PatternDocument, ParseError> {
    if text.trim_start_matches('\u{feff}').trim().is_empty() {
        return Err(ParseError::Empty {
            path: path.to_string(),
        });
    }

    let mut slugger = Slugger::new();
    let mut headings = Vec::new();
    let mut code_samples = Vec::new();
    let mut declared_label = None;
    let mut seen_section = false;
    let mut open_sample: Option<CodeSample> = None;

    for scanned in scan(text) {
        match scanned.line {
            Line::Heading { level, text } => {
                if level >= 2 {
                    seen_section = true;
                }
                let text = strip_link_markup(&text);
                let slug = slugger.slug(&text);
                headings.push(Heading {
                    level,
                    text,
                    slug,
                    line: scanned.number,
                });
            }
            Line::Text(raw) => {
                if declared_label.is_none() && !seen_section {
                    declared_label = category_declaration(raw);
                }
            }
            Line::FenceOpen { info } => {
                open_sample = Some(CodeSample {
                    language: info_language(info)
                        .unwrap_or_else(|| UNSPECIFIED_LANGUAGE.to_string()),
                    byte_len: 0,
                });
            }
            Line::Code(raw) => {
                if let Some(sample) = open_sample.as_mut() {
                    sample.byte_len += raw.len() + 1;
                }
            }
            Line::FenceClose => {
                if let Some(sample) = open_sample.take() {
                    code_samples.push(sample);
                }
            }
        }
    }
    // Unclosed fence at end of document.
    if let Some(sample) = open_sample.take() {
        code_samples.push(sample);
    }

    let title = headings
        .iter()
        .find(|h| h.level == 1)
        .map(|h| h.text.clone())
        .ok_or_else(|| ParseError::NoTopLevelHeading {
            path: path.to_string(),
        })?;

    let directory_label = directory_label(path);
    let category = directory_label
        .as_deref()
        .and_then(Category::from_label)
        .unwrap_or(Category::Meta);

    tracing::debug!(
        path,
        title = %title,
        category = %category,
        headings = headings.len(),
        code_samples = code_samples.len(),
        "parsed document"
    );

    Ok(PatternDocument {
        path: path.to_string(),
        title,
        category,
        directory_label,
        declared_label,
        headings,
        code_samples,
    })
}

/// The first component of a root-relative path, if the document is not at
/// the root.
pub fn directory_label(path: &str) -> Option<String> {
    let (first, rest) = path.split_once('/')?;
    if first.is_empty() || rest.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// Recognize `Category: X`, `**Category:** X`, `> Category: X`, `- Category: X`.
fn category_declaration(line: &str) -> Option<String> {
    let stripped: String = line.chars().filter(|c| *c != '*' && *c != '_').collect();
    let stripped = stripped.trim_start_matches(['>', '-', ' ', '\t']);
    let keyword = stripped.get(..8)?;
    if !keyword.eq_ignore_ascii_case("category") {
        return None;
    }
    let value = stripped[8..].trim_start().strip_prefix(':')?;
    let value = value.trim().trim_end_matches('.').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
