//! # Link Resolver
//!
//! Extracts the cross-references of every document and checks them against
//! the catalog. Broken links are reported, never raised: a catalog with a
//! handful of stale links is still useful.
//!
//! ## What Is Checked
//!
//! - `[text](Other.md)` and `[text](../Structural/Adapter.md#structure)`:
//!   the target path, resolved against the source document's directory,
//!   must be a document in the catalog; the fragment, if any, must be a
//!   heading slug of that document.
//! - `[text](#definition)`: the fragment must be a heading slug of the
//!   source document. `#top` and a bare `#` always resolve to the top of
//!   the page.
//! - Link reference definitions (`[b]: Creational/Builder.md`) and links
//!   inside heading text are checked the same way.
//!
//! ## What Is Skipped
//!
//! Images, links inside fenced code or inline code spans, external links
//! (any URI scheme, or a `//` prefix), and relative links to files that are
//! not Markdown documents.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use pcat_core::{slugify, Finding, FindingCode};

use crate::catalog::Catalog;
use crate::markdown::{blank_code_spans, scan, strip_link_markup, Line, INLINE_LINK};

/// Link reference definition: `[label]: target "title"`.
static LINK_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}\[([^\]^][^\]]*)\]:\s*<?([^\s>]+)>?(?:\s|$)").expect("Invalid regex")
});

/// A leading URI scheme such as `https:` or `mailto:`.
static URI_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("Invalid regex"));

/// Where a reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// An entry under a "Table of Contents" (or "Contents") heading.
    TableOfContents,
    /// A "Back to Top" link.
    BackToTop,
    /// Any other relative link.
    Inline,
}

/// A relative link from one catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    /// Root-relative path of the source document.
    pub source: String,
    /// The link target as written.
    pub target: String,
    /// Link text.
    pub text: String,
    /// Where the link appears.
    pub kind: ReferenceKind,
    /// 1-based line number in the source document.
    pub line: usize,
}

/// Why a reference failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum UnresolvedReason {
    /// The link has an empty target.
    EmptyTarget,
    /// The target path climbs above the catalog root.
    EscapesRoot,
    /// The target file exists but could not be read or parsed, so it is
    /// not in the catalog.
    UnparsedDocument {
        /// Normalized root-relative path of the file.
        path: String,
    },
    /// No catalog document has the target path.
    MissingDocument {
        /// Normalized root-relative path that was looked up.
        path: String,
    },
    /// The document exists but has no heading with this slug.
    MissingAnchor {
        /// Root-relative path of the document that was searched.
        document: String,
        /// The anchor that was not found.
        anchor: String,
    },
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTarget => f.write_str("empty link target"),
            Self::EscapesRoot => f.write_str("path escapes the catalog root"),
            Self::UnparsedDocument { path } => {
                write!(f, "document at {path} could not be parsed")
            }
            Self::MissingDocument { path } => write!(f, "no document at {path}"),
            Self::MissingAnchor { document, anchor } => {
                write!(f, "no heading #{anchor} in {document}")
            }
        }
    }
}

/// A reference that does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    /// The offending reference.
    pub reference: CrossReference,
    /// Why it does not resolve.
    pub reason: UnresolvedReason,
}

impl UnresolvedReference {
    /// Convert into an Error finding against the source document.
    pub fn to_finding(&self) -> Finding {
        Finding::error(
            FindingCode::UnresolvedLink,
            self.reference.source.clone(),
            format!(
                "unresolved link '{}' (line {}): {}",
                self.reference.target, self.reference.line, self.reason
            ),
        )
    }
}

/// Result of resolving every reference in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkResolution {
    /// Every checked reference, in (source, line) order.
    pub references: Vec<CrossReference>,
    /// The subset that failed to resolve.
    pub unresolved: Vec<UnresolvedReference>,
}

/// Extract the checkable references of one document.
///
/// Inline links are taken from prose and heading lines, and link reference
/// definitions (`[label]: Target.md`) from prose lines. A "Table of
/// Contents" section runs until the next heading of the same or a higher
/// level.
pub fn extract_references(source: &str, text: &str) -> Vec<CrossReference> {
    let mut references = Vec::new();
    let mut contents_level: Option<u8> = None;

    for scanned in scan(text) {
        match scanned.line {
            Line::Heading { level, text } => {
                if contents_level.is_some_and(|l| level <= l) {
                    contents_level = None;
                }
                let slug = slugify(&strip_link_markup(&text));
                if slug == "table-of-contents" || slug == "contents" {
                    contents_level = Some(level);
                }
                let visible = blank_code_spans(&text);
                push_inline_links(
                    &mut references,
                    source,
                    &visible,
                    scanned.number,
                    contents_level.is_some(),
                );
            }
            Line::Text(raw) => {
                let visible = blank_code_spans(raw);
                push_inline_links(
                    &mut references,
                    source,
                    &visible,
                    scanned.number,
                    contents_level.is_some(),
                );
                if let Some(caps) = LINK_DEFINITION.captures(&visible) {
                    let target = caps[2].to_string();
                    if !is_external(&target) {
                        let label = caps[1].trim().to_string();
                        references.push(CrossReference {
                            source: source.to_string(),
                            target,
                            kind: classify(&label, contents_level.is_some()),
                            text: label,
                            line: scanned.number,
                        });
                    }
                }
            }
            Line::FenceOpen { .. } | Line::Code(_) | Line::FenceClose => {}
        }
    }

    references
}

fn push_inline_links(
    references: &mut Vec<CrossReference>,
    source: &str,
    line: &str,
    number: usize,
    in_contents: bool,
) {
    for caps in INLINE_LINK.captures_iter(line) {
        if !caps[1].is_empty() {
            continue; // image
        }
        let target = caps[3].to_string();
        if is_external(&target) {
            continue;
        }
        let link_text = caps[2].trim().to_string();
        references.push(CrossReference {
            source: source.to_string(),
            target,
            kind: classify(&link_text, in_contents),
            text: link_text,
            line: number,
        });
    }
}

fn classify(link_text: &str, in_contents: bool) -> ReferenceKind {
    if link_text.to_lowercase().contains("back to top") {
        ReferenceKind::BackToTop
    } else if in_contents {
        ReferenceKind::TableOfContents
    } else {
        ReferenceKind::Inline
    }
}

/// Resolve the references of every document in `texts` against `catalog`.
///
/// `texts` maps root-relative paths to raw document text. Documents are
/// visited in path order so the output is deterministic. `unparsed` holds
/// the paths of files that were discovered but left out of the catalog.
pub fn resolve_links(
    catalog: &Catalog,
    texts: &BTreeMap<String, String>,
    unparsed: &BTreeSet<String>,
) -> LinkResolution {
    let mut resolution = LinkResolution::default();

    for (source, text) in texts {
        for reference in extract_references(source, text) {
            if let Some(reason) = check_reference(catalog, unparsed, &reference) {
                tracing::debug!(
                    source = %reference.source,
                    target = %reference.target,
                    %reason,
                    "unresolved reference"
                );
                resolution.unresolved.push(UnresolvedReference {
                    reference: reference.clone(),
                    reason,
                });
            }
            resolution.references.push(reference);
        }
    }

    tracing::info!(
        references = resolution.references.len(),
        unresolved = resolution.unresolved.len(),
        "resolved cross-references"
    );
    resolution
}

/// Check one reference. Returns `None` when it resolves or is not a
/// document link.
fn check_reference(
    catalog: &Catalog,
    unparsed: &BTreeSet<String>,
    reference: &CrossReference,
) -> Option<UnresolvedReason> {
    let target = reference.target.as_str();
    if target.is_empty() {
        return Some(UnresolvedReason::EmptyTarget);
    }

    let (path_part, fragment) = match target.split_once('#') {
        Some((p, f)) => (p, Some(f)),
        None => (target, None),
    };
    let path_part = path_part.split('?').next().unwrap_or_default();

    let document = if path_part.is_empty() {
        reference.source.clone()
    } else {
        let decoded = percent_decode(path_part);
        if !decoded.to_ascii_lowercase().ends_with(".md") {
            return None;
        }
        let Some(resolved) = resolve_relative(&reference.source, &decoded) else {
            return Some(UnresolvedReason::EscapesRoot);
        };
        if unparsed.contains(&resolved) {
            return Some(UnresolvedReason::UnparsedDocument { path: resolved });
        }
        if !catalog.contains_path(&resolved) {
            return Some(UnresolvedReason::MissingDocument { path: resolved });
        }
        resolved
    };

    let anchor = match fragment {
        Some(f) => percent_decode(f).to_lowercase(),
        None => return None,
    };
    if anchor.is_empty() || anchor == "top" {
        return None;
    }

    let found = catalog
        .get_by_path(&document)
        .is_some_and(|doc| doc.has_anchor(&anchor));
    if found {
        None
    } else {
        Some(UnresolvedReason::MissingAnchor { document, anchor })
    }
}

fn is_external(target: &str) -> bool {
    target.starts_with("//") || URI_SCHEME.is_match(target)
}

/// Resolve `target` relative to the directory of `source` (or the root
/// when `target` starts with `/`). Returns `None` if the result would climb
/// above the root.
pub fn resolve_relative(source: &str, target: &str) -> Option<String> {
    let mut parts: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        let mut dir: Vec<&str> = source.split('/').collect();
        dir.pop();
        dir
    };

    for component in target.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    Some(parts.join("/"))
}

/// Decode `%XX` escapes. Malformed escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
