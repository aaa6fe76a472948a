//! # Pattern Documents
//!
//! The structured form of one Markdown file in the catalog. Produced by the
//! document parser, owned by the catalog from then on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Language recorded for a fenced code block that declares no language tag.
pub const UNSPECIFIED_LANGUAGE: &str = "unspecified";

/// An ATX heading with its renderer-generated anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading depth, 1 through 6.
    pub level: u8,
    /// Heading text with markers and closing hashes stripped.
    pub text: String,
    /// Anchor slug, unique within the document.
    pub slug: String,
    /// 1-based line number.
    pub line: usize,
}

/// One fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSample {
    /// Lowercased language tag, or [`UNSPECIFIED_LANGUAGE`].
    pub language: String,
    /// Byte length of the block body, fences excluded.
    pub byte_len: usize,
}

impl CodeSample {
    /// True if the block declared a language tag.
    pub fn is_specified(&self) -> bool {
        self.language != UNSPECIFIED_LANGUAGE
    }
}

/// The unique key of a document within the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CatalogKey {
    /// Category the document belongs to.
    pub category: Category,
    /// Document title.
    pub title: String,
}

impl std::fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.title)
    }
}

/// A parsed pattern (or meta) document.
///
/// Identity is the root-relative path, always `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDocument {
    /// Root-relative path, e.g. `Creational/Builder.md`.
    pub path: String,
    /// Text of the first level-1 heading.
    pub title: String,
    /// Category derived from the containing directory, or `Meta` at the root.
    pub category: Category,
    /// Raw name of the containing top-level directory, `None` at the root.
    pub directory_label: Option<String>,
    /// Raw value of a `Category:` line, if the document declares one.
    pub declared_label: Option<String>,
    /// All headings in document order.
    pub headings: Vec<Heading>,
    /// Fenced code blocks in document order.
    pub code_samples: Vec<CodeSample>,
}

impl PatternDocument {
    /// The catalog key of this document.
    pub fn key(&self) -> CatalogKey {
        CatalogKey {
            category: self.category,
            title: self.title.clone(),
        }
    }

    /// Texts of the level-2 and deeper headings, in order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.headings
            .iter()
            .filter(|h| h.level >= 2)
            .map(|h| h.text.as_str())
    }

    /// Position of the first section matching `name`, compared
    /// case-insensitively with a trailing colon ignored.
    pub fn section_position(&self, name: &str) -> Option<usize> {
        self.sections()
            .position(|s| section_name_matches(s, name))
    }

    /// True if some heading of this document produces `slug`.
    pub fn has_anchor(&self, slug: &str) -> bool {
        self.headings.iter().any(|h| h.slug == slug)
    }

    /// Declared code sample languages, without the unspecified marker.
    pub fn languages(&self) -> BTreeSet<&str> {
        self.code_samples
            .iter()
            .filter(|s| s.is_specified())
            .map(|s| s.language.as_str())
            .collect()
    }
}

fn section_name_matches(heading: &str, name: &str) -> bool {
    let heading = heading.trim().trim_end_matches(':').trim();
    heading.eq_ignore_ascii_case(name.trim())
}
