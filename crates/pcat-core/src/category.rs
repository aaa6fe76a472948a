//! # Pattern Category: Single Source of Truth
//!
//! Defines the `Category` enum shared by the parser, the catalog key, the
//! consistency rules, and the navigation index. Every `match` on `Category`
//! is exhaustive, so adding a category forces every consumer to handle it.
//!
//! ## Ordering
//!
//! The derived `Ord` is the navigation order: Creational, Structural,
//! Behavioral, then Meta. The index emitter relies on it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PcatError;

/// The Gang-of-Four pattern families, plus `Meta` for top-level documents
/// (table of contents, interview guide, cross-language comparison).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Object creation patterns (Builder, Factory Method, Prototype, ...).
    Creational,
    /// Composition patterns (Adapter, Bridge, Decorator, ...).
    Structural,
    /// Interaction and responsibility patterns (Observer, Strategy, ...).
    Behavioral,
    /// Documents that describe the collection rather than a single pattern.
    Meta,
}

impl Category {
    /// Returns all categories in navigation order.
    pub fn all() -> &'static [Category] {
        &[
            Self::Creational,
            Self::Structural,
            Self::Behavioral,
            Self::Meta,
        ]
    }

    /// Returns the canonical label, which is also the expected directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creational => "Creational",
            Self::Structural => "Structural",
            Self::Behavioral => "Behavioral",
            Self::Meta => "Meta",
        }
    }

    /// Match a directory name or declared label against the categories,
    /// ignoring case and surrounding whitespace.
    ///
    /// Use [`Category::is_canonical_label`] to find out whether the casing
    /// was exact.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }

    /// True if `label` spells this category with canonical casing.
    pub fn is_canonical_label(&self, label: &str) -> bool {
        label.trim() == self.as_str()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PcatError;

    /// Parse a category from its canonical label. Case-sensitive; use
    /// [`Category::from_label`] for lenient matching.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Creational" => Ok(Self::Creational),
            "Structural" => Ok(Self::Structural),
            "Behavioral" => Ok(Self::Behavioral),
            "Meta" => Ok(Self::Meta),
            other => Err(PcatError::UnknownCategory(other.to_string())),
        }
    }
}
