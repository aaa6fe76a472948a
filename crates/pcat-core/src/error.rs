//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout the catalog validator. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Propagation Policy
//!
//! - `ParseError` is fatal for one document only. The run orchestrator
//!   downgrades it to an Error finding and continues.
//! - `DuplicateKeyError` aborts the run: a catalog whose key invariant is
//!   violated cannot be indexed.
//! - Every variant carries the offending path and a one-line reason.

use thiserror::Error;

use crate::category::Category;

/// Top-level error type for the catalog validator.
#[derive(Error, Debug)]
pub enum PcatError {
    /// A document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Two documents claim the same catalog key.
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyError),

    /// The catalog root does not exist or is not a directory.
    #[error("catalog root not found: {path}")]
    RootNotFound {
        /// Path that was given as the root.
        path: String,
    },

    /// The configuration file could not be read or is invalid.
    #[error("invalid configuration in '{path}': {reason}")]
    Config {
        /// Path to the configuration file.
        path: String,
        /// Reason the configuration was rejected.
        reason: String,
    },

    /// A category label did not name any known category.
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A document that cannot be turned into a `PatternDocument`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The document has no content besides whitespace.
    #[error("{path}: document is empty")]
    Empty {
        /// Root-relative path of the document.
        path: String,
    },

    /// No level-1 heading was found outside fenced code blocks.
    #[error("{path}: no top-level heading found")]
    NoTopLevelHeading {
        /// Root-relative path of the document.
        path: String,
    },
}

impl ParseError {
    /// The path of the document that failed to parse.
    pub fn path(&self) -> &str {
        match self {
            Self::Empty { path } | Self::NoTopLevelHeading { path } => path,
        }
    }

    /// The one-line reason, without the path.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "document is empty",
            Self::NoTopLevelHeading { .. } => "no top-level heading found",
        }
    }
}

/// Two documents share a `(category, title)` key.
///
/// `second_path` is the later document in path order, which makes the
/// report reproducible regardless of how the documents were discovered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("duplicate catalog key ({category}, {title:?}): {first_path} and {second_path}")]
pub struct DuplicateKeyError {
    /// Category half of the colliding key.
    pub category: Category,
    /// Title half of the colliding key.
    pub title: String,
    /// Path of the document already in the catalog.
    pub first_path: String,
    /// Path of the document whose insertion collided.
    pub second_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_display_names_both_paths() {
        let err = DuplicateKeyError {
            category: Category::Creational,
            title: "Builder".to_string(),
            first_path: "Creational/Builder.md".to_string(),
            second_path: "Creational/Builder2.md".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Creational/Builder.md"));
        assert!(msg.contains("Creational/Builder2.md"));
        assert!(msg.contains("\"Builder\""));
    }

    #[test]
    fn test_parse_error_path() {
        let err = ParseError::NoTopLevelHeading {
            path: "Structural/Adapter.md".to_string(),
        };
        assert_eq!(err.path(), "Structural/Adapter.md");
        assert!(err.to_string().contains("no top-level heading"));
    }

    #[test]
    fn test_pcat_error_from_parse_error() {
        let err: PcatError = ParseError::Empty {
            path: "README.md".to_string(),
        }
        .into();
        assert!(matches!(err, PcatError::Parse(_)));
    }
}
