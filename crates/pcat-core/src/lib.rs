//! # pcat-core: Foundational Types for the Pattern Catalog
//!
//! Defines the types every other `pcat-*` crate shares: the pattern
//! `Category`, the parsed `PatternDocument`, findings and the
//! `ValidationReport`, the heading slug algorithm, content digests, and the
//! error hierarchy.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pcat-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Public data types derive `Debug`, `Clone`, and `Serialize`/`Deserialize`.

pub mod category;
pub mod digest;
pub mod document;
pub mod error;
pub mod finding;
pub mod slug;

// Re-export primary types for ergonomic imports.
pub use category::Category;
pub use digest::ContentDigest;
pub use document::{CatalogKey, CodeSample, Heading, PatternDocument, UNSPECIFIED_LANGUAGE};
pub use error::{DuplicateKeyError, ParseError, PcatError};
pub use finding::{Finding, FindingCode, Severity, ValidationReport};
pub use slug::{slugify, Slugger};
