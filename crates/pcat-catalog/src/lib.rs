//! # pcat-catalog: Pattern Catalog Pipeline
//!
//! Parses a directory of design-pattern Markdown documents into a catalog,
//! checks it, and emits a navigation index.
//!
//! ## Pipeline
//!
//! - [`parser`]: one document's text into a `PatternDocument`.
//! - [`catalog`]: documents into a `Catalog` keyed by (category, title).
//! - [`links`]: table-of-contents, "Back to Top" and inline links checked
//!   against the catalog.
//! - [`consistency`]: section, category and language rules.
//! - [`index`]: the ordered navigation index.
//! - [`pipeline`]: [`validate_tree`] runs all of the above over a directory.
//!
//! ## Crate Policy
//!
//! - Depends only on `pcat-core` internally.
//! - Findings are data, not errors. Only a missing root and a duplicate
//!   catalog key fail a run.
//! - Output never depends on filesystem iteration order.

pub mod catalog;
pub mod config;
pub mod consistency;
pub mod discovery;
pub mod index;
pub mod links;
mod markdown;
pub mod parser;
pub mod pipeline;

pub use catalog::Catalog;
pub use config::{CatalogConfig, DEFAULT_CONFIG_FILE};
pub use consistency::check_catalog;
pub use discovery::{find_markdown_files, Discovery, DiscoveryFailure};
pub use index::{emit_index, IndexEntry, NavigationIndex};
pub use links::{
    extract_references, resolve_links, CrossReference, LinkResolution, ReferenceKind,
    UnresolvedReason, UnresolvedReference,
};
pub use parser::parse_document;
pub use pipeline::{validate_tree, CatalogRun};
