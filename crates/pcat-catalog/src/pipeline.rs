//! # Validation Run
//!
//! Drives one run over a catalog directory:
//!
//! 1. discover the Markdown files (sorted),
//! 2. read and parse them in parallel,
//! 3. build the catalog sequentially in path order,
//! 4. resolve cross-references and apply the consistency rules,
//! 5. emit the navigation index.
//!
//! ## Partial Results
//!
//! A document that cannot be read or parsed, and a directory entry the walk
//! cannot read, becomes an Error finding and the run continues without it.
//! Links to such a file are reported with that cause. Only a duplicate
//! catalog key aborts the run, because a catalog with colliding keys cannot
//! be indexed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rayon::prelude::*;

use pcat_core::{Finding, FindingCode, PatternDocument, PcatError, ValidationReport};

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::consistency::check_catalog;
use crate::discovery::{find_markdown_files, relative_path};
use crate::index::{emit_index, NavigationIndex};
use crate::links::{resolve_links, LinkResolution};
use crate::parser::parse_document;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct CatalogRun {
    /// The catalog of every document that parsed.
    pub catalog: Catalog,
    /// Navigation index of the catalog.
    pub index: NavigationIndex,
    /// Cross-references that were checked.
    pub links: LinkResolution,
    /// All findings, normalized.
    pub report: ValidationReport,
    /// Number of Markdown files discovered.
    pub files_scanned: usize,
}

impl CatalogRun {
    /// True if the run should exit non-zero.
    pub fn is_failure(&self, strict: bool) -> bool {
        self.report.is_failure(strict)
    }
}

/// Validate the catalog rooted at `root`.
///
/// # Errors
///
/// Returns [`PcatError::RootNotFound`] if `root` is not a directory and
/// [`PcatError::DuplicateKey`] if two documents share a catalog key.
pub fn validate_tree(root: &Path, config: &CatalogConfig) -> Result<CatalogRun, PcatError> {
    if !root.is_dir() {
        return Err(PcatError::RootNotFound {
            path: root.display().to_string(),
        });
    }

    let discovery = find_markdown_files(root, &config.exclude);
    let files = discovery.files;
    tracing::info!(
        root = %root.display(),
        files = files.len(),
        failures = discovery.failures.len(),
        "discovered documents"
    );

    let mut report = ValidationReport::new();
    let mut unparsed = BTreeSet::new();
    for failure in discovery.failures {
        let rel = relative_path(root, &failure.path);
        report.push(Finding::error(FindingCode::ReadFailure, &rel, failure.reason));
        unparsed.insert(rel);
    }

    let loaded: Vec<Result<(PatternDocument, String), Finding>> = files
        .par_iter()
        .map(|path| load_document(root, path))
        .collect();

    let mut documents = Vec::with_capacity(loaded.len());
    let mut texts = BTreeMap::new();
    for outcome in loaded {
        match outcome {
            Ok((doc, text)) => {
                texts.insert(doc.path.clone(), text);
                documents.push(doc);
            }
            Err(finding) => {
                tracing::warn!(path = %finding.path, reason = %finding.message, "skipping document");
                unparsed.insert(finding.path.clone());
                report.push(finding);
            }
        }
    }

    let catalog = Catalog::build(documents)?;

    let links = resolve_links(&catalog, &texts, &unparsed);
    report.extend(links.unresolved.iter().map(|u| u.to_finding()));
    report.extend(check_catalog(&catalog, config));
    report.normalize();

    let index = emit_index(&catalog);

    tracing::info!(
        documents = catalog.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation run complete"
    );

    Ok(CatalogRun {
        catalog,
        index,
        links,
        report,
        files_scanned: files.len(),
    })
}

/// Read and parse one file. Failures are returned as findings.
fn load_document(root: &Path, path: &Path) -> Result<(PatternDocument, String), Finding> {
    let rel = relative_path(root, path);
    let text = std::fs::read_to_string(path).map_err(|e| {
        Finding::error(FindingCode::ReadFailure, &rel, format!("cannot read file: {e}"))
    })?;
    let doc = parse_document(&rel, &text)
        .map_err(|e| Finding::error(FindingCode::ParseFailure, &rel, e.reason()))?;
    Ok((doc, text))
}
