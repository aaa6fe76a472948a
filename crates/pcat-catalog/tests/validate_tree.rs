//! End-to-end runs of `validate_tree` over small catalogs on disk.

use std::path::Path;

use pcat_catalog::{validate_tree, CatalogConfig, ReferenceKind, UnresolvedReason};
use pcat_core::{Category, FindingCode, PcatError, Severity};

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}

fn pattern(title: &str) -> String {
    format!(
        "# {title}\n\
         [Back to Top](../README.md#top)\n\
         \n\
         ## Definition\n\
         A {title} does things.\n\
         \n\
         ## Structure\n\
         ```java\nclass {title} {{}}\n```\n\
         \n\
         ```python\nclass {title}: pass\n```\n\
         \n\
         ## Pros & Cons\n\
         See [Definition](#definition).\n"
    )
}

const README: &str = "# Design Patterns\n\
\n\
## Table of Contents\n\
- [Builder](Creational/Builder.md)\n\
- [Prototype](Creational/Prototype.md#pros--cons)\n\
- [Adapter](Structural/Adapter.md)\n";

fn sample_catalog(root: &Path) {
    write(root, "README.md", README);
    write(root, "Creational/Prototype.md", &pattern("Prototype"));
    write(root, "Creational/Builder.md", &pattern("Builder"));
    write(root, "Structural/Adapter.md", &pattern("Adapter"));
}

#[test]
fn clean_catalog_has_no_findings() {
    let dir = tempfile::tempdir().unwrap();
    sample_catalog(dir.path());

    let run = validate_tree(dir.path(), &CatalogConfig::default()).unwrap();
    assert!(run.report.is_empty(), "unexpected findings:\n{}", run.report);
    assert!(!run.is_failure(true));
    assert_eq!(run.files_scanned, 4);
    assert_eq!(run.catalog.len(), 4);

    let creational: Vec<&str> = run
        .index
        .entries(Category::Creational)
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(creational, vec!["Builder", "Prototype"]);
    assert_eq!(run.index.entries(Category::Structural).len(), 1);
    assert_eq!(run.index.categories.len(), 3);

    let toc = run
        .links
        .references
        .iter()
        .filter(|r| r.kind == ReferenceKind::TableOfContents)
        .count();
    let back = run
        .links
        .references
        .iter()
        .filter(|r| r.kind == ReferenceKind::BackToTop)
        .count();
    assert_eq!(toc, 3);
    assert_eq!(back, 3);
}

#[test]
fn missing_toc_target_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    sample_catalog(dir.path());
    write(
        dir.path(),
        "README.md",
        &format!("{README}- [No Such Pattern](Creational/NoSuchPattern.md)\n"),
    );

    let run = validate_tree(dir.path(), &CatalogConfig::default()).unwrap();
    assert_eq!(run.links.unresolved.len(), 1);
    let unresolved = &run.links.unresolved[0];
    assert_eq!(unresolved.reference.source, "README.md");
    assert_eq!(unresolved.reference.kind, ReferenceKind::TableOfContents);
    assert_eq!(
        unresolved.reason,
        UnresolvedReason::MissingDocument {
            path: "Creational/NoSuchPattern.md".to_string()
        }
    );

    let findings = run.report.findings();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, FindingCode::UnresolvedLink);
    assert_eq!(findings[0].severity, Severity::Error);
    assert!(findings[0].message.contains("Creational/NoSuchPattern.md"));
    assert!(run.is_failure(false));
}

#[test]
fn missing_anchor_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    sample_catalog(dir.path());
    write(
        dir.path(),
        "Structural/Adapter.md",
        &pattern("Adapter").replace("(#definition)", "(#intent)"),
    );

    let run = validate_tree(dir.path(), &CatalogConfig::default()).unwrap();
    assert_eq!(run.report.len(), 1);
    assert_eq!(
        run.links.unresolved[0].reason,
        UnresolvedReason::MissingAnchor {
            document: "Structural/Adapter.md".to_string(),
            anchor: "intent".to_string(),
        }
    );
}

#[test]
fn duplicate_key_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    sample_catalog(dir.path());
    write(dir.path(), "Creational/BuilderCopy.md", &pattern("Builder"));

    let err = validate_tree(dir.path(), &CatalogConfig::default()).unwrap_err();
    assert!(matches!(err, PcatError::DuplicateKey(_)));
    assert!(err.to_string().contains("Creational/BuilderCopy.md"));
}

#[test]
fn unreadable_document_does_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    sample_catalog(dir.path());
    write(dir.path(), "Behavioral/Empty.md", "");

    let run = validate_tree(dir.path(), &CatalogConfig::default()).unwrap();
    assert_eq!(run.catalog.len(), 4);
    let findings = run.report.findings();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, FindingCode::ParseFailure);
    assert_eq!(findings[0].path, "Behavioral/Empty.md");
}

#[test]
fn two_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    sample_catalog(dir.path());
    write(dir.path(), "Creational/Singleton.md", "# Singleton\n## Definition\n");

    let first = validate_tree(dir.path(), &CatalogConfig::default()).unwrap();
    let second = validate_tree(dir.path(), &CatalogConfig::default()).unwrap();
    assert_eq!(first.index.render_text(), second.index.render_text());
    assert_eq!(
        first.index.render_json().unwrap(),
        second.index.render_json().unwrap()
    );
    assert_eq!(first.report, second.report);
    assert!(first.report.error_count() > 0);
}

#[test]
fn excluded_directories_are_not_scanned() {
    let dir = tempfile::tempdir().unwrap();
    sample_catalog(dir.path());
    write(dir.path(), "drafts/Idea.md", "not a pattern\n");

    let config = CatalogConfig {
        exclude: vec!["drafts".to_string()],
        ..CatalogConfig::default()
    };
    let run = validate_tree(dir.path(), &config).unwrap();
    assert_eq!(run.files_scanned, 4);
    assert!(run.report.is_empty());
}
