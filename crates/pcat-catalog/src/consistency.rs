//! # Consistency Checker
//!
//! Applies the catalog's invariants and yields findings. The checker never
//! fails; every violation becomes an Error or Warning.
//!
//! ## Rules
//!
//! | Code | Severity | Rule |
//! |------|----------|------|
//! | `empty-title` | Error | the top-level heading has text |
//! | `category-mismatch` | Error | directory and declared label name the same known category |
//! | `category-casing` | Warning | directory and declared label use canonical casing |
//! | `missing-section` | Error | every required section is present |
//! | `section-order` | Error | required sections appear in the configured order |
//! | `language-coverage` | Warning | a document covers every language its siblings use |
//! | `unspecified-language` | Warning | every code block declares a language |
//!
//! Section and language rules skip documents of exempt categories.

use std::collections::{BTreeMap, BTreeSet};

use pcat_core::{Category, Finding, FindingCode, PatternDocument};

use crate::catalog::Catalog;
use crate::config::CatalogConfig;

/// Run every rule over the catalog.
pub fn check_catalog(catalog: &Catalog, config: &CatalogConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for doc in catalog.documents() {
        check_title(doc, &mut findings);
        check_category(doc, &mut findings);
        if !config.is_exempt(doc.category) {
            check_sections(doc, &config.required_sections, &mut findings);
            if config.warn_unspecified_language {
                check_unspecified_languages(doc, &mut findings);
            }
        }
    }

    if config.check_language_coverage {
        check_language_coverage(catalog, config, &mut findings);
    }

    tracing::info!(findings = findings.len(), "checked catalog consistency");
    findings
}

fn check_title(doc: &PatternDocument, findings: &mut Vec<Finding>) {
    if doc.title.trim().is_empty() {
        findings.push(Finding::error(
            FindingCode::EmptyTitle,
            &doc.path,
            "top-level heading has no title",
        ));
    }
}

fn check_category(doc: &PatternDocument, findings: &mut Vec<Finding>) {
    if let Some(dir) = &doc.directory_label {
        match Category::from_label(dir) {
            None => findings.push(Finding::error(
                FindingCode::CategoryMismatch,
                &doc.path,
                format!("directory '{dir}' is not a category directory"),
            )),
            Some(category) if !category.is_canonical_label(dir) => {
                findings.push(Finding::warning(
                    FindingCode::CategoryCasing,
                    &doc.path,
                    format!("directory '{dir}' should be spelled '{category}'"),
                ));
            }
            Some(_) => {}
        }
    }

    if let Some(declared) = &doc.declared_label {
        match Category::from_label(declared) {
            None => findings.push(Finding::error(
                FindingCode::CategoryMismatch,
                &doc.path,
                format!("declared category '{declared}' is not a known category"),
            )),
            Some(category) if category != doc.category => findings.push(Finding::error(
                FindingCode::CategoryMismatch,
                &doc.path,
                format!(
                    "declared category {category} does not match directory category {}",
                    doc.category
                ),
            )),
            Some(category) if !category.is_canonical_label(declared) => {
                findings.push(Finding::warning(
                    FindingCode::CategoryCasing,
                    &doc.path,
                    format!("declared category '{declared}' should be spelled '{category}'"),
                ));
            }
            Some(_) => {}
        }
    }
}

fn check_sections(doc: &PatternDocument, required: &[String], findings: &mut Vec<Finding>) {
    let mut positions = Vec::with_capacity(required.len());
    for name in required {
        match doc.section_position(name) {
            Some(pos) => positions.push((name, pos)),
            None => findings.push(Finding::error(
                FindingCode::MissingSection,
                &doc.path,
                format!("missing section {name}"),
            )),
        }
    }

    if positions.len() != required.len() {
        return;
    }
    for pair in positions.windows(2) {
        let (before, before_pos) = pair[0];
        let (after, after_pos) = pair[1];
        if after_pos < before_pos {
            findings.push(Finding::error(
                FindingCode::SectionOrder,
                &doc.path,
                format!("section {after} appears before {before}"),
            ));
        }
    }
}

fn check_unspecified_languages(doc: &PatternDocument, findings: &mut Vec<Finding>) {
    let count = doc.code_samples.iter().filter(|s| !s.is_specified()).count();
    if count > 0 {
        findings.push(Finding::warning(
            FindingCode::UnspecifiedLanguage,
            &doc.path,
            format!("{count} code block(s) without a language tag"),
        ));
    }
}

/// Sibling documents of a category should show code samples in the same
/// set of languages. Each document missing a language that some sibling
/// uses gets one Warning listing what it lacks.
fn check_language_coverage(catalog: &Catalog, config: &CatalogConfig, findings: &mut Vec<Finding>) {
    for category in catalog.categories() {
        if category == Category::Meta || config.is_exempt(category) {
            continue;
        }
        let siblings: Vec<&PatternDocument> = catalog.in_category(category).collect();
        if siblings.len() < 2 {
            continue;
        }

        let languages: BTreeMap<&str, BTreeSet<&str>> = siblings
            .iter()
            .map(|d| (d.path.as_str(), d.languages()))
            .collect();
        let union: BTreeSet<&str> = languages.values().flatten().copied().collect();

        for (path, present) in &languages {
            let missing: Vec<&str> = union.difference(present).copied().collect();
            if !missing.is_empty() {
                findings.push(Finding::warning(
                    FindingCode::LanguageCoverage,
                    *path,
                    format!(
                        "no code samples in {} (used by other {category} documents)",
                        missing.join(", ")
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use pcat_core::Severity;

    const FULL: &str = "# Builder\n## Definition\n## Structure\n## Pros & Cons\n";

    fn check(docs: &[(&str, &str)]) -> Vec<Finding> {
        let parsed = docs
            .iter()
            .map(|(path, text)| parse_document(path, text).unwrap());
        let catalog = Catalog::build(parsed).unwrap();
        check_catalog(&catalog, &CatalogConfig::default())
    }

    fn messages(findings: &[Finding]) -> Vec<(Severity, &str)> {
        findings
            .iter()
            .map(|f| (f.severity, f.message.as_str()))
            .collect()
    }

    #[test]
    fn test_complete_document_is_clean() {
        assert!(check(&[("Creational/Builder.md", FULL)]).is_empty());
    }

    #[test]
    fn test_only_definition_reports_missing_structure() {
        let findings = check(&[("Creational/Builder.md", "# Builder\n## Definition\n")]);
        assert_eq!(
            messages(&findings),
            vec![
                (Severity::Error, "missing section Structure"),
                (Severity::Error, "missing section Pros & Cons"),
            ]
        );
        assert!(findings.iter().all(|f| f.code == FindingCode::MissingSection));
    }

    #[test]
    fn test_sections_out_of_order() {
        let findings = check(&[(
            "Creational/Builder.md",
            "# Builder\n## Structure\n## Definition\n## Pros & Cons\n",
        )]);
        assert_eq!(
            messages(&findings),
            vec![(Severity::Error, "section Structure appears before Definition")]
        );
    }

    #[test]
    fn test_meta_documents_are_exempt_from_sections() {
        assert!(check(&[("README.md", "# Design Patterns\n## Table of Contents\n")]).is_empty());
    }

    #[test]
    fn test_empty_title() {
        let findings = check(&[("Creational/Builder.md", "#\n## Definition\n## Structure\n## Pros & Cons\n")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::EmptyTitle);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_directory_casing_is_a_warning() {
        let findings = check(&[("creational/Builder.md", FULL)]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::CategoryCasing);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_declared_category_mismatch() {
        let text = "# Adapter\nCategory: Creational\n## Definition\n## Structure\n## Pros & Cons\n";
        let findings = check(&[("Structural/Adapter.md", text)]);
        assert_eq!(
            messages(&findings),
            vec![(
                Severity::Error,
                "declared category Creational does not match directory category Structural"
            )]
        );
    }

    #[test]
    fn test_declared_category_casing() {
        let text = "# Adapter\nCategory: structural\n## Definition\n## Structure\n## Pros & Cons\n";
        let findings = check(&[("Structural/Adapter.md", text)]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::CategoryCasing);
    }

    #[test]
    fn test_unknown_directory_is_mismatch() {
        let findings = check(&[("Patterns/Builder.md", "# Builder\n")]);
        assert_eq!(
            messages(&findings),
            vec![(Severity::Error, "directory 'Patterns' is not a category directory")]
        );
    }

    #[test]
    fn test_language_coverage_warns_on_omission() {
        let builder = "# Builder\n## Definition\n## Structure\n```java\nx\n```\n```python\ny\n```\n## Pros & Cons\n";
        let prototype = "# Prototype\n## Definition\n## Structure\n```java\nx\n```\n## Pros & Cons\n";
        let findings = check(&[
            ("Creational/Builder.md", builder),
            ("Creational/Prototype.md", prototype),
        ]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "Creational/Prototype.md");
        assert_eq!(findings[0].code, FindingCode::LanguageCoverage);
        assert_eq!(
            findings[0].message,
            "no code samples in python (used by other Creational documents)"
        );
    }

    #[test]
    fn test_unspecified_language_warning() {
        let text = "# Builder\n## Definition\n## Structure\n```\nx\n```\n## Pros & Cons\n";
        let findings = check(&[("Creational/Builder.md", text)]);
        assert_eq!(
            messages(&findings),
            vec![(Severity::Warning, "1 code block(s) without a language tag")]
        );
    }

    #[test]
    fn test_configured_sections() {
        let catalog = Catalog::build(vec![parse_document(
            "Creational/Builder.md",
            "# Builder\n## Intent\n",
        )
        .unwrap()])
        .unwrap();
        let config = CatalogConfig {
            required_sections: vec!["Intent".to_string()],
            ..CatalogConfig::default()
        };
        assert!(check_catalog(&catalog, &config).is_empty());
    }
}
