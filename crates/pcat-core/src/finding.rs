//! # Findings and the Validation Report
//!
//! A finding is one reported inconsistency. Findings never abort a run;
//! they accumulate in a [`ValidationReport`] that is created fresh for each
//! run and never persisted.
//!
//! ## Exit Status Contract
//!
//! A report fails when it contains any Error finding. In strict mode a
//! Warning fails it too.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a finding is.
///
/// Ordered so that `Error` sorts before `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Broken link, missing required section, unparseable document.
    Error,
    /// Suspicious but not wrong: casing, language coverage.
    Warning,
}

impl Severity {
    /// Uppercase label used in text output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Stable identifier of the rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCode {
    /// The file could not be read.
    ReadFailure,
    /// The document could not be parsed.
    ParseFailure,
    /// The top-level heading has no text.
    EmptyTitle,
    /// The declared category or directory does not name the right category.
    CategoryMismatch,
    /// The category only matches case-insensitively.
    CategoryCasing,
    /// A required section is absent.
    MissingSection,
    /// Required sections are present but out of order.
    SectionOrder,
    /// A link or anchor does not resolve.
    UnresolvedLink,
    /// A sibling document uses a language this one lacks.
    LanguageCoverage,
    /// A code block has no language tag.
    UnspecifiedLanguage,
}

impl FindingCode {
    /// Kebab-case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadFailure => "read-failure",
            Self::ParseFailure => "parse-failure",
            Self::EmptyTitle => "empty-title",
            Self::CategoryMismatch => "category-mismatch",
            Self::CategoryCasing => "category-casing",
            Self::MissingSection => "missing-section",
            Self::SectionOrder => "section-order",
            Self::UnresolvedLink => "unresolved-link",
            Self::LanguageCoverage => "language-coverage",
            Self::UnspecifiedLanguage => "unspecified-language",
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Error or Warning.
    pub severity: Severity,
    /// Rule that produced the finding.
    pub code: FindingCode,
    /// Root-relative path of the offending document.
    pub path: String,
    /// One-line human-readable reason.
    pub message: String,
}

impl Finding {
    /// Create an Error finding.
    pub fn error(code: FindingCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a Warning finding.
    pub fn warning(code: FindingCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} {}: {} [{}]",
            self.severity, self.path, self.message, self.code
        )
    }
}

/// All findings of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one finding.
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Returns the number of findings.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Returns true if there are no findings.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns a slice of all findings.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of Error findings.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of Warning findings.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// True if the run should exit non-zero.
    pub fn is_failure(&self, strict: bool) -> bool {
        self.error_count() > 0 || (strict && self.warning_count() > 0)
    }

    /// Sort findings by path, then severity, then message, and drop exact
    /// duplicates. Rendering depends only on the findings' content after this.
    pub fn normalize(&mut self) {
        self.findings.sort_by(|a, b| {
            (&a.path, a.severity, &a.message, a.code).cmp(&(&b.path, b.severity, &b.message, b.code))
        });
        self.findings.dedup();
    }

    /// Findings for one document path.
    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.path == path)
    }
}

impl Extend<Finding> for ValidationReport {
    fn extend<T: IntoIterator<Item = Finding>>(&mut self, iter: T) {
        self.findings.extend(iter);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, finding) in self.findings.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{finding}")?;
        }
        Ok(())
    }
}
