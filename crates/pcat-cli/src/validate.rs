//! # Validate Subcommand
//!
//! Runs [`validate_tree`] over a catalog directory and renders the result.
//!
//! Output goes to stdout in three parts: the navigation index, the findings
//! (one per line), and a summary line. With `--format json` the same parts
//! are emitted as a single JSON object. Logs never go to stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use pcat_catalog::{validate_tree, CatalogConfig, CatalogRun, NavigationIndex};
use pcat_core::Finding;

/// Arguments for the `pcat validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Root directory of the pattern catalog.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Configuration file. Defaults to `pcat.yaml` under ROOT, if present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Rendering of the run result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure. Operational
/// failures (missing root, invalid configuration, duplicate catalog key)
/// are returned as errors.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let config = load_config(args)?;
    let strict = args.strict || config.strict;

    let run = validate_root(&args.root, &config)?;

    let output = render(&run, args.format, strict)?;
    print!("{output}");

    if run.is_failure(strict) {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Resolve the configuration: `--config` if given, else `pcat.yaml` under
/// the root, else the defaults.
pub fn load_config(args: &ValidateArgs) -> Result<CatalogConfig> {
    let config = match &args.config {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => CatalogConfig::discover(&args.root).with_context(|| {
            format!("failed to load configuration under {}", args.root.display())
        })?,
    };
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Render a run in the requested format.
pub fn render(run: &CatalogRun, format: OutputFormat, strict: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(run, strict)),
        OutputFormat::Json => render_json(run, strict),
    }
}

/// Counts printed after the findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub documents: usize,
    pub references: usize,
    pub errors: usize,
    pub warnings: usize,
    pub strict: bool,
    pub passed: bool,
}

impl Summary {
    pub fn of(run: &CatalogRun, strict: bool) -> Self {
        Self {
            documents: run.catalog.len(),
            references: run.links.references.len(),
            errors: run.report.error_count(),
            warnings: run.report.warning_count(),
            strict,
            passed: !run.is_failure(strict),
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    index: &'a NavigationIndex,
    index_digest: String,
    findings: &'a [Finding],
    summary: Summary,
}

fn render_text(run: &CatalogRun, strict: bool) -> String {
    let mut out = run.index.render_text();
    if !run.report.is_empty() {
        out.push('\n');
        out.push_str(&format!("{}\n", run.report));
    }
    let summary = Summary::of(run, strict);
    out.push('\n');
    out.push_str(&format!(
        "{}: {} document(s), {} reference(s), {} error(s), {} warning(s){} (index {})\n",
        if summary.passed { "PASS" } else { "FAIL" },
        summary.documents,
        summary.references,
        summary.errors,
        summary.warnings,
        if strict { ", strict" } else { "" },
        run.index.digest(),
    ));
    out
}

fn render_json(run: &CatalogRun, strict: bool) -> Result<String> {
    let output = JsonOutput {
        index: &run.index,
        index_digest: run.index.digest().to_string(),
        findings: run.report.findings(),
        summary: Summary::of(run, strict),
    };
    let mut json = serde_json::to_string_pretty(&output).context("failed to serialize output")?;
    json.push('\n');
    Ok(json)
}

/// Run the pipeline, attaching the root to any error.
pub fn validate_root(root: &Path, config: &CatalogConfig) -> Result<CatalogRun> {
    validate_tree(root, config)
        .with_context(|| format!("failed to validate catalog at {}", root.display()))
}
