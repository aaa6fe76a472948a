//! # pcat-cli: Command-Line Interface
//!
//! Provides the `pcat` command-line interface over `pcat-catalog`.
//!
//! ## Subcommands
//!
//! - `pcat validate <ROOT>`: build the catalog rooted at `ROOT`, check it,
//!   and print the navigation index, the findings and a summary line.
//!
//! ```bash
//! pcat validate ./patterns
//! pcat -v validate ./patterns --strict --format json
//! pcat validate ./patterns --config ci/pcat.yaml
//! ```
//!
//! ## Exit Status
//!
//! `0` when the run has no Error findings (and no Warnings under
//! `--strict`), `1` otherwise. Operational failures also exit `1` after
//! logging a one-line message to stderr.

pub mod validate;
