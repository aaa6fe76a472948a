//! # Document Discovery
//!
//! Finds the Markdown files of a catalog. Hidden entries and configured
//! directory names are skipped; the result is sorted so that nothing
//! downstream depends on filesystem iteration order.
//!
//! Symbolic links to files are followed; symbolic links to directories are
//! not descended into. Entries that cannot be read, and `.md` links that do
//! not point at a file, are returned as failures for the caller to report.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// An entry the walk could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFailure {
    /// Path of the entry, or of the root if the walk could not name it.
    pub path: PathBuf,
    /// One-line reason.
    pub reason: String,
}

/// Result of walking a catalog root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Markdown files, sorted by path.
    pub files: Vec<PathBuf>,
    /// Unusable entries, sorted by path.
    pub failures: Vec<DiscoveryFailure>,
}

/// Recursively find `*.md` files under `root`.
///
/// Entries whose name starts with `.` and directories named in `exclude`
/// are not descended into.
pub fn find_markdown_files(root: &Path, exclude: &[String]) -> Discovery {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if name.starts_with('.') {
                return false;
            }
            !(e.file_type().is_dir() && exclude.iter().any(|x| x.as_str() == name.as_ref()))
        });

    let mut discovery = Discovery::default();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read directory entry");
                let path = e.path().unwrap_or(root).to_path_buf();
                let reason = match e.io_error() {
                    Some(io) => format!("cannot read directory entry: {io}"),
                    None => format!("cannot read directory entry: {e}"),
                };
                discovery.failures.push(DiscoveryFailure { path, reason });
                continue;
            }
        };
        if !is_markdown(&entry) {
            continue;
        }
        if entry.file_type().is_file() {
            discovery.files.push(entry.into_path());
        } else if entry.path_is_symlink() {
            if entry.path().is_file() {
                tracing::debug!(path = %entry.path().display(), "following symbolic link");
                discovery.files.push(entry.into_path());
            } else {
                tracing::warn!(path = %entry.path().display(), "broken symbolic link");
                discovery.failures.push(DiscoveryFailure {
                    path: entry.into_path(),
                    reason: "symbolic link does not point to a file".to_string(),
                });
            }
        }
    }

    discovery.files.sort();
    discovery.failures.sort_by(|a, b| a.path.cmp(&b.path));
    discovery
}

fn is_markdown(entry: &DirEntry) -> bool {
    entry
        .path()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// The `/`-separated path of `path` relative to `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
