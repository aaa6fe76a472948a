//! # Catalog Configuration
//!
//! Rules that vary between document collections, loaded from an optional
//! YAML file. Every field has a default, so an absent file and an empty
//! file both mean "the standard pattern catalog layout". Unknown keys are
//! rejected to catch typos.
//!
//! ```yaml
//! required_sections: [Definition, Structure, Pros & Cons]
//! exempt_categories: [Meta]
//! exclude: [target, node_modules, drafts]
//! strict: false
//! check_language_coverage: true
//! warn_unspecified_language: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use pcat_core::{Category, PcatError};

/// File name looked up at the catalog root when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pcat.yaml";

/// Validation rules for one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Sections every pattern document must contain, in this order.
    pub required_sections: Vec<String>,
    /// Categories whose documents skip the section and language rules.
    pub exempt_categories: Vec<Category>,
    /// Directory names never descended into. Hidden entries are always skipped.
    pub exclude: Vec<String>,
    /// Treat Warning findings as failures.
    pub strict: bool,
    /// Warn when a sibling document has code samples in a language this one lacks.
    pub check_language_coverage: bool,
    /// Warn on fenced code blocks without a language tag.
    pub warn_unspecified_language: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            required_sections: vec![
                "Definition".to_string(),
                "Structure".to_string(),
                "Pros & Cons".to_string(),
            ],
            exempt_categories: vec![Category::Meta],
            exclude: vec!["target".to_string(), "node_modules".to_string()],
            strict: false,
            check_language_coverage: true,
            warn_unspecified_language: true,
        }
    }
}

impl CatalogConfig {
    /// Parse a configuration from YAML text. `origin` names the source in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`PcatError::Config`] for malformed YAML or unknown keys.
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self, PcatError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| PcatError::Config {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PcatError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PcatError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| PcatError::Config {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        let config = Self::from_yaml_str(&yaml, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `pcat.yaml` from the catalog root if present, else the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PcatError::Config`] if the file exists but is invalid.
    pub fn discover(root: &Path) -> Result<Self, PcatError> {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// True if documents of `category` skip the section and language rules.
    pub fn is_exempt(&self, category: Category) -> bool {
        self.exempt_categories.contains(&category)
    }
}
