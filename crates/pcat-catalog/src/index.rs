//! # Index Emitter
//!
//! Serializes a validated catalog into the navigation index: categories in
//! navigation order, each listing its documents alphabetically by title.
//!
//! ## Determinism
//!
//! The index is a function of catalog content only. Titles are ordered
//! case-insensitively, ties broken by exact title then path, so two runs
//! over the same documents render byte-identical text and JSON.
//!
//! Text rendering:
//!
//! ```text
//! Creational
//!   Builder  Creational/Builder.md
//!   Prototype  Creational/Prototype.md
//! Structural
//!   Adapter  Structural/Adapter.md
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pcat_core::{Category, ContentDigest};

use crate::catalog::Catalog;

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Document title.
    pub title: String,
    /// Root-relative document path.
    pub path: String,
}

/// Ordered entries per category. Categories without documents are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIndex {
    /// Entries per category, in navigation order.
    pub categories: BTreeMap<Category, Vec<IndexEntry>>,
}

/// Build the navigation index of a catalog.
pub fn emit_index(catalog: &Catalog) -> NavigationIndex {
    let mut categories: BTreeMap<Category, Vec<IndexEntry>> = BTreeMap::new();
    for doc in catalog.documents() {
        categories.entry(doc.category).or_default().push(IndexEntry {
            title: doc.title.clone(),
            path: doc.path.clone(),
        });
    }
    for entries in categories.values_mut() {
        entries.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.path.cmp(&b.path))
        });
    }

    let index = NavigationIndex { categories };
    tracing::info!(
        categories = index.categories.len(),
        entries = index.len(),
        "emitted navigation index"
    );
    index
}

impl NavigationIndex {
    /// Total number of entries across categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// True if no category has entries.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Entries of one category, empty if it has none.
    pub fn entries(&self, category: Category) -> &[IndexEntry] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Line-oriented rendering; every line ends with `\n`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (category, entries) in &self.categories {
            out.push_str(&format!("{category}\n"));
            for entry in entries {
                out.push_str(&format!("  {}  {}\n", entry.title, entry.path));
            }
        }
        out
    }

    /// Pretty-printed JSON rendering.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// SHA-256 of the text rendering.
    pub fn digest(&self) -> ContentDigest {
        ContentDigest::sha256(self.render_text().as_bytes())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::catalog::tests::doc;
    use pcat_core::PatternDocument;
    use proptest::prelude::*;

    fn category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::all().to_vec())
    }

    proptest! {
        /// Input order never changes the rendering.
        #[test]
        fn emission_ignores_input_order(
            keys in prop::collection::btree_set((category(), "[A-Za-z]{1,8}"), 0..16)
        ) {
            let docs: Vec<PatternDocument> = keys
                .iter()
                .enumerate()
                .map(|(i, (c, t))| doc(&format!("{c}/{i}.md"), *c, t))
                .collect();
            let mut reversed = docs.clone();
            reversed.reverse();

            let forward = emit_index(&Catalog::build(docs).unwrap());
            let backward = emit_index(&Catalog::build(reversed).unwrap());
            prop_assert_eq!(forward.render_text(), backward.render_text());
            prop_assert_eq!(forward.digest(), backward.digest());
            prop_assert_eq!(forward.len(), keys.len());

            for entries in forward.categories.values() {
                for pair in entries.windows(2) {
                    prop_assert!(pair[0].title.to_lowercase() <= pair[1].title.to_lowercase());
                }
            }
        }
    }
}
