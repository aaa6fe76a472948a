//! # Catalog Builder
//!
//! The catalog is the sole owner of every parsed document in a run. It is
//! keyed by `(category, title)`; keys are unique.
//!
//! ## Insertion Order
//!
//! Documents are inserted in ascending path order whatever order they
//! arrive in. The catalog content is therefore independent of discovery
//! order, and when two documents collide the one reported as the duplicate
//! is always the later path.

use std::collections::BTreeMap;

use pcat_core::{CatalogKey, Category, DuplicateKeyError, PatternDocument};

/// All parsed documents of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    documents: BTreeMap<CatalogKey, PatternDocument>,
    by_path: BTreeMap<String, CatalogKey>,
}

impl Catalog {
    /// Build a catalog from parsed documents.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] naming the colliding key, the path
    /// already in the catalog, and the path whose insertion collided.
    pub fn build(
        documents: impl IntoIterator<Item = PatternDocument>,
    ) -> Result<Self, DuplicateKeyError> {
        let mut ordered: Vec<PatternDocument> = documents.into_iter().collect();
        ordered.sort_by(|a, b| a.path.cmp(&b.path));

        let mut catalog = Self::default();
        for doc in ordered {
            catalog.insert(doc)?;
        }

        tracing::info!(documents = catalog.len(), "built catalog");
        Ok(catalog)
    }

    fn insert(&mut self, doc: PatternDocument) -> Result<(), DuplicateKeyError> {
        let key = doc.key();
        if let Some(existing) = self.documents.get(&key) {
            return Err(DuplicateKeyError {
                category: key.category,
                title: key.title,
                first_path: existing.path.clone(),
                second_path: doc.path,
            });
        }
        self.by_path.insert(doc.path.clone(), key.clone());
        self.documents.insert(key, doc);
        Ok(())
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the catalog holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by key.
    pub fn get(&self, key: &CatalogKey) -> Option<&PatternDocument> {
        self.documents.get(key)
    }

    /// Look up a document by its root-relative path.
    pub fn get_by_path(&self, path: &str) -> Option<&PatternDocument> {
        self.by_path.get(path).and_then(|key| self.documents.get(key))
    }

    /// True if a document with this root-relative path is in the catalog.
    pub fn contains_path(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// All documents in key order (category, then title).
    pub fn documents(&self) -> impl Iterator<Item = &PatternDocument> {
        self.documents.values()
    }

    /// Documents of one category, in title order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &PatternDocument> {
        self.documents
            .iter()
            .filter(move |(key, _)| key.category == category)
            .map(|(_, doc)| doc)
    }

    /// Categories that hold at least one document, in navigation order.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.documents.keys().map(|k| k.category).collect();
        categories.dedup();
        categories
    }
}
