//! # Heading Slugs
//!
//! Converts heading text to the anchor fragment a Markdown renderer
//! generates for it. The documents' table-of-contents entries and
//! "Back to Top" links are written against these anchors.
//!
//! ## Algorithm
//!
//! 1. Lowercase the text.
//! 2. Keep alphanumeric characters (any script), `-` and `_`.
//! 3. Turn each space into `-`.
//! 4. Drop everything else. Repeated hyphens are not collapsed, so
//!    `Pros & Cons` becomes `pros--cons`.
//!
//! Within one document, a slug that was already produced gets a `-1`,
//! `-2`, ... suffix on each repetition (see [`Slugger`]).

use std::collections::HashMap;

/// Slugify one heading text, without duplicate disambiguation.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if ch == '-' || ch == '_' {
            slug.push(ch);
        } else if ch == ' ' {
            slug.push('-');
        }
    }
    slug
}

/// Produces unique slugs for the headings of a single document.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    /// Create a slugger with no headings seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugify `text`, appending `-N` if the base slug was produced before.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_heading() {
        assert_eq!(slugify("Table of Contents"), "table-of-contents");
        assert_eq!(slugify("Definition"), "definition");
    }

    #[test]
    fn test_punctuation_is_dropped_without_collapsing() {
        assert_eq!(slugify("Pros & Cons"), "pros--cons");
        assert_eq!(slugify("What is a Singleton?"), "what-is-a-singleton");
        assert_eq!(slugify("Factory Method (Virtual Constructor)"), "factory-method-virtual-constructor");
    }

    #[test]
    fn test_inline_markup_is_dropped() {
        assert_eq!(slugify("**Structure**"), "structure");
        assert_eq!(slugify("`Clone()` in C++"), "clone-in-c");
    }

    #[test]
    fn test_hyphen_and_underscore_kept() {
        assert_eq!(slugify("Real-World Analogy"), "real-world-analogy");
        assert_eq!(slugify("snake_case"), "snake_case");
    }

    #[test]
    fn test_unicode_letters_kept() {
        assert_eq!(slugify("Übersicht"), "übersicht");
    }

    #[test]
    fn test_slugger_disambiguates_repeats() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Example"), "example");
        assert_eq!(slugger.slug("Example"), "example-1");
        assert_eq!(slugger.slug("Example"), "example-2");
        assert_eq!(slugger.slug("Other"), "other");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Slugs never contain whitespace or uppercase ASCII.
        #[test]
        fn slug_is_lowercase_without_whitespace(text in "\\PC{0,40}") {
            let slug = slugify(&text);
            prop_assert!(!slug.chars().any(char::is_whitespace));
            prop_assert!(!slug.chars().any(|c| c.is_ascii_uppercase()));
        }

        /// Slugifying is idempotent on its own output.
        #[test]
        fn slug_is_idempotent(text in "[A-Za-z0-9 &?_-]{0,40}") {
            let once = slugify(&text);
            prop_assert_eq!(slugify(&once), once);
        }
    }
}
