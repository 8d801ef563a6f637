//! Word pairs and the insertion-ordered word bank.
//!
//! A `WordPair` carries the Malay form (`native`) and its English gloss. Its
//! `id` is derived from both forms lowercased, so the same pair typed with a
//! different capitalisation maps to the same bank entry and the same progress
//! counters.

use serde::{Deserialize, Serialize};

/// Joins the two lowercased forms into a word id.
pub const ID_SEPARATOR: &str = "__";

/// Derive the stable identity of a pair.
pub fn make_id(native: &str, gloss: &str) -> String {
    format!("{}{}{}", native.to_lowercase(), ID_SEPARATOR, gloss.to_lowercase())
}

/// One vocabulary item. Field names on disk follow the stored `ms`/`en` layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    #[serde(rename = "ms")]
    pub native: String,
    #[serde(rename = "en")]
    pub gloss: String,
    pub id: String,
}

impl WordPair {
    pub fn new(native: &str, gloss: &str) -> Self {
        Self {
            native: native.to_string(),
            gloss: gloss.to_string(),
            id: make_id(native, gloss),
        }
    }

    /// Text handed to the speech adapter: "makan. eat"
    pub fn spoken(&self) -> String {
        format!("{}. {}", self.native, self.gloss)
    }
}

/// Ordered set of unique pairs. Only `add` and `remove` mutate it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordBank {
    words: Vec<WordPair>,
}

impl WordBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank seeded from the built-in starter list.
    pub fn starter() -> Self {
        let mut bank = Self::new();
        for (native, gloss) in crate::DEFAULT_WORDS {
            bank.add(native, gloss);
        }
        bank
    }

    /// Append a pair. Returns false (and leaves the bank untouched) when either
    /// form is blank after trimming or the derived id is already present.
    pub fn add(&mut self, native: &str, gloss: &str) -> bool {
        let (native, gloss) = (native.trim(), gloss.trim());
        if native.is_empty() || gloss.is_empty() {
            return false;
        }
        let candidate = WordPair::new(native, gloss);
        if self.contains(&candidate.id) {
            return false;
        }
        self.words.push(candidate);
        true
    }

    /// Remove by id; false if nothing matched.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.words.len();
        self.words.retain(|w| w.id != id);
        self.words.len() != before
    }

    /// Entries whose native or gloss form contains `query`, ignoring case.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a WordPair> + use<'a> {
        let needle = query.to_lowercase();
        self.words.iter().filter(move |w| {
            w.native.to_lowercase().contains(&needle) || w.gloss.to_lowercase().contains(&needle)
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.words.iter().any(|w| w.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WordPair> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordPair> {
        self.words.iter()
    }

    pub fn as_slice(&self) -> &[WordPair] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> IntoIterator for &'a WordBank {
    type Item = &'a WordPair;
    type IntoIter = std::slice::Iter<'a, WordPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_id_lowercases_both_forms() {
        assert_eq!(make_id("Kucing", "CAT"), "kucing__cat");
    }

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let mut bank = WordBank::new();
        assert!(!bank.add("   ", "cat"));
        assert!(!bank.add("kucing", ""));
        assert!(bank.add("  kucing ", " cat"));
        let w = bank.get("kucing__cat").unwrap();
        assert_eq!(w.native, "kucing");
        assert_eq!(w.gloss, "cat");
    }

    #[test]
    fn test_add_is_idempotent_ignoring_case() {
        let mut once = WordBank::new();
        once.add("makan", "eat");
        let mut twice = once.clone();
        assert!(!twice.add("MAKAN", "Eat"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut bank = WordBank::new();
        bank.add("air", "water");
        assert!(!bank.remove("susu__milk"));
        assert_eq!(bank.len(), 1);
        assert!(bank.remove("air__water"));
        assert!(bank.is_empty());
    }

    #[test]
    fn test_search_matches_either_form_and_restarts() {
        let mut bank = WordBank::new();
        bank.add("kucing", "cat");
        bank.add("anjing", "dog");
        bank.add("ikan", "fish");
        let hits: Vec<_> = bank.search("ING").map(|w| w.native.as_str()).collect();
        assert_eq!(hits, vec!["kucing", "anjing"]);
        assert_eq!(bank.search("fish").count(), 1);
        assert_eq!(bank.search("").count(), 3);
        // search is read-only: the bank still holds everything in order
        let all: Vec<_> = bank.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(all, vec!["kucing__cat", "anjing__dog", "ikan__fish"]);
    }

    #[test]
    fn test_serializes_with_storage_field_names() {
        let w = WordPair::new("buku", "book");
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"ms":"buku","en":"book","id":"buku__book"}"#);
    }
}
