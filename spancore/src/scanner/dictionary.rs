//! Dictionary Index: known wiki/glossary titles
//!
//! Case-insensitive title lookup. Entries are read-only snapshots supplied by
//! the host; two entries whose titles lowercase to the same key collapse to
//! the first one seen.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Types
// =============================================================================

/// A known reference term (wiki article, glossary entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: String,
    pub title: String,
    /// Ranking signal (view count). Only the relevance ranker reads it.
    #[serde(default)]
    pub popularity: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl DictionaryEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            popularity: 0,
            tags: Vec::new(),
            category: None,
        }
    }

    pub fn with_popularity(mut self, popularity: u64) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Lookup key
    pub fn key(&self) -> String {
        self.title.to_lowercase()
    }

    /// URL slug: "Golden Retriever (Dog)" -> "golden-retriever-dog"
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        let mut pending_dash = false;

        for c in self.title.to_lowercase().chars() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            } else {
                pending_dash = true;
            }
        }

        slug
    }
}

// =============================================================================
// DictionaryIndex
// =============================================================================

/// Immutable title index, built once per dictionary snapshot
#[derive(Debug, Clone, Default)]
pub struct DictionaryIndex {
    /// Deduplicated entries in first-seen order
    entries: Vec<DictionaryEntry>,
    by_title: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl DictionaryIndex {
    /// Build from a snapshot. Never fails; empty input gives an empty index.
    pub fn build(entries: impl IntoIterator<Item = DictionaryEntry>) -> Self {
        let mut index = Self::default();
        let mut collisions = 0usize;

        for entry in entries {
            // An empty title can never produce a span
            if entry.title.trim().is_empty() {
                continue;
            }

            let key = entry.key();
            if index.by_title.contains_key(&key) {
                collisions += 1;
                continue;
            }

            let slot = index.entries.len();
            index.by_title.insert(key, slot);
            index.by_id.entry(entry.id.clone()).or_insert(slot);
            index.entries.push(entry);
        }

        tracing::debug!(
            entries = index.entries.len(),
            collisions,
            "dictionary index built"
        );

        index
    }

    /// Lookup by lowercase title
    pub fn lookup(&self, lowercase_title: &str) -> Option<&DictionaryEntry> {
        self.by_title
            .get(lowercase_title)
            .map(|&slot| &self.entries[slot])
    }

    pub fn get_by_id(&self, id: &str) -> Option<&DictionaryEntry> {
        self.by_id.get(id).map(|&slot| &self.entries[slot])
    }

    /// Longest title first (by char count); ties keep original order
    pub fn entries_by_length_desc(&self) -> Vec<&DictionaryEntry> {
        let mut ordered: Vec<&DictionaryEntry> = self.entries.iter().collect();
        ordered.sort_by(|a, b| b.title.chars().count().cmp(&a.title.chars().count()));
        ordered
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<DictionaryEntry> for DictionaryIndex {
    fn from_iter<I: IntoIterator<Item = DictionaryEntry>>(iter: I) -> Self {
        Self::build(iter)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index() {
        let index = DictionaryIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.lookup("anything").is_none());
        assert!(index.entries_by_length_desc().is_empty());
    }

    #[test]
    fn test_lookup_is_case_insensitive_key() {
        let index = DictionaryIndex::build(vec![DictionaryEntry::new("w1", "Golden Retriever")]);

        assert_eq!(index.lookup("golden retriever").unwrap().id, "w1");
        assert!(index.lookup("Golden Retriever").is_none(), "lookup expects a lowercase key");
    }

    #[test]
    fn test_duplicate_titles_first_seen_wins() {
        let index = DictionaryIndex::build(vec![
            DictionaryEntry::new("w1", "Beagle"),
            DictionaryEntry::new("w2", "BEAGLE"),
            DictionaryEntry::new("w3", "beagle"),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("beagle").unwrap().id, "w1");
        assert!(index.get_by_id("w2").is_none());
    }

    #[test]
    fn test_entries_by_length_desc_stable() {
        let index = DictionaryIndex::build(vec![
            DictionaryEntry::new("a", "Dog"),
            DictionaryEntry::new("b", "Dog Training"),
            DictionaryEntry::new("c", "Cat"),
            DictionaryEntry::new("d", "Puppy Mills"),
        ]);

        let ids: Vec<&str> = index
            .entries_by_length_desc()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_blank_titles_ignored() {
        let index = DictionaryIndex::build(vec![
            DictionaryEntry::new("blank", "   "),
            DictionaryEntry::new("w1", "Vet"),
        ]);
        assert_eq!(index.len(), 1);
        assert!(index.get_by_id("blank").is_none());
    }

    #[test]
    fn test_slug() {
        assert_eq!(DictionaryEntry::new("w", "Golden Retriever (Dog)").slug(), "golden-retriever-dog");
        assert_eq!(DictionaryEntry::new("w", "  --Cat's Claw--  ").slug(), "cat-s-claw");
    }

    #[test]
    fn test_entry_deserializes_with_defaults() {
        let entry: DictionaryEntry =
            serde_json::from_str(r#"{"id": "w1", "title": "Beagle"}"#).unwrap();
        assert_eq!(entry.popularity, 0);
        assert!(entry.tags.is_empty());
        assert!(entry.category.is_none());
    }
}
