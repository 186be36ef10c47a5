//! RelevanceRanker: "related articles" for a document
//!
//! Entries are admitted tier by tier, each id at most once:
//! 1. explicit relations, in the order given
//! 2. dictionary terms found in the body
//! 3. tag overlap, or a title containing one of the document's tags
//! 4. a few entries of a special category when the template hint asks for it
//!
//! Explicit relations always come first; everything else is ordered by
//! popularity (stable, so tier order breaks ties).

use std::collections::{HashMap, HashSet};
use wasm_bindgen::prelude::*;

use spancore::{DictionaryEntry, DictionaryIndex, Span, SpanKind};

use crate::config::RelevanceConfig;
use crate::types::{RankedEntry, RelevanceDocument, RelevanceTier};

// =============================================================================
// Main Ranker
// =============================================================================

/// Ranks catalog entries for a document
#[wasm_bindgen]
pub struct RelevanceRanker {
    config: RelevanceConfig,
    catalog: Vec<DictionaryEntry>,
    by_id: HashMap<String, usize>,
}

impl RelevanceRanker {
    /// Create a ranker over a catalog snapshot (first entry wins per id)
    pub fn new(config: RelevanceConfig, entries: Vec<DictionaryEntry>) -> Self {
        let mut catalog = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());

        for entry in entries {
            if by_id.contains_key(&entry.id) {
                continue;
            }
            by_id.insert(entry.id.clone(), catalog.len());
            catalog.push(entry);
        }

        Self { config, catalog, by_id }
    }

    /// Create with default configuration
    pub fn with_defaults(entries: Vec<DictionaryEntry>) -> Self {
        Self::new(RelevanceConfig::default(), entries)
    }

    /// Create over the entries of a dictionary index
    pub fn from_index(config: RelevanceConfig, index: &DictionaryIndex) -> Self {
        Self::new(config, index.entries().to_vec())
    }

    pub fn config(&self) -> &RelevanceConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    // =========================================================================
    // Ranking
    // =========================================================================

    /// Ranked related entries
    pub fn rank(&self, document: &RelevanceDocument, dictionary_spans: &[Span]) -> Vec<DictionaryEntry> {
        self.rank_explained(document, dictionary_spans)
            .into_iter()
            .map(|ranked| ranked.entry)
            .collect()
    }

    /// Ranked related entries with the tier that admitted each one
    pub fn rank_explained(&self, document: &RelevanceDocument, dictionary_spans: &[Span]) -> Vec<RankedEntry> {
        let mut admitted = Admitted::new(document.id.as_deref());

        // Tier 1: explicit relations
        for id in &document.explicit_related_ids {
            if let Some(&slot) = self.by_id.get(id) {
                admitted.push(slot, &self.catalog[slot], RelevanceTier::Explicit);
            }
        }

        // Tier 2: terms found in the body
        for span in dictionary_spans.iter().filter(|s| s.kind == SpanKind::DictionaryTerm) {
            if let Some(&slot) = self.by_id.get(&span.entity_id) {
                admitted.push(slot, &self.catalog[slot], RelevanceTier::BodyTerm);
            }
        }

        // Tier 3: tags
        let tags: Vec<String> = document
            .tags
            .iter()
            .map(|t| t.trim().trim_start_matches('#').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            for (slot, entry) in self.catalog.iter().enumerate() {
                if Self::matches_tags(entry, &tags) {
                    admitted.push(slot, entry, RelevanceTier::Tag);
                }
            }
        }

        // Tier 4: special category fill
        let special = document
            .category_hint
            .as_deref()
            .and_then(|hint| self.config.special_category(hint));
        if let Some(category) = special {
            let mut added = 0;
            for (slot, entry) in self.catalog.iter().enumerate() {
                if added >= self.config.special_category_limit {
                    break;
                }
                let in_category = entry
                    .category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category));
                if in_category && admitted.push(slot, entry, RelevanceTier::Category) {
                    added += 1;
                }
            }
        }

        let mut ranked = admitted.into_ranked();
        if let Some(limit) = self.config.max_results {
            ranked.truncate(limit);
        }

        tracing::debug!(
            document = document.id.as_deref().unwrap_or(""),
            results = ranked.len(),
            explicit = ranked.iter().filter(|r| r.tier == RelevanceTier::Explicit).count(),
            "related entries ranked"
        );

        ranked
    }

    fn matches_tags(entry: &DictionaryEntry, tags: &[String]) -> bool {
        let shared = entry
            .tags
            .iter()
            .any(|t| tags.iter().any(|tag| t.to_lowercase() == *tag));
        if shared {
            return true;
        }
        let title = entry.title.to_lowercase();
        tags.iter().any(|tag| title.contains(tag.as_str()))
    }
}

/// Admission bookkeeping: each catalog slot at most once
struct Admitted<'a> {
    skip_id: Option<&'a str>,
    seen: HashSet<usize>,
    explicit: Vec<RankedEntry>,
    rest: Vec<RankedEntry>,
}

impl<'a> Admitted<'a> {
    fn new(skip_id: Option<&'a str>) -> Self {
        Self {
            skip_id,
            seen: HashSet::new(),
            explicit: Vec::new(),
            rest: Vec::new(),
        }
    }

    /// Returns true when the entry was newly admitted
    fn push(&mut self, slot: usize, entry: &DictionaryEntry, tier: RelevanceTier) -> bool {
        if self.skip_id == Some(entry.id.as_str()) || !self.seen.insert(slot) {
            return false;
        }

        let ranked = RankedEntry {
            entry: entry.clone(),
            tier,
        };
        if tier == RelevanceTier::Explicit {
            self.explicit.push(ranked);
        } else {
            self.rest.push(ranked);
        }
        true
    }

    /// Explicit first (given order), the rest by popularity, stable
    fn into_ranked(self) -> Vec<RankedEntry> {
        let mut rest = self.rest;
        rest.sort_by(|a, b| b.entry.popularity.cmp(&a.entry.popularity));

        let mut ranked = self.explicit;
        ranked.extend(rest);
        ranked
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

#[wasm_bindgen]
impl RelevanceRanker {
    /// Create a ranker from JS objects
    #[wasm_bindgen(constructor)]
    pub fn js_new(entries_val: JsValue, config_val: JsValue) -> Result<RelevanceRanker, JsValue> {
        let config: RelevanceConfig = if config_val.is_undefined() || config_val.is_null() {
            RelevanceConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config_val)?
        };
        let entries: Vec<DictionaryEntry> = serde_wasm_bindgen::from_value(entries_val)?;

        Ok(Self::new(config, entries))
    }

    /// Rank (accepts a RelevanceDocument and the scan's spans, returns entries)
    #[wasm_bindgen(js_name = rank)]
    pub fn js_rank(&self, document_val: JsValue, spans_val: JsValue) -> Result<JsValue, JsValue> {
        let document: RelevanceDocument = serde_wasm_bindgen::from_value(document_val)?;
        let spans: Vec<Span> = serde_wasm_bindgen::from_value(spans_val)?;
        Ok(serde_wasm_bindgen::to_value(&self.rank(&document, &spans))?)
    }

    /// Rank and explain (returns RankedEntry objects)
    #[wasm_bindgen(js_name = rankExplained)]
    pub fn js_rank_explained(&self, document_val: JsValue, spans_val: JsValue) -> Result<JsValue, JsValue> {
        let document: RelevanceDocument = serde_wasm_bindgen::from_value(document_val)?;
        let spans: Vec<Span> = serde_wasm_bindgen::from_value(spans_val)?;
        Ok(serde_wasm_bindgen::to_value(&self.rank_explained(&document, &spans))?)
    }

    /// Catalog size
    #[wasm_bindgen(js_name = catalogSize)]
    pub fn catalog_size(&self) -> usize {
        self.catalog.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
