//! Core data structures for RelRank

use serde::{Deserialize, Serialize};
use spancore::DictionaryEntry;

// =============================================================================
// Document
// =============================================================================

/// The document related entries are ranked for (a post, or a wiki article)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelevanceDocument {
    /// Set when the document is itself a dictionary entry; it is never suggested
    #[serde(default)]
    pub id: Option<String>,
    /// Editor-curated related entries, in display order
    #[serde(default)]
    pub explicit_related_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Content template hint, e.g. "health-update"
    #[serde(default)]
    pub category_hint: Option<String>,
}

// =============================================================================
// Results
// =============================================================================

/// Why an entry was suggested, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceTier {
    Explicit,
    BodyTerm,
    Tag,
    Category,
}

/// A ranked entry with the tier that admitted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub entry: DictionaryEntry,
    pub tier: RelevanceTier,
}
