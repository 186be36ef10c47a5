//! Span: the unifying annotation unit
//!
//! Every scanner emits `MatchCandidate`s and the merger turns them into
//! `Span`s. Offsets are half-open and counted in Unicode scalar values, so a
//! `Span` can be handed to a JS renderer or sliced with `chars()` without
//! caring how many bytes the preceding text used.

use serde::{Deserialize, Serialize};

// =============================================================================
// Types
// =============================================================================

/// Kind of inline entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Mention,
    Hashtag,
    DictionaryTerm,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Mention => "mention",
            SpanKind::Hashtag => "hashtag",
            SpanKind::DictionaryTerm => "dictionary_term",
        }
    }
}

/// One recognized entity occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive, in chars)
    pub start: usize,
    /// End offset (exclusive, in chars)
    pub end: usize,
    pub kind: SpanKind,
    /// User id, lowercase tag, or dictionary entry id.
    /// For an unresolved mention this is the raw handle.
    pub entity_id: String,
    /// Exact source substring, original casing
    pub text: String,
    /// False only for mentions the user resolver did not recognize
    #[serde(default = "default_resolved")]
    pub resolved: bool,
}

fn default_resolved() -> bool {
    true
}

/// Pre-merge output of a single scanner; may overlap other candidates.
pub type MatchCandidate = Span;

impl Span {
    pub fn new(
        kind: SpanKind,
        start: usize,
        end: usize,
        entity_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            kind,
            entity_id: entity_id.into(),
            text: text.into(),
            resolved: true,
        }
    }

    /// Mark an unresolved mention
    pub fn unresolved(mut self) -> Self {
        self.resolved = false;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open interval intersection
    #[inline]
    pub fn overlaps(&self, other: &Span) -> bool {
        ranges_overlap(self.start, self.end, other.start, other.end)
    }
}

/// `[a_start, a_end)` and `[b_start, b_end)` intersect
#[inline]
pub fn ranges_overlap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    a_start < b_end && b_start < a_end
}

// =============================================================================
// CharIndex
// =============================================================================

/// Byte offset -> char offset translation for one text.
///
/// `regex` and `aho-corasick` report byte offsets; spans are in chars.
pub(crate) struct CharIndex {
    byte_starts: Vec<usize>,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            byte_starts: text.char_indices().map(|(b, _)| b).collect(),
        }
    }

    /// Char offset of a byte offset on a char boundary (or `text.len()`)
    pub(crate) fn char_offset(&self, byte: usize) -> usize {
        match self.byte_starts.binary_search(&byte) {
            Ok(i) | Err(i) => i,
        }
    }

    pub(crate) fn char_len(&self) -> usize {
        self.byte_starts.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
