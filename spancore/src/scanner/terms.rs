//! TermCortex: dictionary titles found verbatim in prose
//!
//! Every occurrence of every title is collected in one pass with an
//! overlapping Aho-Corasick automaton, then accepted entry by entry,
//! longest title first:
//!
//! 1. an occurrence touching a region already claimed by an accepted match is
//!    skipped (so "Dog Training" beats "Dog"),
//! 2. both neighbours must be whitespace, punctuation or a text edge (so "Cat"
//!    never matches inside "Catastrophe").
//!
//! Case folding is done per char and never changes the char count, so
//! offsets computed on the folded text are valid on the source text.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::{AnnotateError, AnnotateResult};
use crate::scanner::dictionary::DictionaryIndex;
use crate::scanner::span::{CharIndex, MatchCandidate, Span, SpanKind};

static BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\p{P}]$").expect("Invalid boundary regex"));

/// Unicode whitespace or punctuation
pub fn is_boundary_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    BOUNDARY_RE.is_match(c.encode_utf8(&mut buf))
}

/// Simple lowercase mapping that keeps exactly one char per char.
/// Final sigma folds to `σ`, since `Σ` lowercases to `σ` in either position.
#[inline]
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some('ς'), None) => 'σ',
        (Some(l), None) => l,
        _ => c,
    }
}

pub(crate) fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// Per-pattern metadata, in processing order (longest title first)
#[derive(Debug, Clone)]
struct TermPattern {
    entry_id: String,
}

// =============================================================================
// TermCortex
// =============================================================================

/// Dictionary-term matcher, built once per dictionary snapshot
#[derive(Debug, Clone, Default)]
pub struct TermCortex {
    automaton: Option<AhoCorasick>,
    patterns: Vec<TermPattern>,
}

impl TermCortex {
    /// Build the automaton from an index
    pub fn build(index: &DictionaryIndex) -> AnnotateResult<Self> {
        let ordered = index.entries_by_length_desc();
        if ordered.is_empty() {
            return Ok(Self::default());
        }

        let folded: Vec<String> = ordered.iter().map(|e| fold_case(&e.title)).collect();
        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(&folded)
            .map_err(|e| AnnotateError::Automaton(e.to_string()))?;

        let patterns = ordered
            .iter()
            .map(|e| TermPattern {
                entry_id: e.id.clone(),
            })
            .collect();

        Ok(Self {
            automaton: Some(automaton),
            patterns,
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Find dictionary terms in `text`, sorted by start offset
    pub fn find_terms(&self, text: &str) -> Vec<MatchCandidate> {
        let automaton = match &self.automaton {
            Some(a) => a,
            None => return vec![],
        };

        if text.is_empty() {
            return vec![];
        }

        let source: Vec<char> = text.chars().collect();
        let folded = fold_case(text);
        let chars = CharIndex::new(&folded);

        // Every occurrence of every pattern, grouped by pattern
        let mut occurrences: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.patterns.len()];
        for mat in automaton.find_overlapping_iter(&folded) {
            occurrences[mat.pattern().as_usize()]
                .push((chars.char_offset(mat.start()), chars.char_offset(mat.end())));
        }

        // start -> (end, pattern)
        let mut accepted: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
        let mut rejected_boundary = 0usize;

        for (pattern_id, found) in occurrences.iter_mut().enumerate() {
            found.sort_unstable();

            for &(start, end) in found.iter() {
                if overlaps_accepted(&accepted, start, end) {
                    continue;
                }
                if !has_word_boundaries(&source, start, end) {
                    rejected_boundary += 1;
                    continue;
                }
                accepted.insert(start, (end, pattern_id));
            }
        }

        tracing::trace!(
            accepted = accepted.len(),
            rejected_boundary,
            "dictionary terms scanned"
        );

        accepted
            .into_iter()
            .map(|(start, (end, pattern_id))| {
                let matched: String = source[start..end].iter().collect();
                Span::new(
                    SpanKind::DictionaryTerm,
                    start,
                    end,
                    self.patterns[pattern_id].entry_id.clone(),
                    matched,
                )
            })
            .collect()
    }
}

/// Accepted intervals are disjoint, so only the closest one starting before
/// `end` can intersect `[start, end)`.
fn overlaps_accepted(accepted: &BTreeMap<usize, (usize, usize)>, start: usize, end: usize) -> bool {
    accepted
        .range(..end)
        .next_back()
        .is_some_and(|(_, &(accepted_end, _))| accepted_end > start)
}

fn has_word_boundaries(source: &[char], start: usize, end: usize) -> bool {
    let before_ok = start == 0 || is_boundary_char(source[start - 1]);
    let after_ok = end >= source.len() || is_boundary_char(source[end]);
    before_ok && after_ok
}

/// One-shot convenience: build a matcher for `index` and scan `text`
pub fn scan_terms(text: &str, index: &DictionaryIndex) -> AnnotateResult<Vec<MatchCandidate>> {
    Ok(TermCortex::build(index)?.find_terms(text))
}

// =============================================================================
// Tests
// =============================================================================
