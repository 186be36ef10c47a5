//! Invariant tests over generated inputs
//!
//! Texts are assembled from fragments that are known to collide (emails,
//! nested titles, tags glued to titles, multi-byte prefixes).

use crate::scanner::{
    is_well_formed, merge_spans, resolve_overlaps, scan_hashtags, scan_mentions, scan_terms,
    DictionaryEntry, DictionaryIndex, Span, SpanKind, DEFAULT_EMAIL_LOOKBACK,
};

const FRAGMENTS: &[&str] = &[
    "Dog",
    "Dog Training",
    "#DogTraining",
    "@alice",
    "jane@example.com",
    "Catastrophe",
    "cat",
    "— ",
    "🐕",
    "Šuo",
    "@",
    "#",
    ", ",
    " ",
    "Golden Retriever",
    "@bob.",
    "#pets!",
    "a@b@c",
];

fn dictionary() -> DictionaryIndex {
    DictionaryIndex::build(vec![
        DictionaryEntry::new("dog", "Dog"),
        DictionaryEntry::new("training", "Dog Training"),
        DictionaryEntry::new("cat", "Cat"),
        DictionaryEntry::new("suo", "šuo"),
        DictionaryEntry::new("golden", "Golden Retriever"),
        DictionaryEntry::new("retriever", "Retriever"),
        DictionaryEntry::new("example", "example"),
    ])
}

fn resolver(handle: &str) -> Option<String> {
    (handle == "alice").then(|| "u42".to_string())
}

/// Deterministic text generator (LCG over fragment indices)
fn generated_texts(count: usize) -> Vec<String> {
    let mut state: u64 = 0x5eed;
    let mut texts = Vec::with_capacity(count);

    for _ in 0..count {
        let mut text = String::new();
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let pieces = 1 + (state >> 60) as usize;

        for _ in 0..pieces {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let fragment = FRAGMENTS[(state >> 33) as usize % FRAGMENTS.len()];
            text.push_str(fragment);
            if (state >> 20) & 1 == 0 {
                text.push(' ');
            }
        }
        texts.push(text);
    }

    texts
}

fn candidates(text: &str, index: &DictionaryIndex) -> (Vec<Span>, Vec<Span>, Vec<Span>) {
    (
        scan_mentions(text, &resolver, DEFAULT_EMAIL_LOOKBACK).unwrap(),
        scan_hashtags(text),
        scan_terms(text, index).unwrap(),
    )
}

#[test]
fn test_merged_spans_never_overlap_and_are_sorted() {
    let index = dictionary();

    for text in generated_texts(400) {
        let (m, h, t) = candidates(&text, &index);
        let merged = merge_spans(m, h, t);

        assert!(is_well_formed(&merged), "overlap or disorder in {:?}: {:?}", text, merged);
        for pair in merged.windows(2) {
            assert!(pair[0].start < pair[1].start);
        }
    }
}

#[test]
fn test_span_text_matches_char_slice() {
    let index = dictionary();

    for text in generated_texts(300) {
        let chars: Vec<char> = text.chars().collect();
        let (m, h, t) = candidates(&text, &index);

        for span in m.iter().chain(h.iter()).chain(t.iter()) {
            assert!(span.start < span.end && span.end <= chars.len());
            let slice: String = chars[span.start..span.end].iter().collect();
            assert_eq!(slice, span.text, "bad offsets in {:?}", text);
        }
    }
}

#[test]
fn test_merge_is_deterministic_and_idempotent() {
    let index = dictionary();

    for text in generated_texts(200) {
        let (m, h, t) = candidates(&text, &index);
        let first = merge_spans(m.clone(), h.clone(), t.clone());
        let second = merge_spans(m, h, t);

        assert_eq!(first, second);
        assert_eq!(resolve_overlaps(first.clone()), first);
    }
}

#[test]
fn test_dictionary_terms_disjoint_before_merge() {
    let index = dictionary();

    for text in generated_texts(300) {
        let terms = scan_terms(&text, &index).unwrap();
        assert!(is_well_formed(&terms), "terms overlap in {:?}", text);
        assert!(terms.iter().all(|t| t.kind == SpanKind::DictionaryTerm));
    }
}

#[test]
fn test_no_mention_ever_glued_to_identifier() {
    let index = dictionary();

    for text in generated_texts(300) {
        let chars: Vec<char> = text.chars().collect();
        let (mentions, _, _) = candidates(&text, &index);

        for mention in mentions {
            if mention.start > 0 {
                let before = chars[mention.start - 1];
                assert!(
                    !(before.is_alphanumeric() || matches!(before, '_' | '.' | '-')),
                    "mention {:?} glued to {:?} in {:?}",
                    mention.text,
                    before,
                    text
                );
            }
        }
    }
}

#[test]
fn test_every_merged_span_came_from_a_candidate() {
    let index = dictionary();

    for text in generated_texts(200) {
        let (m, h, t) = candidates(&text, &index);
        let all: Vec<Span> = m.iter().chain(h.iter()).chain(t.iter()).cloned().collect();
        let merged = merge_spans(m, h, t);

        for span in &merged {
            assert!(all.contains(span));
        }
        // Every candidate is either kept or overlaps something kept
        for candidate in &all {
            assert!(merged.iter().any(|s| s == candidate || s.overlaps(candidate)));
        }
    }
}
