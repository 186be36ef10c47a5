//! Hashtag Scanner: `#tag` tokens
//!
//! `#` followed by one or more letters, digits or underscores. The tag body is
//! lowercased into `entity_id`; `text` keeps the author's casing.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::scanner::span::{CharIndex, MatchCandidate, Span, SpanKind};

static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#([\p{Alphabetic}\p{N}_]+)").expect("Invalid hashtag regex")
});

/// Canonical tag id: "#DogTraining" / "DogTraining" -> "dogtraining"
pub fn normalize_tag(tag: &str) -> String {
    tag.trim_start_matches('#').to_lowercase()
}

/// Scan `text` for hashtags
pub fn scan_hashtags(text: &str) -> Vec<MatchCandidate> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars = CharIndex::new(text);

    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let full = cap.get(0)?;
            let body = cap.get(1)?;
            Some(Span::new(
                SpanKind::Hashtag,
                chars.char_offset(full.start()),
                chars.char_offset(full.end()),
                body.as_str().to_lowercase(),
                full.as_str(),
            ))
        })
        .collect()
}

/// Normalized tags in first-occurrence order, without repeats
pub fn unique_hashtags(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    scan_hashtags(text)
        .into_iter()
        .map(|span| span.entity_id)
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
