//! Mention Scanner: `@handle` tokens
//!
//! Finds `@` followed by identifier characters (letters, digits, `_`, `.`,
//! `-`), drops tokens glued to a preceding identifier character (the domain
//! half of `jane@example.com`, chained `a@b`), and resolves each handle through
//! a caller-supplied [`UserResolver`].
//!
//! Unresolved handles still produce a span (`resolved == false`) with the raw
//! handle as `entity_id`, so renderers can show a neutral reference while the
//! notification hand-off skips it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::AnnotateResult;
use crate::scanner::span::{CharIndex, MatchCandidate, Span, SpanKind};

/// Default number of chars inspected before an `@`
pub const DEFAULT_EMAIL_LOOKBACK: usize = 50;

// Rust regex has no lookbehind, the preceding-char check happens after matching.
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([\p{Alphabetic}\p{N}_.\-]+)").expect("Invalid mention regex")
});

/// Letters, digits, underscore, dot, hyphen
#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}

// =============================================================================
// Resolution
// =============================================================================

/// Maps a handle (without `@`) to a user id.
///
/// Must be deterministic for a given snapshot. An `Err` is a contract
/// violation and aborts the scan.
pub trait UserResolver {
    fn resolve(&self, handle: &str) -> AnnotateResult<Option<String>>;
}

impl<F> UserResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, handle: &str) -> AnnotateResult<Option<String>> {
        Ok(self(handle))
    }
}

/// User record for directory hydration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
}

/// In-memory handle -> user id directory (usernames compared case-insensitively)
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    by_handle: HashMap<String, String>,
}

impl UserDirectory {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut by_handle = HashMap::new();
        for user in users {
            by_handle.entry(user.username.to_lowercase()).or_insert(user.id);
        }
        Self { by_handle }
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }
}

impl UserResolver for UserDirectory {
    fn resolve(&self, handle: &str) -> AnnotateResult<Option<String>> {
        Ok(self.by_handle.get(&handle.to_lowercase()).cloned())
    }
}

// =============================================================================
// Scanning
// =============================================================================

/// Up to `lookback` chars immediately before byte offset `at`
fn preceding_window(text: &str, at: usize, lookback: usize) -> &str {
    let head = &text[..at];
    match head.char_indices().rev().take(lookback).last() {
        Some((from, _)) => &head[from..],
        None => "",
    }
}

/// True when the `@` at byte `at` is glued to a preceding identifier char
fn looks_like_email(text: &str, at: usize, lookback: usize) -> bool {
    preceding_window(text, at, lookback)
        .chars()
        .next_back()
        .is_some_and(is_identifier_char)
}

/// Scan `text` for mentions. Every occurrence yields its own candidate.
pub fn scan_mentions<R>(
    text: &str,
    resolver: &R,
    email_lookback: usize,
) -> AnnotateResult<Vec<MatchCandidate>>
where
    R: UserResolver + ?Sized,
{
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let chars = CharIndex::new(text);
    let mut candidates = Vec::new();

    for cap in MENTION_RE.captures_iter(text) {
        let (Some(full), Some(handle)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        if looks_like_email(text, full.start(), email_lookback) {
            tracing::trace!(token = full.as_str(), "skipping email-like mention");
            continue;
        }

        let handle = handle.as_str();
        let start = chars.char_offset(full.start());
        let end = chars.char_offset(full.end());

        let candidate = match resolver.resolve(handle)? {
            Some(user_id) => Span::new(SpanKind::Mention, start, end, user_id, full.as_str()),
            None => Span::new(SpanKind::Mention, start, end, handle, full.as_str()).unresolved(),
        };
        candidates.push(candidate);
    }

    Ok(candidates)
}

// =============================================================================
// Tests
// =============================================================================
