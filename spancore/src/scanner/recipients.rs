//! Mention recipients: who should get a "you were mentioned" alert
//!
//! Only the decision lives here; delivery belongs to the notification
//! service.

use std::collections::HashSet;

use crate::scanner::span::{Span, SpanKind};

/// Resolved user ids from accepted mention spans.
///
/// First-occurrence order, one entry per user. Unresolved handles, the author
/// (self-mentions) and users for which `is_blocked(author_id, user_id)` holds
/// are skipped.
pub fn mention_recipients<F>(spans: &[Span], author_id: &str, is_blocked: F) -> Vec<String>
where
    F: Fn(&str, &str) -> bool,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut recipients = Vec::new();

    for span in spans {
        if span.kind != SpanKind::Mention || !span.resolved {
            continue;
        }

        let user_id = span.entity_id.as_str();
        if user_id == author_id || !seen.insert(user_id) {
            continue;
        }

        if is_blocked(author_id, user_id) {
            tracing::debug!(user_id, "mention recipient blocked");
            continue;
        }

        recipients.push(user_id.to_string());
    }

    recipients
}

/// All resolved mentioned users, no author/block filtering
pub fn mentioned_user_ids(spans: &[Span]) -> Vec<String> {
    mention_recipients(spans, "", |_, _| false)
}
