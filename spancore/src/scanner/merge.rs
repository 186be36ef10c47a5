//! Span Merger: one decision per text region
//!
//! Mentions, hashtags and dictionary terms are extracted independently and can
//! collide (`#DogTraining` vs. a "Dog Training" entry). Candidates are sorted
//! by start, longer first at equal starts, and the first non-overlapping one
//! wins.

use crate::scanner::span::{MatchCandidate, Span};

/// Merge the three candidate lists into ordered, non-overlapping spans
pub fn merge_spans(
    mentions: Vec<MatchCandidate>,
    hashtags: Vec<MatchCandidate>,
    terms: Vec<MatchCandidate>,
) -> Vec<Span> {
    let mut candidates = mentions;
    candidates.extend(hashtags);
    candidates.extend(terms);
    resolve_overlaps(candidates)
}

/// Greedy overlap resolution over any candidate list.
///
/// Stable sort, so equal (start, length) candidates keep input order.
pub fn resolve_overlaps(mut candidates: Vec<MatchCandidate>) -> Vec<Span> {
    candidates.retain(|c| !c.is_empty());
    if candidates.len() <= 1 {
        return candidates;
    }

    candidates.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.len().cmp(&a.len())));

    let total = candidates.len();
    let mut result: Vec<Span> = Vec::with_capacity(total);
    // Accepted spans are disjoint and start-ordered, so the last one has the
    // largest end.
    let mut last_end = 0;

    for candidate in candidates {
        if result.is_empty() || candidate.start >= last_end {
            last_end = candidate.end;
            result.push(candidate);
        }
    }

    tracing::trace!(kept = result.len(), dropped = total - result.len(), "spans merged");
    result
}

/// No two spans intersect and starts ascend
pub fn is_well_formed(spans: &[Span]) -> bool {
    spans.iter().all(|s| s.start < s.end)
        && spans.windows(2).all(|w| w[0].end <= w[1].start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::span::SpanKind;

    fn span(kind: SpanKind, start: usize, end: usize, id: &str) -> Span {
        Span::new(kind, start, end, id, id)
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_spans(vec![], vec![], vec![]).is_empty());
    }

    #[test]
    fn test_disjoint_spans_sorted() {
        let merged = merge_spans(
            vec![span(SpanKind::Mention, 20, 26, "u1")],
            vec![span(SpanKind::Hashtag, 0, 5, "tag")],
            vec![span(SpanKind::DictionaryTerm, 8, 12, "w1")],
        );
        let starts: Vec<usize> = merged.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 8, 20]);
        assert!(is_well_formed(&merged));
    }

    #[test]
    fn test_longer_wins_at_same_start() {
        let merged = merge_spans(
            vec![],
            vec![span(SpanKind::Hashtag, 0, 4, "dog")],
            vec![span(SpanKind::DictionaryTerm, 0, 12, "w1")],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].entity_id, "w1");
    }

    #[test]
    fn test_earlier_start_wins_over_longer_overlap() {
        // #DogTraining (0..12) vs a term inside it (1..13)
        let merged = merge_spans(
            vec![],
            vec![span(SpanKind::Hashtag, 0, 12, "dogtraining")],
            vec![span(SpanKind::DictionaryTerm, 1, 20, "w1")],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].kind, SpanKind::Hashtag);
    }

    #[test]
    fn test_contained_span_dropped_but_later_kept() {
        let merged = resolve_overlaps(vec![
            span(SpanKind::DictionaryTerm, 0, 10, "outer"),
            span(SpanKind::Mention, 3, 5, "inner"),
            span(SpanKind::Hashtag, 10, 14, "after"),
        ]);
        let ids: Vec<&str> = merged.iter().map(|s| s.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["outer", "after"]);
    }

    #[test]
    fn test_tie_keeps_input_order() {
        // Same start and length: mention list comes first
        let merged = merge_spans(
            vec![span(SpanKind::Mention, 2, 6, "mention")],
            vec![span(SpanKind::Hashtag, 2, 6, "hashtag")],
            vec![],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].entity_id, "mention");
    }

    #[test]
    fn test_idempotent() {
        let mentions = vec![span(SpanKind::Mention, 4, 9, "u1")];
        let hashtags = vec![span(SpanKind::Hashtag, 0, 6, "t"), span(SpanKind::Hashtag, 12, 15, "x")];
        let terms = vec![span(SpanKind::DictionaryTerm, 5, 14, "w")];

        let first = merge_spans(mentions.clone(), hashtags.clone(), terms.clone());
        let second = merge_spans(mentions, hashtags, terms);
        assert_eq!(first, second);

        let again = resolve_overlaps(first.clone());
        assert_eq!(again, first);
    }

    #[test]
    fn test_is_well_formed_detects_overlap() {
        let spans = vec![
            span(SpanKind::Hashtag, 0, 5, "a"),
            span(SpanKind::Hashtag, 4, 8, "b"),
        ];
        assert!(!is_well_formed(&spans));
    }
}
