//! HashtagTally: per-tag usage counts
//!
//! An explicitly owned store the host injects and persists (it serializes with
//! serde). There is no ambient global state: whoever owns the tally decides
//! its lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::scanner::hashtag::{normalize_tag, unique_hashtags};

/// Usage record for one tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagUsage {
    pub count: u64,
    pub last_used_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HashtagTally {
    #[serde(default)]
    counts: HashMap<String, TagUsage>,
}

impl HashtagTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count each tag once per call
    pub fn record<I, S>(&mut self, tags: I, at: DateTime<Utc>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        for tag in tags {
            let tag = normalize_tag(tag.as_ref());
            if tag.is_empty() || !seen.insert(tag.clone()) {
                continue;
            }

            let usage = self.counts.entry(tag).or_insert(TagUsage {
                count: 0,
                last_used_at: at,
            });
            usage.count += 1;
            usage.last_used_at = at;
        }
    }

    /// Record every distinct hashtag of a post body
    pub fn record_text(&mut self, text: &str, at: DateTime<Utc>) -> Vec<String> {
        let tags = unique_hashtags(text);
        self.record(&tags, at);
        tags
    }

    pub fn get(&self, tag: &str) -> Option<&TagUsage> {
        self.counts.get(&normalize_tag(tag))
    }

    /// Most used first; ties by tag name
    pub fn top(&self, n: usize) -> Vec<(&str, &TagUsage)> {
        let mut ranked: Vec<(&str, &TagUsage)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), v)).collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
