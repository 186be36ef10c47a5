//! AnnotationCortex: unified annotation scanner
//!
//! Single scan() call for all extraction types:
//! - `@mentions` (`scan_mentions`, resolved against the hydrated directory)
//! - `#hashtags` (`scan_hashtags`)
//! - dictionary terms (`TermCortex`, longest title first)
//!
//! followed by the overlap merge. Designed for WASM with a single
//! cross-boundary call per scan; the native API is the same minus `JsValue`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::{AnnotateError, AnnotateResult};
use crate::scanner::{
    hashtag::scan_hashtags,
    mention::{scan_mentions, UserDirectory, UserRecord, UserResolver, DEFAULT_EMAIL_LOOKBACK},
    merge::merge_spans,
    recipients::mention_recipients,
    terms::TermCortex,
    DictionaryEntry, DictionaryIndex, Span, SpanKind,
};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the AnnotationCortex
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnnotatorConfig {
    #[serde(default = "default_true")]
    pub enable_mentions: bool,
    #[serde(default = "default_true")]
    pub enable_hashtags: bool,
    #[serde(default = "default_true")]
    pub enable_dictionary: bool,
    /// Chars inspected before an `@` for email suppression
    #[serde(default = "default_email_lookback")]
    pub email_lookback: usize,
}

fn default_true() -> bool { true }

fn default_email_lookback() -> usize { DEFAULT_EMAIL_LOOKBACK }

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            enable_mentions: true,
            enable_hashtags: true,
            enable_dictionary: true,
            email_lookback: DEFAULT_EMAIL_LOOKBACK,
        }
    }
}

// =============================================================================
// Result types
// =============================================================================

/// Timing per scan phase (microseconds)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnnotationTimings {
    pub total_us: u64,
    pub mention_us: u64,
    pub hashtag_us: u64,
    pub term_us: u64,
    pub merge_us: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnnotationStats {
    pub timings: AnnotationTimings,
    /// Text length in chars
    pub text_length: usize,
    pub mentions_found: usize,
    pub unresolved_mentions: usize,
    pub hashtags_found: usize,
    pub terms_found: usize,
    /// Candidates discarded by the overlap merge
    pub dropped: usize,
}

/// Unified scan result
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnnotationResult {
    pub spans: Vec<Span>,
    pub stats: AnnotationStats,
}

impl AnnotationResult {
    pub fn spans_of(&self, kind: SpanKind) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.kind == kind)
    }
}

// =============================================================================
// AnnotationCortex
// =============================================================================

/// Unified annotation engine
#[wasm_bindgen]
pub struct AnnotationCortex {
    config: AnnotatorConfig,
    index: DictionaryIndex,
    terms: TermCortex,
    users: UserDirectory,
}

impl Default for AnnotationCortex {
    fn default() -> Self {
        Self::with_config(AnnotatorConfig::default())
    }
}

fn to_js_error(e: AnnotateError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// JS function resolver: `(handle) => userId | null`. A throw aborts the scan.
struct JsResolver<'a>(&'a js_sys::Function);

impl UserResolver for JsResolver<'_> {
    fn resolve(&self, handle: &str) -> AnnotateResult<Option<String>> {
        let value = self
            .0
            .call1(&JsValue::NULL, &JsValue::from_str(handle))
            .map_err(|e| AnnotateError::resolver(handle, format!("{:?}", e)))?;
        Ok(js_user_id(&value))
    }
}

/// String ids pass through; numeric ids are stringified (`42` -> "42").
/// Anything else (null, undefined, objects) means unresolved.
fn js_user_id(value: &JsValue) -> Option<String> {
    if let Some(id) = value.as_string() {
        return Some(id);
    }
    match value.as_f64() {
        Some(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
            Some(format!("{}", n as i64))
        }
        Some(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    }
}

#[wasm_bindgen]
impl AnnotationCortex {
    /// Create a new AnnotationCortex with optional configuration
    ///
    /// # Arguments
    /// * `config` - Optional JSON configuration object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AnnotationCortex, JsValue> {
        let config: AnnotatorConfig = if config.is_null() || config.is_undefined() {
            AnnotatorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| to_js_error(AnnotateError::Config(e.to_string())))?
        };
        Ok(Self::with_config(config))
    }

    /// Hydrate the dictionary (JS binding)
    #[wasm_bindgen(js_name = hydrateDictionary)]
    pub fn js_hydrate_dictionary(&mut self, entries: JsValue) -> Result<(), JsValue> {
        let entries: Vec<DictionaryEntry> = serde_wasm_bindgen::from_value(entries)
            .map_err(|e| to_js_error(AnnotateError::Config(format!("Failed to parse entries: {}", e))))?;
        self.hydrate_dictionary(entries).map_err(to_js_error)
    }

    /// Hydrate the user directory (JS binding)
    #[wasm_bindgen(js_name = hydrateUsers)]
    pub fn js_hydrate_users(&mut self, users: JsValue) -> Result<(), JsValue> {
        let users: Vec<UserRecord> = serde_wasm_bindgen::from_value(users)
            .map_err(|e| to_js_error(AnnotateError::Config(format!("Failed to parse users: {}", e))))?;
        self.hydrate_users(users);
        Ok(())
    }

    /// Unified scan against the hydrated directory (JS binding)
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.scan(text).map_err(to_js_error)?;
        Self::result_to_js(&result)
    }

    /// Unified scan with a JS resolver callback (JS binding)
    ///
    /// The callback returns a user id (string or number) or `null`/`undefined`
    /// for an unknown handle. If it throws, the scan fails with that error.
    #[wasm_bindgen(js_name = scanWithResolver)]
    pub fn js_scan_with_resolver(&self, text: &str, resolver: &js_sys::Function) -> Result<JsValue, JsValue> {
        let result = self.scan_with(text, &JsResolver(resolver)).map_err(to_js_error)?;
        Self::result_to_js(&result)
    }

    /// Users to notify for the given spans (JS binding)
    ///
    /// `blocked` is an optional array of user ids the author may not notify.
    #[wasm_bindgen(js_name = mentionRecipients)]
    pub fn js_mention_recipients(&self, spans: JsValue, author_id: &str, blocked: JsValue) -> Result<JsValue, JsValue> {
        let spans: Vec<Span> = serde_wasm_bindgen::from_value(spans)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse spans: {}", e)))?;
        let blocked: Vec<String> = if blocked.is_null() || blocked.is_undefined() {
            Vec::new()
        } else {
            serde_wasm_bindgen::from_value(blocked)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse blocked ids: {}", e)))?
        };

        let recipients = mention_recipients(&spans, author_id, |_, user| blocked.iter().any(|b| b == user));
        serde_wasm_bindgen::to_value(&recipients)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Number of dictionary entries after deduplication
    #[wasm_bindgen(js_name = dictionarySize)]
    pub fn dictionary_size(&self) -> usize {
        self.index.len()
    }

    /// Number of users in the hydrated directory
    #[wasm_bindgen(js_name = userCount)]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Get scanner status
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> JsValue {
        JsValue::from_str(&self.status().to_string())
    }
}

impl AnnotationCortex {
    pub fn with_config(config: AnnotatorConfig) -> Self {
        Self {
            config,
            index: DictionaryIndex::default(),
            terms: TermCortex::default(),
            users: UserDirectory::default(),
        }
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &DictionaryIndex {
        &self.index
    }

    /// Replace the dictionary snapshot and rebuild the term automaton
    pub fn hydrate_dictionary(&mut self, entries: Vec<DictionaryEntry>) -> AnnotateResult<()> {
        let index = DictionaryIndex::build(entries);
        self.terms = TermCortex::build(&index)?;
        self.index = index;
        Ok(())
    }

    /// Replace the user directory snapshot
    pub fn hydrate_users(&mut self, users: Vec<UserRecord>) {
        self.users = UserDirectory::new(users);
    }

    /// Scan using the hydrated user directory
    pub fn scan(&self, text: &str) -> AnnotateResult<AnnotationResult> {
        self.scan_with(text, &self.users)
    }

    /// Scan with a caller-supplied resolver
    pub fn scan_with<R>(&self, text: &str, resolver: &R) -> AnnotateResult<AnnotationResult>
    where
        R: UserResolver + ?Sized,
    {
        let overall_start = instant::Instant::now();
        let mut stats = AnnotationStats {
            text_length: text.chars().count(),
            ..Default::default()
        };

        // Phase 1: mentions
        let mention_start = instant::Instant::now();
        let mentions = if self.config.enable_mentions {
            scan_mentions(text, resolver, self.config.email_lookback)?
        } else {
            Vec::new()
        };
        stats.timings.mention_us = mention_start.elapsed().as_micros() as u64;
        stats.mentions_found = mentions.len();
        stats.unresolved_mentions = mentions.iter().filter(|m| !m.resolved).count();

        // Phase 2: hashtags
        let hashtag_start = instant::Instant::now();
        let hashtags = if self.config.enable_hashtags {
            scan_hashtags(text)
        } else {
            Vec::new()
        };
        stats.timings.hashtag_us = hashtag_start.elapsed().as_micros() as u64;
        stats.hashtags_found = hashtags.len();

        // Phase 3: dictionary terms
        let term_start = instant::Instant::now();
        let terms = if self.config.enable_dictionary {
            self.terms.find_terms(text)
        } else {
            Vec::new()
        };
        stats.timings.term_us = term_start.elapsed().as_micros() as u64;
        stats.terms_found = terms.len();

        // Phase 4: merge
        let merge_start = instant::Instant::now();
        let candidate_count = mentions.len() + hashtags.len() + terms.len();
        let spans = merge_spans(mentions, hashtags, terms);
        stats.timings.merge_us = merge_start.elapsed().as_micros() as u64;
        stats.dropped = candidate_count - spans.len();

        stats.timings.total_us = overall_start.elapsed().as_micros() as u64;

        tracing::debug!(
            text_length = stats.text_length,
            mentions = stats.mentions_found,
            hashtags = stats.hashtags_found,
            terms = stats.terms_found,
            kept = spans.len(),
            dropped = stats.dropped,
            total_us = stats.timings.total_us,
            "annotation scan complete"
        );

        Ok(AnnotationResult { spans, stats })
    }

    /// Status snapshot as JSON
    pub fn status(&self) -> serde_json::Value {
        serde_json::json!({
            "dictionary_size": self.index.len(),
            "term_patterns": self.terms.pattern_count(),
            "user_count": self.users.len(),
            "config": {
                "enable_mentions": self.config.enable_mentions,
                "enable_hashtags": self.config.enable_hashtags,
                "enable_dictionary": self.config.enable_dictionary,
                "email_lookback": self.config.email_lookback,
            }
        })
    }

    fn result_to_js(result: &AnnotationResult) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(result).map_err(|e| {
            web_sys::console::error_1(&format!("[AnnotationCortex] Serialization failed: {:?}", e).into());
            JsValue::from_str(&format!("Serialization error: {}", e))
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, username: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            username: username.to_string(),
        }
    }

    fn hydrated() -> AnnotationCortex {
        let mut cortex = AnnotationCortex::default();
        cortex
            .hydrate_dictionary(vec![
                DictionaryEntry::new("w1", "Golden Retriever"),
                DictionaryEntry::new("w2", "Dog Training"),
            ])
            .unwrap();
        cortex.hydrate_users(vec![user("u42", "alice")]);
        cortex
    }

    #[test]
    fn test_config_defaults() {
        let config = AnnotatorConfig::default();
        assert!(config.enable_mentions);
        assert!(config.enable_hashtags);
        assert!(config.enable_dictionary);
        assert_eq!(config.email_lookback, 50);
    }

    #[test]
    fn test_config_partial_json() {
        let config: AnnotatorConfig =
            serde_json::from_str(r#"{"enable_hashtags": false}"#).unwrap();
        assert!(!config.enable_hashtags);
        assert!(config.enable_mentions);
        assert_eq!(config.email_lookback, 50);
    }

    #[test]
    fn test_scan_uses_hydrated_directory() {
        let cortex = hydrated();
        let result = cortex.scan("@Alice likes Dog Training").unwrap();

        assert_eq!(result.spans.len(), 2);
        assert_eq!(result.spans[0].entity_id, "u42");
        assert_eq!(result.spans[1].entity_id, "w2");
        assert_eq!(result.stats.mentions_found, 1);
        assert_eq!(result.stats.terms_found, 1);
        assert_eq!(result.stats.dropped, 0);
    }

    #[test]
    fn test_disabled_phases() {
        let mut cortex = AnnotationCortex::with_config(AnnotatorConfig {
            enable_hashtags: false,
            enable_dictionary: false,
            ..AnnotatorConfig::default()
        });
        cortex
            .hydrate_dictionary(vec![DictionaryEntry::new("w1", "Vet")])
            .unwrap();

        let result = cortex.scan("#vet visit with @bob at the Vet").unwrap();
        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].kind, SpanKind::Mention);
        assert!(!result.spans[0].resolved);
        assert_eq!(result.stats.unresolved_mentions, 1);
    }

    #[test]
    fn test_dropped_counts_merge_conflicts() {
        let mut cortex = AnnotationCortex::default();
        cortex
            .hydrate_dictionary(vec![DictionaryEntry::new("w1", "pets")])
            .unwrap();

        // "#pets" (0..5) vs the term "pets" (1..5): hashtag starts first
        let result = cortex.scan("#pets").unwrap();
        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].kind, SpanKind::Hashtag);
        assert_eq!(result.stats.dropped, 1);
    }

    #[test]
    fn test_rehydrate_replaces_dictionary() {
        let mut cortex = hydrated();
        cortex
            .hydrate_dictionary(vec![DictionaryEntry::new("w9", "Beagle")])
            .unwrap();

        assert_eq!(cortex.dictionary().len(), 1);
        let result = cortex.scan("Golden Retriever or Beagle").unwrap();
        let ids: Vec<&str> = result.spans.iter().map(|s| s.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["w9"]);
    }

    #[test]
    fn test_status_json() {
        let status = hydrated().status();
        assert_eq!(status["dictionary_size"], 2);
        assert_eq!(status["user_count"], 1);
        assert_eq!(status["config"]["email_lookback"], 50);
    }

    #[test]
    fn test_spans_of_kind() {
        let result = hydrated().scan("#dogs @alice #cats").unwrap();
        assert_eq!(result.spans_of(SpanKind::Hashtag).count(), 2);
        assert_eq!(result.spans_of(SpanKind::Mention).count(), 1);
    }
}
