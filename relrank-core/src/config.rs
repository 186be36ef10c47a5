//! Configuration types and defaults for RelRank

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Content template hint that pulls in extra entries of one category
pub const HEALTH_UPDATE_HINT: &str = "health-update";
/// Dictionary category served for the health-update template
pub const HEALTH_CATEGORY: &str = "health";

// =============================================================================
// Main Configuration
// =============================================================================

/// Ranker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceConfig {
    /// Category hint -> dictionary category filled in for it.
    /// Default: `health-update` -> `health`
    #[serde(default = "default_special_categories")]
    pub special_categories: HashMap<String, String>,
    /// Entries added for a special category. Default: 3
    #[serde(default = "default_special_category_limit")]
    pub special_category_limit: usize,
    /// Truncate the final list. Default: no limit
    #[serde(default)]
    pub max_results: Option<usize>,
}

fn default_special_categories() -> HashMap<String, String> {
    HashMap::from([(HEALTH_UPDATE_HINT.to_string(), HEALTH_CATEGORY.to_string())])
}

fn default_special_category_limit() -> usize { 3 }

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            special_categories: default_special_categories(),
            special_category_limit: default_special_category_limit(),
            max_results: None,
        }
    }
}

impl RelevanceConfig {
    /// Dictionary category for a hint, if the hint is special
    pub fn special_category(&self, hint: &str) -> Option<&str> {
        self.special_categories.get(hint).map(String::as_str)
    }
}
