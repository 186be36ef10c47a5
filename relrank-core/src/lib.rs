//! RelRank: Related-Entry Ranking
//!
//! Picks the dictionary entries worth showing next to a post or article,
//! using the dictionary-term spans produced by `spancore`.
//!
//! # Architecture
//! - `config.rs` - Configuration types and defaults (special category hints)
//! - `types.rs` - Core data structures (RelevanceDocument, RankedEntry, RelevanceTier)
//! - `ranker.rs` - Main RelevanceRanker implementation
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { AnnotationCortex } from 'spancore';
//! import { RelevanceRanker } from 'relrank-core';
//!
//! await init();
//! const result = cortex.scan(body);
//! const ranker = new RelevanceRanker(entries);
//! const related = ranker.rank({ tags: ['puppies'], category_hint: 'health-update' }, result.spans);
//! ```
//!
//! The panic hook and allocator are installed by `spancore`.

mod config;
mod ranker;
mod types;

pub use config::*;
pub use ranker::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Get version information
#[wasm_bindgen(js_name = relrankVersion)]
pub fn relrank_version() -> String {
    format!("relrank-core v{}", env!("CARGO_PKG_VERSION"))
}
