//! SpanCore: Entity Annotation Engine
//!
//! A Rust/WASM implementation of the inline-entity pipeline used for posts,
//! comments and bios.
//!
//! # Architecture
//!
//! ## Scanner Components
//! - `dictionary.rs` - DictionaryIndex: case-insensitive title lookup, first-seen-wins
//! - `mention.rs` - Mention scanner: `@handle` with email suppression + UserResolver
//! - `hashtag.rs` - Hashtag scanner: `#tag`, lowercase ids
//! - `terms.rs` - TermCortex: dictionary titles via Aho-Corasick, longest first, word boundaries
//! - `merge.rs` - Span merger: one non-overlapping, start-ordered span list
//! - `recipients.rs` - Mention recipients for the notification service
//! - `tally.rs` - HashtagTally: injected per-tag usage store
//! - `document.rs` - AnnotationCortex: **Unified scanner** - single scan() for all extraction
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { AnnotationCortex } from 'spancore';
//!
//! await init();
//!
//! const cortex = new AnnotationCortex();
//! cortex.hydrateDictionary([{ id: 'w1', title: 'Golden Retriever', popularity: 120 }]);
//! cortex.hydrateUsers([{ id: 'u42', username: 'alice' }]);
//!
//! const result = cortex.scan("Meet @alice and check out #PetCare — read about Golden Retriever health.");
//! console.log(result.spans);  // mention u42, hashtag petcare, dictionary_term w1
//! console.log(result.stats);  // timings per phase
//! ```
//!
//! # Usage (Rust)
//! ```
//! use spancore::{AnnotationCortex, DictionaryEntry, SpanKind};
//!
//! let mut cortex = AnnotationCortex::default();
//! cortex.hydrate_dictionary(vec![DictionaryEntry::new("w1", "Golden Retriever")]).unwrap();
//!
//! let resolve = |handle: &str| (handle == "alice").then(|| "u42".to_string());
//! let result = cortex.scan_with("@alice has a Golden Retriever", &resolve).unwrap();
//!
//! assert_eq!(result.spans.len(), 2);
//! assert_eq!(result.spans[0].kind, SpanKind::Mention);
//! assert_eq!(result.spans[1].entity_id, "w1");
//! ```

pub mod error;
pub mod scanner;

pub use error::*;
pub use scanner::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("spancore v{}", env!("CARGO_PKG_VERSION"))
}
