//! Anchoring module
//!
//! Re-locates stored selectors in a document root:
//!
//! - quote search with prefix/suffix context scoring
//! - position fallback
//! - memoization through [`AnchorCache`]

mod cache;
mod engine;
mod quote;

pub use cache::{AnchorCache, AnchorCacheStats, DEFAULT_ANCHOR_CACHE_SIZE};
pub use engine::{
    anchor_selectors, create_selectors_from_range, validate_selectors, AnchorOptions,
    AnchorResult, TextAnchors, UsedSelector, ANCHOR_FAILURE_MESSAGE,
};
