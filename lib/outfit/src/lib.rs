//! Outfit engine for vestx.
//!
//! Scores top/bottom pairings and turns a wardrobe into ranked outfit
//! recommendations:
//!
//! - [`harmony`]: color-wheel harmony between two primary colors
//! - [`score_pair`]: weighted four-factor compatibility verdict
//! - [`Selector`]: pre-filter, model re-rank, cache, and fall back
//! - [`rule_based`]: full cross-product ranking without a model call
//!
//! ## Example
//!
//! ```
//! use vestx_core::AttributeRecord;
//! use vestx_outfit::score_pair;
//!
//! let mut top = AttributeRecord::default();
//! top.color.primary = "navy".to_string();
//! let mut bottom = AttributeRecord::default();
//! bottom.color.primary = "cream".to_string();
//!
//! let verdict = score_pair(&top, &bottom);
//! assert!(verdict.score > 0.7);
//! assert!(verdict.reasons.contains(&"color harmony".to_string()));
//! ```

pub mod cache;
pub mod harmony;
pub mod score;
pub mod select;

pub use cache::{CachedOutfit, RecommendationCache, DEFAULT_CACHE_CAPACITY};
pub use harmony::harmony;
pub use score::{score_pair, Compatibility};
pub use select::{
    rule_based, Recommendation, Selection, SelectionMethod, Selector, PREFILTER_CANDIDATES,
    RERANK_MAX_TOKENS, RERANK_TEMPERATURE,
};
