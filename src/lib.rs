//! # vestX
//!
//! Clothing attribute extraction and outfit recommendation.
//!
//! vestX turns free-form vision-model replies into canonical wardrobe
//! records, then scores and recommends outfit combinations from them.
//! Model output is treated as hostile input: candidate JSON is scanned
//! out of surrounding prose, repaired, shape-validated and canonicalized,
//! with one corrective retry before degrading to a marked default record.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! vestx --data-dir ./wardrobe --http-port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use vestx::prelude::*;
//!
//! // Score a pair of garments
//! let top = AttributeRecord::default();
//! let bottom = AttributeRecord::default();
//! let verdict = score_pair(&top, &bottom);
//! println!("{:.3}: {:?}", verdict.score, verdict.reasons);
//!
//! // Extract attributes from an image
//! let client = GeminiClient::new("api-key");
//! let image = ImagePayload::new("image/jpeg", std::fs::read("shirt.jpg").unwrap());
//! let record = extract_attributes(&client, &image, &RetryPolicy::default()).unwrap();
//! assert!(!record.category.main.is_empty());
//! ```
//!
//! ## Crate Structure
//!
//! vestX is composed of several crates:
//!
//! - [`vestx-core`](https://docs.rs/vestx-core) - JSON scan, repair, schema validation, canonical records
//! - [`vestx-extract`](https://docs.rs/vestx-extract) - Gemini client and the retry orchestrator
//! - [`vestx-outfit`](https://docs.rs/vestx-outfit) - color harmony, pair scoring, recommendation
//! - [`vestx-storage`](https://docs.rs/vestx-storage) - file-backed wardrobe store
//! - [`vestx-api`](https://docs.rs/vestx-api) - REST API
//!
//! ## Features
//!
//! - **Resilient parsing**: balanced-JSON scanning and ordered repair of model output
//! - **Total canonicalization**: every parsed reply becomes a usable record
//! - **Bounded retries**: at most two model calls per extraction
//! - **Color-wheel scoring**: hue distance, style, formality and season weighting
//! - **Model re-ranking**: rule-based pre-filter, generative re-rank, capacity-capped cache

// Re-export core types
pub use vestx_core::{
    from_model_text, normalize, validate,
    AttributeRecord, WardrobeItem,
    ParseOutcome, SchemaReport,
    Error, Result,
};

// Re-export extraction
pub use vestx_extract::{
    extract_attributes, GeminiClient, ImagePayload, ModelClient, ModelError, RetryPolicy,
    DEFAULT_MODEL,
};

// Re-export outfit scoring
pub use vestx_outfit::{
    harmony, rule_based, score_pair, Compatibility, Recommendation, Selection, SelectionMethod,
    Selector,
};

// Re-export storage
pub use vestx_storage::{SavedItem, WardrobeStore};

// Re-export API
pub use vestx_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        extract_attributes, harmony, normalize, rule_based, score_pair,
        AttributeRecord, WardrobeItem,
        Compatibility, Recommendation, Selection, Selector,
        Error, Result,
        GeminiClient, ImagePayload, ModelClient, ModelError, RetryPolicy,
        SavedItem, WardrobeStore,
        AppState, RestApi,
    };
}
