//! # vestX Extract
//!
//! Model-facing extraction layer for the vestX wardrobe engine.
//!
//! - [`ModelClient`] - the one-method boundary to a generative vision model
//! - [`GeminiClient`] - blocking Gemini REST implementation
//! - [`prompt`] - extraction and retry-feedback prompt construction
//! - [`extract_attributes`] - the at-most-two-calls orchestration loop
//!
//! The orchestrator guarantees a canonical [`vestx_core::AttributeRecord`]
//! for every reply the model manages to send; only transport-level
//! failures surface as [`ModelError`].

pub mod gemini;
pub mod model;
pub mod orchestrator;
pub mod prompt;

pub use gemini::{GeminiClient, DEFAULT_MODEL};
pub use model::{ImagePayload, ModelClient, ModelError};
pub use orchestrator::{extract_attributes, RetryPolicy};
