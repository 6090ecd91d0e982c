//! # vestX Core
//!
//! Core library for the vestX wardrobe engine.
//!
//! This crate turns free-form generative-model text into canonical clothing
//! attribute records:
//!
//! - [`scan`] - balanced `{...}` / `[...]` candidate discovery in raw text
//! - [`repair`] - ordered syntax repair for almost-JSON model habits
//! - [`parse`] - candidate extraction + strict parse into [`serde_json::Value`]
//! - [`validate`] - shape-only schema validation with greppable messages
//! - [`normalize`] - total canonicalization onto [`AttributeRecord`]
//!
//! ## Example
//!
//! ```rust
//! use vestx_core::{normalize, parse, validate};
//!
//! let reply = "Here you go:\n```json\n{'category': {'main': 'Knitwear'},}\n```";
//! let outcome = parse::from_model_text(reply);
//! let value = outcome.value.unwrap();
//!
//! // Shape violations are reported, not fatal...
//! let report = validate::validate(&value);
//! assert!(!report.is_valid());
//!
//! // ...because canonicalization is total anyway.
//! let record = normalize::normalize(&value);
//! assert_eq!(record.category.main, "top");
//! assert_eq!(record.color.primary, "unknown");
//! ```

pub mod alias;
pub mod enums;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod record;
pub mod repair;
pub mod scan;
pub mod validate;

pub use alias::AliasKind;
pub use error::{Error, Result};
pub use normalize::normalize;
pub use parse::{from_model_text, ParseOutcome};
pub use record::{
    AttributeRecord, Category, ColorInfo, Details, FitInfo, MaterialInfo, Meta, PatternInfo,
    Scores, WardrobeItem,
};
pub use validate::{validate, SchemaReport, REQUIRED_KEYS};
