//! HTTP API for vestx.
//!
//! A thin actix-web layer over the library crates: extraction uploads,
//! wardrobe listing, pair scoring and outfit recommendation. Handlers
//! stay free of business logic; they validate input, run the blocking
//! pipelines on worker threads and shape JSON replies.

pub mod rest;

pub use rest::{AppState, RestApi};
