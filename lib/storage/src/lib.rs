//! Wardrobe persistence for vestx.
//!
//! A deliberately small file-backed store: each item is one pretty-printed
//! JSON document named by its id, with the source image saved alongside
//! under the same stem. No database, no index; the directory is the
//! source of truth and survives restarts as-is.

pub mod store;

pub use store::{SavedItem, WardrobeStore, IMAGE_EXTENSIONS};
