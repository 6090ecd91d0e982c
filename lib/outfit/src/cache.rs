//! In-memory cache for re-ranked outfit selections.
//!
//! Keys are derived from the sorted item id lists plus the requested
//! count, so the same wardrobe slice asked the same question hits the
//! cache regardless of input order. Values hold only ids and verdicts;
//! rows are re-hydrated against the live collection on every hit. The
//! cache starts empty, is never persisted, and once the capacity is
//! reached new keys are simply not admitted.

use std::hash::{DefaultHasher, Hash, Hasher};

use ahash::AHashMap;
use parking_lot::Mutex;
use vestx_core::WardrobeItem;

/// Default number of cached selections when no capacity is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// One cached outfit row. Item ids only; the full items are looked up
/// again on retrieval so stale rows can be dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedOutfit {
    pub top_id: String,
    pub bottom_id: String,
    pub score: f64,
    pub reasoning: String,
    pub style_description: String,
}

/// Capacity-capped map from selection key to re-ranked rows.
#[derive(Debug)]
pub struct RecommendationCache {
    entries: Mutex<AHashMap<String, Vec<CachedOutfit>>>,
    capacity: usize,
}

impl RecommendationCache {
    pub fn new(capacity: usize) -> Self {
        RecommendationCache {
            entries: Mutex::new(AHashMap::new()),
            capacity,
        }
    }

    /// Deterministic key for a selection request: one hash over the
    /// sorted top ids, one over the sorted bottom ids, plus the count.
    pub fn key(tops: &[WardrobeItem], bottoms: &[WardrobeItem], count: usize) -> String {
        format!(
            "{}_{}_{}",
            hash_sorted_ids(tops),
            hash_sorted_ids(bottoms),
            count
        )
    }

    /// Cached rows for a key, if any.
    pub fn get(&self, key: &str) -> Option<Vec<CachedOutfit>> {
        self.entries.lock().get(key).cloned()
    }

    /// Admits a non-empty row set unless the cache is full. Re-writing
    /// an existing key is always allowed since it does not grow the map.
    pub fn insert(&self, key: String, rows: Vec<CachedOutfit>) {
        if rows.is_empty() {
            return;
        }
        let mut entries = self.entries.lock();
        if entries.len() < self.capacity || entries.contains_key(&key) {
            entries.insert(key, rows);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

fn hash_sorted_ids(items: &[WardrobeItem]) -> u64 {
    let mut ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    ids.sort_unstable();
    let mut hasher = DefaultHasher::new();
    ids.hash(&mut hasher);
    hasher.finish()
}
