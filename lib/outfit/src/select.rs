//! Outfit candidate selection.
//!
//! The selector ranks every top/bottom pairing with the rule-based
//! scorer, keeps a small fixed set of leading candidates, and asks the
//! generative model to re-rank just those. Re-ranked selections are
//! cached by request key; any model-side failure falls back to the
//! pre-filtered candidates so a selection is always produced without a
//! second model call.

use std::cmp::Ordering;
use std::sync::Arc;

use ahash::AHashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use vestx_core::{from_model_text, WardrobeItem};
use vestx_extract::ModelClient;

use crate::cache::{CachedOutfit, RecommendationCache};
use crate::score::{score_pair, Compatibility};

/// How many rule-ranked pairings are handed to the model for
/// re-ranking, independent of the requested result count.
pub const PREFILTER_CANDIDATES: usize = 5;

/// Sampling temperature for the re-ranking call.
pub const RERANK_TEMPERATURE: f64 = 0.7;

/// Output token budget for the re-ranking call.
pub const RERANK_MAX_TOKENS: u32 = 500;

/// Reasoning text stamped on fallback rows.
const FALLBACK_REASONING: &str = "rule-based recommendation";

/// Expected shape of one re-ranked entry, spliced into the prompt.
const REPLY_SHAPE: &str = r#"{
  "top_id": "string",
  "bottom_id": "string",
  "score": 0.0-1.0,
  "reasoning": "one sentence, max 100 characters",
  "style_description": "short label, max 50 characters"
}"#;

/// One recommended outfit, carrying the full items so callers need no
/// further lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub top: WardrobeItem,
    pub bottom: WardrobeItem,
    pub score: f64,
    pub reasoning: String,
    pub style_description: String,
    pub reasons: Vec<String>,
}

/// How a selection was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    /// Model re-ranking, or a cache hit on a previously re-ranked set.
    ModelOptimized,
    /// Rule-based scoring only.
    RuleBased,
}

impl SelectionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMethod::ModelOptimized => "model-optimized",
            SelectionMethod::RuleBased => "rule-based",
        }
    }
}

/// A produced selection plus the method that produced it.
#[derive(Debug, Clone)]
pub struct Selection {
    pub outfits: Vec<Recommendation>,
    pub method: SelectionMethod,
}

/// A scored pairing kept by the pre-filter.
struct Candidate<'a> {
    top: &'a WardrobeItem,
    bottom: &'a WardrobeItem,
    verdict: Compatibility,
}

/// Compact per-item view sent to the model instead of full records.
#[derive(Serialize)]
struct ItemSummary<'a> {
    id: &'a str,
    cat: &'a str,
    col: &'a str,
    style: &'a [String],
    form: f64,
}

fn summarize(item: &WardrobeItem) -> ItemSummary<'_> {
    let attrs = &item.attributes;
    let style_end = attrs.style_tags.len().min(3);
    ItemSummary {
        id: &item.id,
        cat: &attrs.category.sub,
        col: &attrs.color.primary,
        style: &attrs.style_tags[..style_end],
        form: (attrs.scores.formality * 100.0).round() / 100.0,
    }
}

/// Selects outfits by rule-based pre-filtering plus model re-ranking,
/// with a capacity-capped cache in front of the model.
pub struct Selector {
    model: Arc<dyn ModelClient>,
    cache: RecommendationCache,
}

impl Selector {
    pub fn new(model: Arc<dyn ModelClient>, cache_capacity: usize) -> Self {
        Selector {
            model,
            cache: RecommendationCache::new(cache_capacity),
        }
    }

    /// Number of selections currently cached.
    pub fn cached_selections(&self) -> usize {
        self.cache.len()
    }

    /// Produces up to `count` outfit recommendations for the given
    /// wardrobe slice.
    ///
    /// Cache hits are re-hydrated against the live items; rows whose
    /// items have disappeared are dropped, and a fully stale entry
    /// falls through to a fresh computation. On a miss the top
    /// [`PREFILTER_CANDIDATES`] pairings are re-ranked by the model;
    /// a failed or empty re-rank falls back to those same candidates
    /// stamped with a generic reasoning.
    pub fn recommend(
        &self,
        tops: &[WardrobeItem],
        bottoms: &[WardrobeItem],
        count: usize,
    ) -> Selection {
        let key = RecommendationCache::key(tops, bottoms, count);

        if let Some(cached) = self.cache.get(&key) {
            let mut rows = rehydrate(&cached, tops, bottoms);
            if !rows.is_empty() {
                debug!(%key, rows = rows.len(), "recommendation cache hit");
                rows.truncate(count);
                return Selection {
                    outfits: rows,
                    method: SelectionMethod::ModelOptimized,
                };
            }
            debug!(%key, "cached rows no longer resolve, recomputing");
        }

        let candidates = prefilter(tops, bottoms, PREFILTER_CANDIDATES);
        if candidates.is_empty() {
            return Selection {
                outfits: Vec::new(),
                method: SelectionMethod::RuleBased,
            };
        }

        match self.rerank(&candidates, tops, bottoms, count) {
            Some(rows) if !rows.is_empty() => {
                let cached: Vec<CachedOutfit> = rows
                    .iter()
                    .map(|row| CachedOutfit {
                        top_id: row.top.id.clone(),
                        bottom_id: row.bottom.id.clone(),
                        score: row.score,
                        reasoning: row.reasoning.clone(),
                        style_description: row.style_description.clone(),
                    })
                    .collect();
                self.cache.insert(key, cached);

                let mut outfits = rows;
                outfits.truncate(count);
                Selection {
                    outfits,
                    method: SelectionMethod::ModelOptimized,
                }
            }
            _ => Selection {
                outfits: fallback(&candidates, count),
                method: SelectionMethod::RuleBased,
            },
        }
    }

    /// One model call over the candidate summaries. `None` on any
    /// failure, including a reply that maps to no known item pair.
    fn rerank(
        &self,
        candidates: &[Candidate<'_>],
        tops: &[WardrobeItem],
        bottoms: &[WardrobeItem],
        count: usize,
    ) -> Option<Vec<Recommendation>> {
        let mut seen_tops: AHashMap<&str, &WardrobeItem> = AHashMap::new();
        let mut seen_bottoms: AHashMap<&str, &WardrobeItem> = AHashMap::new();
        let mut tops_summary = Vec::new();
        let mut bottoms_summary = Vec::new();
        for candidate in candidates {
            if !seen_tops.contains_key(candidate.top.id.as_str()) {
                seen_tops.insert(candidate.top.id.as_str(), candidate.top);
                tops_summary.push(summarize(candidate.top));
            }
            if !seen_bottoms.contains_key(candidate.bottom.id.as_str()) {
                seen_bottoms.insert(candidate.bottom.id.as_str(), candidate.bottom);
                bottoms_summary.push(summarize(candidate.bottom));
            }
        }

        let tops_json = serde_json::to_string(&tops_summary).ok()?;
        let bottoms_json = serde_json::to_string(&bottoms_summary).ok()?;
        let prompt = rerank_prompt(count, candidates.len(), &tops_json, &bottoms_json);

        let reply = match self.model.generate(&prompt, None) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "re-rank model call failed");
                return None;
            }
        };

        let outcome = from_model_text(&reply);
        let entries = match outcome.value {
            Some(Value::Array(entries)) => entries,
            Some(value @ Value::Object(_)) => vec![value],
            _ => {
                warn!("re-rank reply carried no JSON payload");
                return None;
            }
        };

        let mut rows = Vec::new();
        for entry in &entries {
            let top_id = entry.get("top_id").and_then(Value::as_str).unwrap_or("");
            let bottom_id = entry.get("bottom_id").and_then(Value::as_str).unwrap_or("");
            let top = seen_tops
                .get(top_id)
                .copied()
                .or_else(|| tops.iter().find(|item| item.id == top_id));
            let bottom = seen_bottoms
                .get(bottom_id)
                .copied()
                .or_else(|| bottoms.iter().find(|item| item.id == bottom_id));

            if let (Some(top), Some(bottom)) = (top, bottom) {
                let reasoning = entry
                    .get("reasoning")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                let reasons = if reasoning.is_empty() {
                    Vec::new()
                } else {
                    vec![reasoning.clone()]
                };
                rows.push(Recommendation {
                    top: top.clone(),
                    bottom: bottom.clone(),
                    score: entry_score(entry.get("score")),
                    reasoning,
                    style_description: entry
                        .get("style_description")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    reasons,
                });
            }
        }
        Some(rows)
    }
}

/// Rule-based ranking over the full cross product, for when model
/// re-ranking is disabled. Scores are rounded to three decimals and
/// each row keeps its scorer reasons, joined into the reasoning text.
pub fn rule_based(
    tops: &[WardrobeItem],
    bottoms: &[WardrobeItem],
    count: usize,
) -> Vec<Recommendation> {
    let mut rows: Vec<Recommendation> = Vec::with_capacity(tops.len() * bottoms.len());
    for top in tops {
        for bottom in bottoms {
            let verdict = score_pair(&top.attributes, &bottom.attributes);
            let reasoning = verdict.reasons.join(", ");
            rows.push(Recommendation {
                top: top.clone(),
                bottom: bottom.clone(),
                score: round3(verdict.score),
                reasoning,
                style_description: style_label(top, bottom),
                reasons: verdict.reasons,
            });
        }
    }
    rows.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    rows.truncate(count);
    rows
}

/// Scores every pairing and keeps the `keep` best, ties preserving
/// cross-product order.
fn prefilter<'a>(
    tops: &'a [WardrobeItem],
    bottoms: &'a [WardrobeItem],
    keep: usize,
) -> Vec<Candidate<'a>> {
    let mut candidates = Vec::with_capacity(tops.len() * bottoms.len());
    for top in tops {
        for bottom in bottoms {
            let verdict = score_pair(&top.attributes, &bottom.attributes);
            candidates.push(Candidate {
                top,
                bottom,
                verdict,
            });
        }
    }
    candidates.sort_by(|a, b| {
        b.verdict
            .score
            .partial_cmp(&a.verdict.score)
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(keep);
    candidates
}

fn rerank_prompt(count: usize, pairs: usize, tops_json: &str, bottoms_json: &str) -> String {
    format!(
        "Recommend {count} best outfit(s) from these {pairs} pre-filtered combinations.\n\
         \n\
         Tops: {tops_json}\n\
         Bottoms: {bottoms_json}\n\
         \n\
         Consider color harmony, style match, formality balance.\n\
         \n\
         Return JSON array with {count} object(s):\n\
         {REPLY_SHAPE}\n\
         \n\
         JSON only, no markdown."
    )
}

/// Score field coercion: numbers and numeric strings clamp into
/// `[0, 1]`, anything else falls back to 0.5.
fn entry_score(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
        _ => 0.5,
    }
}

fn fallback(candidates: &[Candidate<'_>], count: usize) -> Vec<Recommendation> {
    candidates
        .iter()
        .take(count)
        .map(|candidate| Recommendation {
            top: candidate.top.clone(),
            bottom: candidate.bottom.clone(),
            score: candidate.verdict.score,
            reasoning: FALLBACK_REASONING.to_string(),
            style_description: style_label(candidate.top, candidate.bottom),
            reasons: Vec::new(),
        })
        .collect()
}

fn rehydrate(
    cached: &[CachedOutfit],
    tops: &[WardrobeItem],
    bottoms: &[WardrobeItem],
) -> Vec<Recommendation> {
    let mut rows = Vec::new();
    for entry in cached {
        let top = tops.iter().find(|item| item.id == entry.top_id);
        let bottom = bottoms.iter().find(|item| item.id == entry.bottom_id);
        if let (Some(top), Some(bottom)) = (top, bottom) {
            let reasons = if entry.reasoning.is_empty() {
                Vec::new()
            } else {
                vec![entry.reasoning.clone()]
            };
            rows.push(Recommendation {
                top: top.clone(),
                bottom: bottom.clone(),
                score: entry.score,
                reasoning: entry.reasoning.clone(),
                style_description: entry.style_description.clone(),
                reasons,
            });
        }
    }
    rows
}

fn style_label(top: &WardrobeItem, bottom: &WardrobeItem) -> String {
    format!(
        "{} & {}",
        top.attributes.category.sub, bottom.attributes.category.sub
    )
}

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use vestx_core::AttributeRecord;
    use vestx_extract::{ImagePayload, ModelError};

    /// Scripted model: pops canned replies and records every prompt.
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, ModelError>>>,
        prompts: Mutex<Vec<(String, bool)>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<String, ModelError>>) -> Self {
            ScriptedModel {
                replies: Mutex::new(replies.into_iter().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().len()
        }

        fn prompt(&self, idx: usize) -> (String, bool) {
            self.prompts.lock()[idx].clone()
        }
    }

    impl ModelClient for ScriptedModel {
        fn generate(
            &self,
            prompt: &str,
            image: Option<&ImagePayload>,
        ) -> Result<String, ModelError> {
            self.prompts
                .lock()
                .push((prompt.to_string(), image.is_some()));
            self.replies
                .lock()
                .pop_front()
                .unwrap_or(Err(ModelError::EmptyResponse))
        }
    }

    fn item(id: &str, sub: &str, primary: &str) -> WardrobeItem {
        let mut rec = AttributeRecord::default();
        rec.category.sub = sub.to_string();
        rec.color.primary = primary.to_string();
        WardrobeItem::new(id, rec, None)
    }

    fn selector(replies: Vec<Result<String, ModelError>>) -> (Arc<ScriptedModel>, Selector) {
        let model = Arc::new(ScriptedModel::new(replies));
        let sel = Selector::new(model.clone(), 100);
        (model, sel)
    }

    // default records everywhere: score = 0.4 * harmony + 0.34

    #[test]
    fn test_prefilter_ranks_by_score() {
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [
            item("b1", "jeans", "red"),
            item("b2", "slacks", "cream"),
            item("b3", "shorts", "black"),
        ];
        let kept = prefilter(&tops, &bottoms, 2);
        assert_eq!(kept.len(), 2);
        // cream complementary 0.95, black neutral 0.8, red triadic 0.75
        assert_eq!(kept[0].bottom.id, "b2");
        assert_eq!(kept[1].bottom.id, "b3");
    }

    #[test]
    fn test_rerank_maps_and_caches() {
        let reply = r#"[{"top_id": "t1", "bottom_id": "b1", "score": 0.93,
                         "reasoning": "crisp contrast", "style_description": "tshirt & jeans"}]"#;
        let (model, sel) = selector(vec![Ok(reply.to_string())]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream"), item("b2", "shorts", "red")];

        let selection = sel.recommend(&tops, &bottoms, 1);
        assert_eq!(selection.method, SelectionMethod::ModelOptimized);
        assert_eq!(selection.outfits.len(), 1);
        let row = &selection.outfits[0];
        assert_eq!(row.top.id, "t1");
        assert_eq!(row.bottom.id, "b1");
        assert_eq!(row.score, 0.93);
        assert_eq!(row.reasoning, "crisp contrast");
        assert_eq!(row.reasons, vec!["crisp contrast"]);
        assert_eq!(sel.cached_selections(), 1);

        let (prompt, with_image) = model.prompt(0);
        assert!(!with_image);
        assert!(prompt.contains("pre-filtered combinations"));
        assert!(prompt.contains(r#""id":"t1""#));
        assert!(prompt.contains("JSON only, no markdown."));
    }

    #[test]
    fn test_second_identical_request_is_a_cache_hit() {
        let reply = r#"[{"top_id": "t1", "bottom_id": "b1", "score": 0.9,
                         "reasoning": "works", "style_description": "x"}]"#;
        let (model, sel) = selector(vec![Ok(reply.to_string())]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream")];

        let first = sel.recommend(&tops, &bottoms, 1);
        let second = sel.recommend(&tops, &bottoms, 1);
        assert_eq!(model.calls(), 1);
        assert_eq!(second.method, SelectionMethod::ModelOptimized);
        assert_eq!(first.outfits, second.outfits);
    }

    fn cached_row(top_id: &str, bottom_id: &str) -> CachedOutfit {
        CachedOutfit {
            top_id: top_id.to_string(),
            bottom_id: bottom_id.to_string(),
            score: 0.9,
            reasoning: "works".to_string(),
            style_description: "x".to_string(),
        }
    }

    #[test]
    fn test_cached_rows_for_missing_items_are_skipped() {
        let (model, sel) = selector(Vec::new());
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream")];
        let key = RecommendationCache::key(&tops, &bottoms, 2);
        sel.cache.insert(
            key,
            vec![cached_row("t1", "gone"), cached_row("t1", "b1")],
        );

        let selection = sel.recommend(&tops, &bottoms, 2);
        assert_eq!(model.calls(), 0);
        assert_eq!(selection.method, SelectionMethod::ModelOptimized);
        assert_eq!(selection.outfits.len(), 1);
        assert_eq!(selection.outfits[0].bottom.id, "b1");
    }

    #[test]
    fn test_fully_stale_cache_entry_recomputes() {
        let reply = r#"[{"top_id": "t1", "bottom_id": "b1", "score": 0.9,
                         "reasoning": "works", "style_description": "x"}]"#;
        let (model, sel) = selector(vec![Ok(reply.to_string())]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream")];
        let key = RecommendationCache::key(&tops, &bottoms, 1);
        sel.cache.insert(key, vec![cached_row("gone", "gone")]);

        let selection = sel.recommend(&tops, &bottoms, 1);
        assert_eq!(model.calls(), 1);
        assert_eq!(selection.method, SelectionMethod::ModelOptimized);
        assert_eq!(selection.outfits[0].bottom.id, "b1");
    }

    #[test]
    fn test_model_error_falls_back_to_rules() {
        let (model, sel) = selector(vec![Err(ModelError::Api {
            status: 500,
            message: "boom".to_string(),
        })]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream"), item("b2", "shorts", "red")];

        let selection = sel.recommend(&tops, &bottoms, 2);
        assert_eq!(model.calls(), 1);
        assert_eq!(selection.method, SelectionMethod::RuleBased);
        assert_eq!(selection.outfits.len(), 2);
        let row = &selection.outfits[0];
        assert_eq!(row.bottom.id, "b1");
        assert_eq!(row.reasoning, "rule-based recommendation");
        assert!(row.reasons.is_empty());
        assert!((row.score - 0.72).abs() < 1e-12);
        assert_eq!(sel.cached_selections(), 0);
    }

    #[test]
    fn test_unparseable_reply_falls_back() {
        let (_, sel) = selector(vec![Ok("sorry, cannot help with that".to_string())]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream")];

        let selection = sel.recommend(&tops, &bottoms, 1);
        assert_eq!(selection.method, SelectionMethod::RuleBased);
        assert_eq!(selection.outfits[0].style_description, "tshirt & jeans");
        assert_eq!(sel.cached_selections(), 0);
    }

    #[test]
    fn test_single_object_reply_is_accepted() {
        let reply = r#"{"top_id": "t1", "bottom_id": "b1", "score": 0.8,
                        "reasoning": "fine", "style_description": "x"}"#;
        let (_, sel) = selector(vec![Ok(reply.to_string())]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream")];

        let selection = sel.recommend(&tops, &bottoms, 1);
        assert_eq!(selection.method, SelectionMethod::ModelOptimized);
        assert_eq!(selection.outfits.len(), 1);
    }

    #[test]
    fn test_unknown_ids_fall_back_without_caching() {
        let reply = r#"[{"top_id": "ghost", "bottom_id": "b1", "score": 0.8,
                         "reasoning": "fine", "style_description": "x"}]"#;
        let (_, sel) = selector(vec![Ok(reply.to_string())]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream")];

        let selection = sel.recommend(&tops, &bottoms, 1);
        assert_eq!(selection.method, SelectionMethod::RuleBased);
        assert_eq!(sel.cached_selections(), 0);
    }

    #[test]
    fn test_score_coercion_per_entry() {
        let reply = r#"[
            {"top_id": "t1", "bottom_id": "b1", "score": "0.8"},
            {"top_id": "t1", "bottom_id": "b2", "score": 7},
            {"top_id": "t1", "bottom_id": "b3"}
        ]"#;
        let (_, sel) = selector(vec![Ok(reply.to_string())]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [
            item("b1", "jeans", "cream"),
            item("b2", "shorts", "red"),
            item("b3", "slacks", "black"),
        ];

        let selection = sel.recommend(&tops, &bottoms, 3);
        let scores: Vec<f64> = selection.outfits.iter().map(|row| row.score).collect();
        assert_eq!(scores, vec![0.8, 1.0, 0.5]);
        // absent reasoning leaves the reasons list empty
        assert!(selection.outfits[0].reasons.is_empty());
        assert_eq!(selection.outfits[0].reasoning, "");
    }

    #[test]
    fn test_extra_rows_are_truncated_but_cached_whole() {
        let reply = r#"[
            {"top_id": "t1", "bottom_id": "b1", "score": 0.9, "reasoning": "a", "style_description": "x"},
            {"top_id": "t1", "bottom_id": "b2", "score": 0.7, "reasoning": "b", "style_description": "y"}
        ]"#;
        let (_, sel) = selector(vec![Ok(reply.to_string())]);
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [item("b1", "jeans", "cream"), item("b2", "shorts", "red")];

        let selection = sel.recommend(&tops, &bottoms, 1);
        assert_eq!(selection.outfits.len(), 1);

        let key = RecommendationCache::key(&tops, &bottoms, 1);
        assert_eq!(sel.cache.get(&key).map(|rows| rows.len()), Some(2));
    }

    #[test]
    fn test_empty_collections_produce_empty_selection() {
        let (model, sel) = selector(Vec::new());
        let selection = sel.recommend(&[], &[item("b1", "jeans", "cream")], 1);
        assert!(selection.outfits.is_empty());
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn test_rule_based_ranks_full_cross_product() {
        let tops = [item("t1", "tshirt", "navy")];
        let bottoms = [
            item("b1", "jeans", "red"),
            item("b2", "slacks", "cream"),
            item("b3", "shorts", "unknown"),
        ];

        let rows = rule_based(&tops, &bottoms, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bottom.id, "b2");
        assert_eq!(rows[0].score, 0.72);
        assert_eq!(rows[0].reasoning, "color harmony, formality balance");
        assert_eq!(rows[0].reasons, vec!["color harmony", "formality balance"]);
        assert_eq!(rows[0].style_description, "tshirt & slacks");
        assert_eq!(rows[1].bottom.id, "b1");
        assert_eq!(rows[1].score, 0.64);
    }

    #[test]
    fn test_recommendation_serializes_in_declared_order() {
        let rows = rule_based(
            &[item("t1", "tshirt", "navy")],
            &[item("b1", "jeans", "cream")],
            1,
        );
        let json = serde_json::to_string(&rows[0]).unwrap();
        let top_at = json.find(r#""top""#).unwrap();
        let score_at = json.find(r#""score""#).unwrap();
        let reasons_at = json.find(r#""reasons""#).unwrap();
        assert!(top_at < score_at && score_at < reasons_at);
    }
}
