//! Pairwise outfit compatibility scoring.
//!
//! Combines four independent sub-scores into a fixed weighted sum:
//! color harmony (0.4), style-tag overlap (0.3), formality proximity
//! (0.2) and season overlap (0.1). Alongside the score a short list of
//! human-readable reasons is collected for every sub-score that clears
//! its threshold.

use ahash::AHashSet;
use vestx_core::AttributeRecord;

use crate::harmony::harmony;

const COLOR_WEIGHT: f64 = 0.4;
const STYLE_WEIGHT: f64 = 0.3;
const FORMALITY_WEIGHT: f64 = 0.2;
const SEASON_WEIGHT: f64 = 0.1;

/// Compatibility verdict for one top/bottom pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct Compatibility {
    /// Weighted sum in `[0, 1]`.
    pub score: f64,
    /// Never empty: at least the generic `"balanced combination"`.
    pub reasons: Vec<String>,
}

/// Style-tag overlap scaled into `[0.3, 1.0]`.
///
/// Jaccard overlap of the two tag sets, or the 0.3 floor when either
/// side carries no tags at all.
fn style_match(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.3;
    }
    let set_a: AHashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: AHashSet<&str> = b.iter().map(String::as_str).collect();
    let common = set_a.intersection(&set_b).count() as f64;
    let total = set_a.union(&set_b).count() as f64;
    (0.3 + (common / total) * 0.7).min(1.0)
}

/// Formality proximity: equal formality scores 1.0, a gap of 0.5 or
/// more scores 0.0.
fn formality_match(a: f64, b: f64) -> f64 {
    (1.0 - (a - b).abs() * 2.0).max(0.0)
}

/// Season overlap: shared season 1.0, disjoint 0.3, and a neutral 0.5
/// when either side has no season information.
fn season_match(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.5;
    }
    let set_a: AHashSet<&str> = a.iter().map(String::as_str).collect();
    if b.iter().any(|season| set_a.contains(season.as_str())) {
        1.0
    } else {
        0.3
    }
}

/// Scores how well a top and a bottom work together.
///
/// Pure function of the two canonical records. The result is always in
/// `[0, 1]` and carries at least one reason string.
pub fn score_pair(top: &AttributeRecord, bottom: &AttributeRecord) -> Compatibility {
    let color = harmony(&top.color.primary, &bottom.color.primary);
    let style = style_match(&top.style_tags, &bottom.style_tags);
    let formality = formality_match(top.scores.formality, bottom.scores.formality);
    let season = season_match(&top.scores.season, &bottom.scores.season);

    let score = color * COLOR_WEIGHT
        + style * STYLE_WEIGHT
        + formality * FORMALITY_WEIGHT
        + season * SEASON_WEIGHT;

    let mut reasons = Vec::new();
    if color >= 0.8 {
        reasons.push("color harmony".to_string());
    }
    if style >= 0.6 {
        reasons.push("style match".to_string());
    }
    if formality >= 0.7 {
        reasons.push("formality balance".to_string());
    }
    if season >= 0.8 {
        reasons.push("season fit".to_string());
    }
    if reasons.is_empty() {
        reasons.push("balanced combination".to_string());
    }

    Compatibility { score, reasons }
}
