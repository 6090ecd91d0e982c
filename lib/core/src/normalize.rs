//! Total canonicalization of arbitrary parsed values into [`AttributeRecord`]s.
//!
//! Normalization never fails and never returns a partial record. Whatever
//! the model produced, every field lands on a dictionary member or the
//! `"unknown"` sentinel, every number is clamped into `[0, 1]` or replaced
//! by its documented default, and list fields respect their caps. This
//! totality is what lets the orchestrator ship a usable record even when
//! schema validation still fails after the retry.
//!
//! Per string field the order is fixed: trim and lowercase, fold through
//! the alias table, then gate on dictionary membership.

use serde_json::{Map, Value};

use crate::alias::{self, AliasKind};
use crate::enums::{self, UNKNOWN};
use crate::record::AttributeRecord;

/// List caps, applied after membership gating.
pub const MAX_SECONDARY_COLORS: usize = 3;
pub const MAX_CLOSURES: usize = 3;
pub const MAX_STYLE_TAGS: usize = 8;
pub const MAX_SEASONS: usize = 4;

/// Canonicalizes any parsed value into a complete record.
///
/// Missing sections, wrong-typed sections and a non-object top level all
/// degrade field-by-field to the defaults of [`AttributeRecord::default`].
pub fn normalize(value: &Value) -> AttributeRecord {
    let mut out = AttributeRecord::default();
    let Some(obj) = value.as_object() else {
        return out;
    };

    let cat = section(obj, "category");
    out.category.main = gate(
        enums::CATEGORY_MAIN,
        alias_norm(field(cat, "main"), AliasKind::CategoryMain),
    );
    out.category.sub = gate(enums::CATEGORY_SUB, norm_string(field(cat, "sub"), UNKNOWN));
    out.category.confidence = clamp01(field(cat, "confidence"), out.category.confidence);

    let col = section(obj, "color");
    out.color.primary = gate(
        enums::COLOR,
        alias_norm(field(col, "primary"), AliasKind::Color),
    );
    out.color.secondary = string_list(field(col, "secondary"))
        .into_iter()
        .map(|token| gate(enums::COLOR, resolve_token(AliasKind::Color, token)))
        .filter(|token| token != UNKNOWN)
        .take(MAX_SECONDARY_COLORS)
        .collect();
    out.color.tone = gate(enums::TONE, alias_norm(field(col, "tone"), AliasKind::Tone));
    out.color.confidence = clamp01(field(col, "confidence"), out.color.confidence);

    let pat = section(obj, "pattern");
    out.pattern.kind = gate(enums::PATTERN, norm_string(field(pat, "type"), UNKNOWN));
    out.pattern.confidence = clamp01(field(pat, "confidence"), out.pattern.confidence);

    let mat = section(obj, "material");
    out.material.guess = gate(enums::MATERIAL, norm_string(field(mat, "guess"), UNKNOWN));
    out.material.confidence = clamp01(field(mat, "confidence"), out.material.confidence);

    let fit = section(obj, "fit");
    out.fit.kind = gate(enums::FIT, norm_string(field(fit, "type"), UNKNOWN));
    out.fit.confidence = clamp01(field(fit, "confidence"), out.fit.confidence);

    let det = section(obj, "details");
    out.details.neckline = gate(
        enums::NECKLINE,
        alias_norm(field(det, "neckline"), AliasKind::Neckline),
    );
    out.details.sleeve = gate(enums::SLEEVE, norm_string(field(det, "sleeve"), UNKNOWN));
    out.details.length = gate(enums::LENGTH, norm_string(field(det, "length"), UNKNOWN));
    // Absent closure means "we do not know", not "no closure"; the sentinel
    // list survives gating because closure keeps unknown entries.
    let mut closure: Vec<String> = match field(det, "closure") {
        None => vec![UNKNOWN.to_string()],
        Some(value) => string_list(Some(value)),
    }
    .into_iter()
    .map(|token| gate(enums::CLOSURE, resolve_token(AliasKind::Closure, token)))
    .take(MAX_CLOSURES)
    .collect();
    if closure.is_empty() {
        closure.push(UNKNOWN.to_string());
    }
    out.details.closure = closure;
    out.details.print_or_logo = as_bool(field(det, "print_or_logo"), false);

    out.style_tags = string_list(obj.get("style_tags"))
        .into_iter()
        .map(|token| gate(enums::STYLE_TAGS, token))
        .filter(|token| token != UNKNOWN)
        .take(MAX_STYLE_TAGS)
        .collect();

    let sc = section(obj, "scores");
    out.scores.formality = clamp01(field(sc, "formality"), out.scores.formality);
    out.scores.warmth = clamp01(field(sc, "warmth"), out.scores.warmth);
    out.scores.versatility = clamp01(field(sc, "versatility"), out.scores.versatility);
    out.scores.season = string_list(field(sc, "season"))
        .into_iter()
        .map(|token| gate(enums::SEASON, token))
        .filter(|token| token != UNKNOWN)
        .take(MAX_SEASONS)
        .collect();

    let meta = section(obj, "meta");
    out.meta.is_layering_piece = as_bool(field(meta, "is_layering_piece"), false);
    out.meta.notes = match field(meta, "notes") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    out.confidence = clamp01(obj.get("confidence"), out.confidence);
    out
}

fn section<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a Map<String, Value>> {
    obj.get(name).and_then(Value::as_object)
}

fn field<'a>(map: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    map.and_then(|m| m.get(key))
}

/// Trim + lowercase, with scalar-to-string coercion. Containers and null
/// collapse to the default; they can never name a dictionary token.
fn norm_string(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => norm_token(s, default),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => default.to_string(),
    }
}

fn norm_token(raw: &str, default: &str) -> String {
    let token = raw.trim().to_lowercase();
    if token.is_empty() {
        default.to_string()
    } else {
        token
    }
}

fn alias_norm(value: Option<&Value>, kind: AliasKind) -> String {
    resolve_token(kind, norm_string(value, UNKNOWN))
}

fn resolve_token(kind: AliasKind, token: String) -> String {
    let resolved = alias::resolve(kind, &token);
    if resolved == token {
        token
    } else {
        resolved.to_string()
    }
}

fn gate(dictionary: &[&str], token: String) -> String {
    enums::member_or_unknown(dictionary, &token)
}

/// Clamps a coercible number into `[0, 1]`. Numeric strings count;
/// non-finite values and failed coercions fall back to the default.
fn clamp01(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => default,
    }
}

fn as_bool(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => true,
            "false" | "0" | "no" | "n" => false,
            _ => default,
        },
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
        _ => default,
    }
}

/// Coerces a value into a list of normalized tokens. Lists map
/// element-wise, comma-joined strings split, lone scalars wrap. No
/// membership gating happens here.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| norm_string(Some(item), UNKNOWN))
            .collect(),
        Some(Value::String(s)) if s.contains(',') => s
            .split(',')
            .map(|part| norm_token(part, UNKNOWN))
            .collect(),
        Some(other) => vec![norm_string(Some(other), UNKNOWN)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_yields_default_record() {
        assert_eq!(normalize(&json!({})), AttributeRecord::default());
    }

    #[test]
    fn test_non_object_input_is_total() {
        assert_eq!(normalize(&json!([1, 2, 3])), AttributeRecord::default());
        assert_eq!(normalize(&json!("prose")), AttributeRecord::default());
        assert_eq!(normalize(&json!(null)), AttributeRecord::default());
    }

    #[test]
    fn test_valid_values_pass_through_lowercased() {
        let record = normalize(&json!({
            "category": {"main": "Top", "sub": "TSHIRT", "confidence": 0.9},
            "color": {"primary": "  Navy ", "tone": "dark", "confidence": 0.8},
            "fit": {"type": "Regular"},
            "style_tags": ["Casual", "Minimal"]
        }));
        assert_eq!(record.category.main, "top");
        assert_eq!(record.category.sub, "tshirt");
        assert_eq!(record.color.primary, "navy");
        assert_eq!(record.fit.kind, "regular");
        assert_eq!(record.style_tags, vec!["casual", "minimal"]);
        assert_eq!(record.category.confidence, 0.9);
    }

    #[test]
    fn test_aliases_fold_before_gating() {
        let record = normalize(&json!({
            "category": {"main": "Knitwear"},
            "color": {"primary": "Navy Blue", "secondary": ["light blue"], "tone": "navy"},
            "details": {"neckline": "Crew Neck", "closure": ["no closure"]}
        }));
        assert_eq!(record.category.main, "top");
        assert_eq!(record.color.primary, "navy");
        assert_eq!(record.color.secondary, vec!["skyblue"]);
        assert_eq!(record.color.tone, "dark");
        assert_eq!(record.details.neckline, "crew");
        assert_eq!(record.details.closure, vec!["none"]);
    }

    #[test]
    fn test_out_of_dictionary_collapses_to_unknown() {
        let record = normalize(&json!({
            "category": {"main": "spacesuit", "sub": "exoskeleton"},
            "color": {"primary": "turquoise", "tone": "shiny"},
            "pattern": {"type": "tartan-ish"}
        }));
        assert_eq!(record.category.main, "unknown");
        assert_eq!(record.category.sub, "unknown");
        assert_eq!(record.color.primary, "unknown");
        assert_eq!(record.color.tone, "unknown");
        assert_eq!(record.pattern.kind, "unknown");
    }

    #[test]
    fn test_filtered_lists_drop_unknown_and_cap() {
        let record = normalize(&json!({
            "color": {"secondary": ["white", "turquoise", "beige", "cream", "black"]},
            "style_tags": [
                "minimal", "classic", "street", "sporty", "feminine",
                "vintage", "business", "formal", "casual", "other"
            ],
            "scores": {"season": ["spring", "summer", "fall", "winter", "monsoon"]}
        }));
        // turquoise dropped, then capped at three.
        assert_eq!(record.color.secondary, vec!["white", "beige", "cream"]);
        assert_eq!(record.style_tags.len(), MAX_STYLE_TAGS);
        assert_eq!(record.scores.season, vec!["spring", "summer", "fall", "winter"]);
    }

    #[test]
    fn test_comma_joined_string_becomes_list() {
        let record = normalize(&json!({"style_tags": "Minimal, Classic, bogus"}));
        assert_eq!(record.style_tags, vec!["minimal", "classic"]);
    }

    #[test]
    fn test_lone_scalar_wraps_into_list() {
        let record = normalize(&json!({"scores": {"season": "winter"}}));
        assert_eq!(record.scores.season, vec!["winter"]);
    }

    #[test]
    fn test_closure_keeps_sentinel_and_falls_back() {
        // Unknown closures are kept, not dropped.
        let record = normalize(&json!({"details": {"closure": ["velcro"]}}));
        assert_eq!(record.details.closure, vec!["unknown"]);

        // Null and empty lists fall back to the sentinel list.
        let record = normalize(&json!({"details": {"closure": null}}));
        assert_eq!(record.details.closure, vec!["unknown"]);
        let record = normalize(&json!({"details": {"closure": []}}));
        assert_eq!(record.details.closure, vec!["unknown"]);

        // Real closures cap at three.
        let record = normalize(&json!({
            "details": {"closure": ["zipper", "button", "open", "none"]}
        }));
        assert_eq!(record.details.closure, vec!["zipper", "button", "open"]);
    }

    #[test]
    fn test_confidence_clamping_and_coercion() {
        let record = normalize(&json!({
            "category": {"confidence": 1.7},
            "color": {"confidence": -3},
            "pattern": {"confidence": "0.65"},
            "material": {"confidence": "not a number"},
            "confidence": "NaN"
        }));
        assert_eq!(record.category.confidence, 1.0);
        assert_eq!(record.color.confidence, 0.0);
        assert_eq!(record.pattern.confidence, 0.65);
        // Coercion failures keep the section default.
        assert_eq!(record.material.confidence, 0.2);
        assert_eq!(record.confidence, 0.2);
    }

    #[test]
    fn test_non_finite_strings_fall_back() {
        let record = normalize(&json!({"confidence": "inf", "scores": {"warmth": "-inf"}}));
        assert_eq!(record.confidence, 0.2);
        assert_eq!(record.scores.warmth, 0.3);
    }

    #[test]
    fn test_bool_coercions() {
        let record = normalize(&json!({
            "details": {"print_or_logo": "Yes"},
            "meta": {"is_layering_piece": 1}
        }));
        assert!(record.details.print_or_logo);
        assert!(record.meta.is_layering_piece);

        let record = normalize(&json!({"details": {"print_or_logo": "0"}}));
        assert!(!record.details.print_or_logo);

        let record = normalize(&json!({"details": {"print_or_logo": "maybe"}}));
        assert!(!record.details.print_or_logo);
    }

    #[test]
    fn test_notes_keep_their_case() {
        let record = normalize(&json!({"meta": {"notes": "Has A Logo"}}));
        assert_eq!(record.meta.notes.as_deref(), Some("Has A Logo"));

        let record = normalize(&json!({"meta": {"notes": null}}));
        assert_eq!(record.meta.notes, None);
    }

    #[test]
    fn test_wrong_typed_sections_degrade_to_defaults() {
        let record = normalize(&json!({
            "category": "top",
            "scores": [1, 2, 3]
        }));
        assert_eq!(record.category, AttributeRecord::default().category);
        assert_eq!(record.scores, AttributeRecord::default().scores);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize(&json!({
            "category": {"main": "Knitwear", "sub": "sweater", "confidence": 2.0},
            "color": {"primary": "navy blue", "secondary": "white, red", "tone": "navy"},
            "style_tags": "casual, street",
            "scores": {"formality": "0.4", "season": ["fall", "winter"]},
            "meta": {"notes": "Chunky"}
        }));
        let round = serde_json::to_value(&first).unwrap();
        assert_eq!(normalize(&round), first);
    }
}
