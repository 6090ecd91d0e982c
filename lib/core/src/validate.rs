//! Shape-only schema validation for parsed extraction output.
//!
//! The validator checks structure, never vocabulary: a string field holding
//! an out-of-dictionary token passes here and is gated during
//! canonicalization instead. Keeping membership out of validation means a
//! near-miss token ("navy blue") does not burn the single retry the
//! orchestrator is allowed.
//!
//! Violation messages are stable and greppable, prefixed with the field
//! path, because they feed straight into the retry prompt and into stored
//! diagnostic notes.

use ahash::AHashSet;
use serde_json::{Map, Value};

/// Top-level keys a record must carry, exactly and exclusively.
pub const REQUIRED_KEYS: &[&str] = &[
    "category", "color", "pattern", "material", "fit", "details",
    "style_tags", "scores", "meta", "confidence",
];

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default)]
pub struct SchemaReport {
    pub violations: Vec<String>,
}

impl SchemaReport {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validates a parsed value against the attribute schema.
///
/// Reports every violation it finds, in field order, one message per
/// offending field. Missing and extra top-level keys are reported
/// independently.
pub fn validate(value: &Value) -> SchemaReport {
    let mut violations = Vec::new();

    let Some(obj) = value.as_object() else {
        return SchemaReport {
            violations: vec!["Top-level is not an object".to_string()],
        };
    };

    check_key_set(obj, &mut violations);

    if let Some(cat) = section(obj, "category", &mut violations) {
        check_string(cat, "category", "main", &mut violations);
        check_string(cat, "category", "sub", &mut violations);
        check_unit_number(cat, "category", "confidence", &mut violations);
    }

    if let Some(col) = section(obj, "color", &mut violations) {
        check_string(col, "color", "primary", &mut violations);
        check_string_list(col.get("secondary"), "color.secondary", &mut violations);
        check_string(col, "color", "tone", &mut violations);
        check_unit_number(col, "color", "confidence", &mut violations);
    }

    if let Some(pat) = section(obj, "pattern", &mut violations) {
        check_string(pat, "pattern", "type", &mut violations);
        check_unit_number(pat, "pattern", "confidence", &mut violations);
    }

    if let Some(mat) = section(obj, "material", &mut violations) {
        check_string(mat, "material", "guess", &mut violations);
        check_unit_number(mat, "material", "confidence", &mut violations);
    }

    if let Some(fit) = section(obj, "fit", &mut violations) {
        check_string(fit, "fit", "type", &mut violations);
        check_unit_number(fit, "fit", "confidence", &mut violations);
    }

    if let Some(det) = section(obj, "details", &mut violations) {
        check_string(det, "details", "neckline", &mut violations);
        check_string(det, "details", "sleeve", &mut violations);
        check_string(det, "details", "length", &mut violations);
        check_string_list(det.get("closure"), "details.closure", &mut violations);
        if !matches!(det.get("print_or_logo"), Some(Value::Bool(_))) {
            violations.push("details.print_or_logo must be boolean".to_string());
        }
    }

    check_string_list(obj.get("style_tags"), "style_tags", &mut violations);

    if let Some(sc) = section(obj, "scores", &mut violations) {
        check_unit_number(sc, "scores", "formality", &mut violations);
        check_unit_number(sc, "scores", "warmth", &mut violations);
        check_unit_number(sc, "scores", "versatility", &mut violations);
        check_string_list(sc.get("season"), "scores.season", &mut violations);
    }

    if let Some(meta) = section(obj, "meta", &mut violations) {
        if !matches!(meta.get("is_layering_piece"), Some(Value::Bool(_))) {
            violations.push("meta.is_layering_piece must be boolean".to_string());
        }
        match meta.get("notes") {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => violations.push("meta.notes must be string|null".to_string()),
        }
    }

    if !is_unit_number(obj.get("confidence")) {
        violations.push("confidence must be number in [0,1]".to_string());
    }

    SchemaReport { violations }
}

fn check_key_set(obj: &Map<String, Value>, violations: &mut Vec<String>) {
    let keys: AHashSet<&str> = obj.keys().map(String::as_str).collect();
    let required: AHashSet<&str> = REQUIRED_KEYS.iter().copied().collect();
    if keys == required {
        return;
    }
    let mut missing: Vec<&str> = required.difference(&keys).copied().collect();
    missing.sort_unstable();
    if !missing.is_empty() {
        violations.push(format!("Missing top-level keys: {missing:?}"));
    }
    let mut extra: Vec<&str> = keys.difference(&required).copied().collect();
    extra.sort_unstable();
    if !extra.is_empty() {
        violations.push(format!("Extra top-level keys not allowed: {extra:?}"));
    }
}

/// Resolves a section by name, recording a violation when it is not an
/// object. Field checks only run on actual objects.
fn section<'a>(
    obj: &'a Map<String, Value>,
    name: &str,
    violations: &mut Vec<String>,
) -> Option<&'a Map<String, Value>> {
    match obj.get(name).and_then(Value::as_object) {
        Some(map) => Some(map),
        None => {
            violations.push(format!("{name} must be an object"));
            None
        }
    }
}

fn check_string(map: &Map<String, Value>, path: &str, field: &str, violations: &mut Vec<String>) {
    if !matches!(map.get(field), Some(Value::String(_))) {
        violations.push(format!("{path}.{field} must be string"));
    }
}

fn check_unit_number(
    map: &Map<String, Value>,
    path: &str,
    field: &str,
    violations: &mut Vec<String>,
) {
    if !is_unit_number(map.get(field)) {
        violations.push(format!("{path}.{field} must be number in [0,1]"));
    }
}

fn check_string_list(value: Option<&Value>, path: &str, violations: &mut Vec<String>) {
    let ok = matches!(value, Some(Value::Array(items))
        if items.iter().all(|item| matches!(item, Value::String(_))));
    if !ok {
        violations.push(format!("{path} must be [string]"));
    }
}

fn is_unit_number(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_f64)
        .map(|n| n.is_finite() && (0.0..=1.0).contains(&n))
        .unwrap_or(false)
}
