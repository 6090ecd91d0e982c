//! Retry-with-feedback extraction orchestration.
//!
//! Drives at most two model calls per extraction. The first reply is
//! parsed and shape-checked; a schema-invalid reply earns exactly one
//! retry whose prompt embeds the validator's findings. Parse failures
//! never retry: a model that did not produce JSON once is not going to
//! produce it because we asked again, so the caller gets the default
//! record with a diagnostic note instead.
//!
//! Every degraded outcome is written into `meta.notes` with a stable
//! marker (`JSON_PARSE_FAILED`, `RETRY_JSON_PARSE_FAILED`,
//! `SCHEMA_INVALID_AFTER_RETRY`, `SCHEMA_INVALID_NO_RETRY`) so stored
//! records explain themselves later.

use tracing::{info, warn};

use vestx_core::{normalize, parse, validate, AttributeRecord};

use crate::model::{text_head, ImagePayload, ModelClient, ModelError};
use crate::prompt;

/// Notes cap for degraded records, in chars.
const NOTE_CAP: usize = 300;
/// How much repaired text a parse-failure note carries.
const DIAGNOSTIC_HEAD: usize = 160;
/// How many violations a schema-failure note carries.
const NOTE_VIOLATIONS: usize = 3;
/// Confidence assigned when no JSON could be recovered at all.
const PARSE_FAILURE_CONFIDENCE: f64 = 0.1;

/// Controls the optional second model call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retry once when the first reply parses but fails shape checks.
    pub on_schema_violation: bool,
    /// Send the image again with the retry prompt. Without it the model
    /// must fix its JSON from the violation feedback alone.
    pub resend_image: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            on_schema_violation: true,
            resend_image: true,
        }
    }
}

/// Runs the extraction pipeline against one garment image.
///
/// Always returns a complete canonical record when the model transport
/// holds up; parse and schema troubles degrade into annotated records
/// rather than errors. Only [`ModelError`] propagates.
pub fn extract_attributes(
    client: &dyn ModelClient,
    image: &ImagePayload,
    policy: &RetryPolicy,
) -> Result<AttributeRecord, ModelError> {
    let raw = client.generate(&prompt::extraction_prompt(), Some(image))?;
    let outcome = parse::from_model_text(&raw);

    let Some(first) = outcome.value else {
        warn!("extraction reply had no parseable JSON");
        return Ok(parse_failure_record("JSON_PARSE_FAILED", &outcome.repaired));
    };

    let report = validate::validate(&first);
    if report.is_valid() {
        return Ok(normalize::normalize(&first));
    }

    if !policy.on_schema_violation {
        let mut record = normalize::normalize(&first);
        annotate_schema_failure(&mut record, "SCHEMA_INVALID_NO_RETRY", &report.violations);
        return Ok(record);
    }

    info!(
        violations = report.violations.len(),
        "schema-invalid reply, retrying with feedback"
    );
    let retry_prompt = prompt::retry_prompt(&report.violations);
    let retry_image = if policy.resend_image { Some(image) } else { None };
    let raw = client.generate(&retry_prompt, retry_image)?;
    let outcome = parse::from_model_text(&raw);

    let Some(second) = outcome.value else {
        warn!("retry reply had no parseable JSON");
        return Ok(parse_failure_record(
            "RETRY_JSON_PARSE_FAILED",
            &outcome.repaired,
        ));
    };

    let report = validate::validate(&second);
    let mut record = normalize::normalize(&second);
    if !report.is_valid() {
        annotate_schema_failure(&mut record, "SCHEMA_INVALID_AFTER_RETRY", &report.violations);
    }
    Ok(record)
}

/// Default record carrying the head of the text the parser gave up on.
fn parse_failure_record(marker: &str, repaired: &str) -> AttributeRecord {
    let mut record = AttributeRecord::default();
    record.meta.notes = Some(format!(
        "{marker}. repaired_head={}",
        text_head(repaired, DIAGNOSTIC_HEAD)
    ));
    record.confidence = PARSE_FAILURE_CONFIDENCE;
    record
}

/// Appends a violation summary to the record's notes, capped to
/// [`NOTE_CAP`] chars over the whole notes field.
fn annotate_schema_failure(record: &mut AttributeRecord, marker: &str, violations: &[String]) {
    let summary = &violations[..violations.len().min(NOTE_VIOLATIONS)];
    let mut note = match record.meta.notes.take().filter(|notes| !notes.is_empty()) {
        Some(existing) => format!("{existing} | {marker}: {summary:?}"),
        None => format!("{marker}: {summary:?}"),
    };
    if note.chars().count() > NOTE_CAP {
        note = note.chars().take(NOTE_CAP).collect();
    }
    record.meta.notes = Some(note);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

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

    fn payload() -> ImagePayload {
        ImagePayload::new("image/jpeg", vec![0xFF, 0xD8])
    }

    fn valid_reply() -> String {
        r#"{
            "category": {"main": "top", "sub": "tshirt", "confidence": 0.9},
            "color": {"primary": "navy", "secondary": [], "tone": "dark", "confidence": 0.8},
            "pattern": {"type": "solid", "confidence": 0.8},
            "material": {"guess": "cotton", "confidence": 0.6},
            "fit": {"type": "regular", "confidence": 0.7},
            "details": {"neckline": "crew", "sleeve": "short", "length": "waist",
                        "closure": ["none"], "print_or_logo": false},
            "style_tags": ["casual"],
            "scores": {"formality": 0.2, "warmth": 0.3, "season": ["summer"], "versatility": 0.8},
            "meta": {"is_layering_piece": false, "notes": null},
            "confidence": 0.85
        }"#
        .to_string()
    }

    #[test]
    fn test_valid_first_reply_single_call() {
        let model = ScriptedModel::new(vec![Ok(valid_reply())]);
        let record = extract_attributes(&model, &payload(), &RetryPolicy::default()).unwrap();

        assert_eq!(model.calls(), 1);
        assert_eq!(record.category.main, "top");
        assert_eq!(record.confidence, 0.85);
        assert_eq!(record.meta.notes, None);

        let (prompt, with_image) = model.prompt(0);
        assert!(with_image);
        assert!(prompt.contains("Extract attributes"));
    }

    #[test]
    fn test_parse_failure_never_retries() {
        let model = ScriptedModel::new(vec![Ok("I cannot see any clothing here.".to_string())]);
        let record = extract_attributes(&model, &payload(), &RetryPolicy::default()).unwrap();

        assert_eq!(model.calls(), 1);
        assert_eq!(record.confidence, 0.1);
        let notes = record.meta.notes.unwrap();
        assert!(notes.starts_with("JSON_PARSE_FAILED. repaired_head="));
        assert!(notes.contains("I cannot see any clothing"));
        // Everything else is the default record.
        assert_eq!(record.category.main, "unknown");
    }

    #[test]
    fn test_schema_invalid_triggers_one_retry_with_feedback() {
        let first = r#"{"category": {"main": "top"}}"#.to_string();
        let model = ScriptedModel::new(vec![Ok(first), Ok(valid_reply())]);
        let record = extract_attributes(&model, &payload(), &RetryPolicy::default()).unwrap();

        assert_eq!(model.calls(), 2);
        assert_eq!(record.category.main, "top");
        assert_eq!(record.meta.notes, None);

        let (retry, with_image) = model.prompt(1);
        assert!(with_image);
        assert!(retry.contains("Missing top-level keys"));
        assert!(retry.contains("Return corrected JSON ONLY."));
    }

    #[test]
    fn test_retry_still_invalid_annotates_notes() {
        let bad = r#"{"category": {"main": "top"}}"#.to_string();
        let model = ScriptedModel::new(vec![Ok(bad.clone()), Ok(bad)]);
        let record = extract_attributes(&model, &payload(), &RetryPolicy::default()).unwrap();

        assert_eq!(model.calls(), 2);
        // Canonical despite the failure, with the violation summary noted.
        assert_eq!(record.category.main, "top");
        let notes = record.meta.notes.unwrap();
        assert!(notes.contains("SCHEMA_INVALID_AFTER_RETRY:"));
        assert!(notes.contains("Missing top-level keys"));
        assert!(notes.chars().count() <= 300);
    }

    #[test]
    fn test_retry_parse_failure_yields_default_record() {
        let bad = r#"{"category": {"main": "top"}}"#.to_string();
        let model = ScriptedModel::new(vec![Ok(bad), Ok("sorry, no".to_string())]);
        let record = extract_attributes(&model, &payload(), &RetryPolicy::default()).unwrap();

        assert_eq!(model.calls(), 2);
        assert_eq!(record.confidence, 0.1);
        assert!(record
            .meta
            .notes
            .unwrap()
            .starts_with("RETRY_JSON_PARSE_FAILED"));
    }

    #[test]
    fn test_no_retry_policy_annotates_first_result() {
        let bad = r#"{"category": {"main": "top"}}"#.to_string();
        let model = ScriptedModel::new(vec![Ok(bad)]);
        let policy = RetryPolicy {
            on_schema_violation: false,
            resend_image: true,
        };
        let record = extract_attributes(&model, &payload(), &policy).unwrap();

        assert_eq!(model.calls(), 1);
        assert_eq!(record.category.main, "top");
        assert!(record
            .meta
            .notes
            .unwrap()
            .contains("SCHEMA_INVALID_NO_RETRY:"));
    }

    #[test]
    fn test_retry_without_image() {
        let bad = r#"{"category": {"main": "top"}}"#.to_string();
        let model = ScriptedModel::new(vec![Ok(bad), Ok(valid_reply())]);
        let policy = RetryPolicy {
            on_schema_violation: true,
            resend_image: false,
        };
        extract_attributes(&model, &payload(), &policy).unwrap();

        assert_eq!(model.calls(), 2);
        assert!(model.prompt(0).1, "first call carries the image");
        assert!(!model.prompt(1).1, "retry goes without the image");
    }

    #[test]
    fn test_model_error_propagates() {
        let model = ScriptedModel::new(vec![Err(ModelError::Auth("bad key".to_string()))]);
        let err = extract_attributes(&model, &payload(), &RetryPolicy::default()).unwrap_err();
        assert!(matches!(err, ModelError::Auth(_)));
    }

    #[test]
    fn test_diagnostic_head_is_capped() {
        let long_garbage = format!("x{}", "y".repeat(500));
        let model = ScriptedModel::new(vec![Ok(long_garbage)]);
        let record = extract_attributes(&model, &payload(), &RetryPolicy::default()).unwrap();
        let notes = record.meta.notes.unwrap();
        // marker + ". repaired_head=" + 160 chars of garbage
        assert!(notes.chars().count() <= "JSON_PARSE_FAILED. repaired_head=".len() + 160);
    }
}
