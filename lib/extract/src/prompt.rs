//! Prompt construction for attribute extraction.
//!
//! The extraction prompt embeds the exact record schema and the dictionary
//! lists the canonicalizer gates against, so prompt and pipeline can never
//! drift apart silently. The retry prompt feeds validator messages straight
//! back to the model, which is the whole feedback loop: the model fixes
//! precisely the fields that failed shape checking.

use vestx_core::{enums, REQUIRED_KEYS};

/// At most this many violation messages are echoed into the retry prompt.
pub const MAX_PROMPT_VIOLATIONS: usize = 10;

const SCHEMA_TYPES: &str = r#"{
  "category": {"main": string, "sub": string, "confidence": number},
  "color": {"primary": string, "secondary": [string], "tone": string, "confidence": number},
  "pattern": {"type": string, "confidence": number},
  "material": {"guess": string, "confidence": number},
  "fit": {"type": string, "confidence": number},
  "details": {
    "neckline": string,
    "sleeve": string,
    "length": string,
    "closure": [string],
    "print_or_logo": boolean
  },
  "style_tags": [string],
  "scores": {
    "formality": number,
    "warmth": number,
    "season": [string],
    "versatility": number
  },
  "meta": {"is_layering_piece": boolean, "notes": string|null},
  "confidence": number
}"#;

/// First-attempt prompt sent with the garment image.
pub fn extraction_prompt() -> String {
    format!(
        "Extract attributes for the single clothing item in the image.\n\
         \n\
         Return ONLY ONE JSON object with EXACTLY these top-level keys:\n\
         category, color, pattern, material, fit, details, style_tags, scores, meta, confidence\n\
         \n\
         Schema (types):\n\
         {SCHEMA_TYPES}\n\
         \n\
         Critical rules:\n\
         - JSON only. No markdown. No commentary. No trailing text.\n\
         - details.closure MUST be an ARRAY, e.g. [\"none\"] (never a string).\n\
         - scores.season MUST be an ARRAY, e.g. [\"winter\"] (never a string).\n\
         - confidence fields must be 0.0~1.0\n\
         - Use lowercase tokens (short). If unsure use \"unknown\".\n\
         - category.main must be one of {main:?}.\n\
         - color.tone must be one of {tone:?}.\n",
        main = enums::CATEGORY_MAIN,
        tone = enums::TONE,
    )
}

/// Second-attempt prompt carrying the validator's findings.
pub fn retry_prompt(violations: &[String]) -> String {
    let bullets = violations
        .iter()
        .take(MAX_PROMPT_VIOLATIONS)
        .map(|v| format!("- {v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut keys: Vec<&str> = REQUIRED_KEYS.to_vec();
    keys.sort_unstable();

    format!(
        "Fix your output to be VALID JSON and match the schema EXACTLY.\n\
         \n\
         Errors:\n\
         {bullets}\n\
         \n\
         MUST:\n\
         - Return ONLY ONE JSON object. No extra text.\n\
         - Top-level keys must be EXACTLY: {keys:?}\n\
         - details.closure MUST be an ARRAY of strings (e.g. [\"none\"]).\n\
         - scores.season MUST be an ARRAY of strings (e.g. [\"winter\"]).\n\
         - All confidences must be 0.0~1.0.\n\
         - category.main must be one of {main:?}.\n\
         - color.tone must be one of {tone:?}.\n\
         - Use \"unknown\" if unsure.\n\
         \n\
         Return corrected JSON ONLY.\n",
        main = enums::CATEGORY_MAIN,
        tone = enums::TONE,
    )
}
