//! Candidate extraction and parsing for raw model replies.
//!
//! A reply whose first container opener is `[` is treated as an array, so
//! re-ranking replies shaped like `[{...}, {...}]` are not truncated to
//! their first element; anything else is treated as an object, so inner
//! list fields never shadow the record that carries them. When no candidate
//! scans out, the whole reply is repaired and parsed as a last resort.

use serde_json::Value;

use crate::{repair, scan};

/// Result of one parse attempt over raw model text.
///
/// `repaired` is always populated with the candidate after repair, whether
/// parsing succeeded or not, so failures can be diagnosed from exactly what
/// the parser saw.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub value: Option<Value>,
    pub repaired: String,
}

impl ParseOutcome {
    fn parsed(value: Value, repaired: String) -> Self {
        ParseOutcome {
            value: Some(value),
            repaired,
        }
    }

    fn failed(repaired: String) -> Self {
        ParseOutcome {
            value: None,
            repaired,
        }
    }
}

/// Extracts and parses the first JSON container from free-form model text.
///
/// Only containers count as success. A reply that repairs to a bare string
/// or number parses fine but is useless to every caller, so it reports as a
/// parse failure.
pub fn from_model_text(text: &str) -> ParseOutcome {
    if array_leads(text) {
        if let Some(candidate) = scan::first_array(text) {
            let repaired = repair::repair(candidate);
            if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
                if value.is_array() {
                    return ParseOutcome::parsed(value, repaired);
                }
            }
        }
    }

    let candidate = scan::first_object(text).unwrap_or(text);
    let repaired = repair::repair(candidate);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) if value.is_object() || value.is_array() => {
            ParseOutcome::parsed(value, repaired)
        }
        _ => ParseOutcome::failed(repaired),
    }
}

/// True when the first container opener in `text` is `[`. An object reply
/// full of list fields must parse as the object, not its first inner list.
fn array_leads(text: &str) -> bool {
    match (text.find('['), text.find('{')) {
        (Some(array), Some(object)) => array < object,
        (Some(_), None) => true,
        _ => false,
    }
}
