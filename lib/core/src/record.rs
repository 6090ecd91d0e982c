//! Canonical attribute record types.
//!
//! An [`AttributeRecord`] is the fixed-shape output of canonicalization:
//! every enum field holds a dictionary member or `"unknown"`, every score
//! and confidence sits in `[0, 1]`, and list fields respect their caps.
//! Serialization order matches the schema the extraction prompt shows the
//! model, so stored files read back field-for-field.

use serde::{Deserialize, Serialize};

/// Garment category, a coarse main class plus a finer sub class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub main: String,
    pub sub: String,
    pub confidence: f64,
}

/// Dominant and secondary colors with an overall tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorInfo {
    pub primary: String,
    pub secondary: Vec<String>,
    pub tone: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f64,
}

/// Material is a guess by construction; models cannot feel fabric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInfo {
    pub guess: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f64,
}

/// Construction details. `closure` is a list because garments combine
/// closures (a coat with a zipper behind a button placket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Details {
    pub neckline: String,
    pub sleeve: String,
    pub length: String,
    pub closure: Vec<String>,
    pub print_or_logo: bool,
}

/// Styling scores used by outfit compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub formality: f64,
    pub warmth: f64,
    pub season: Vec<String>,
    pub versatility: f64,
}

/// Free-form remainder. `notes` doubles as the diagnostic channel when
/// extraction degrades; see the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub is_layering_piece: bool,
    pub notes: Option<String>,
}

/// One garment's full attribute set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub category: Category,
    pub color: ColorInfo,
    pub pattern: PatternInfo,
    pub material: MaterialInfo,
    pub fit: FitInfo,
    pub details: Details,
    pub style_tags: Vec<String>,
    pub scores: Scores,
    pub meta: Meta,
    pub confidence: f64,
}

impl Default for AttributeRecord {
    /// The all-unknown record. Low confidences mark it as a placeholder;
    /// mid defaults for formality and warmth keep downstream scoring away
    /// from the extremes when nothing is known.
    fn default() -> Self {
        AttributeRecord {
            category: Category {
                main: "unknown".to_string(),
                sub: "unknown".to_string(),
                confidence: 0.2,
            },
            color: ColorInfo {
                primary: "unknown".to_string(),
                secondary: Vec::new(),
                tone: "unknown".to_string(),
                confidence: 0.2,
            },
            pattern: PatternInfo {
                kind: "unknown".to_string(),
                confidence: 0.2,
            },
            material: MaterialInfo {
                guess: "unknown".to_string(),
                confidence: 0.2,
            },
            fit: FitInfo {
                kind: "unknown".to_string(),
                confidence: 0.2,
            },
            details: Details {
                neckline: "unknown".to_string(),
                sleeve: "unknown".to_string(),
                length: "unknown".to_string(),
                closure: vec!["unknown".to_string()],
                print_or_logo: false,
            },
            style_tags: Vec::new(),
            scores: Scores {
                formality: 0.3,
                warmth: 0.3,
                season: Vec::new(),
                versatility: 0.5,
            },
            meta: Meta {
                is_layering_piece: false,
                notes: None,
            },
            confidence: 0.2,
        }
    }
}

/// A stored garment: record plus its id and optional image location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeItem {
    pub id: String,
    pub attributes: AttributeRecord,
    pub image_url: Option<String>,
}

impl WardrobeItem {
    pub fn new(id: impl Into<String>, attributes: AttributeRecord, image_url: Option<String>) -> Self {
        WardrobeItem {
            id: id.into(),
            attributes,
            image_url,
        }
    }
}
