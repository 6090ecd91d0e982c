//! Closed vocabularies for every enum-typed attribute field.
//!
//! Canonicalization never invents tokens: a value either appears in one of
//! these dictionaries or collapses to [`UNKNOWN`]. Keep the lists in sync with
//! the schema block embedded in the extraction prompt.

/// Sentinel for any token outside its dictionary.
pub const UNKNOWN: &str = "unknown";

pub const CATEGORY_MAIN: &[&str] = &[
    "outer", "top", "bottom", "onepiece", "shoes", "bag", "accessory",
];

pub const CATEGORY_SUB: &[&str] = &[
    "coat", "puffer", "jacket", "blazer", "cardigan", "hoodie", "sweatshirt",
    "shirt", "tshirt", "knit", "sweater", "slacks", "jeans", "shorts", "skirt",
    "dress", "sneakers", "loafers", "heels", "boots", "bag", "cap", "hat",
    "scarf", "belt", "other", "unknown",
];

pub const COLOR: &[&str] = &[
    "black", "white", "gray", "navy", "blue", "skyblue", "beige", "brown",
    "khaki", "green", "red", "pink", "purple", "yellow", "orange", "cream",
    "other", "unknown",
];

pub const TONE: &[&str] = &["dark", "mid", "light", "pastel", "vivid", "unknown"];

pub const PATTERN: &[&str] = &[
    "solid", "stripe", "check", "dot", "graphic", "floral", "other", "unknown",
];

pub const MATERIAL: &[&str] = &[
    "cotton", "denim", "knit", "wool", "leather", "poly", "linen", "other", "unknown",
];

pub const FIT: &[&str] = &["slim", "regular", "oversized", "wide", "unknown"];

pub const NECKLINE: &[&str] = &["crew", "vneck", "collar", "turtleneck", "hood", "unknown"];

pub const SLEEVE: &[&str] = &["sleeveless", "short", "long", "unknown"];

pub const LENGTH: &[&str] = &["cropped", "waist", "hip", "long", "unknown"];

pub const CLOSURE: &[&str] = &["zipper", "button", "open", "none", "unknown"];

pub const STYLE_TAGS: &[&str] = &[
    "minimal", "classic", "street", "sporty", "feminine", "vintage", "business",
    "formal", "casual", "other",
];

pub const SEASON: &[&str] = &["spring", "summer", "fall", "winter"];

/// Membership test against one dictionary.
#[inline]
pub fn contains(dictionary: &[&str], token: &str) -> bool {
    dictionary.contains(&token)
}

/// Returns the token when it belongs to the dictionary, [`UNKNOWN`] otherwise.
pub fn member_or_unknown(dictionary: &[&str], token: &str) -> String {
    if contains(dictionary, token) {
        token.to_string()
    } else {
        UNKNOWN.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionaries_are_lowercase() {
        for dict in [
            CATEGORY_MAIN, CATEGORY_SUB, COLOR, TONE, PATTERN, MATERIAL, FIT,
            NECKLINE, SLEEVE, LENGTH, CLOSURE, STYLE_TAGS, SEASON,
        ] {
            for token in dict {
                assert_eq!(*token, token.to_lowercase());
            }
        }
    }

    #[test]
    fn test_member_or_unknown() {
        assert_eq!(member_or_unknown(COLOR, "navy"), "navy");
        assert_eq!(member_or_unknown(COLOR, "turquoise"), "unknown");
        assert_eq!(member_or_unknown(SEASON, "winter"), "winter");
        assert_eq!(member_or_unknown(SEASON, "monsoon"), "unknown");
    }

    #[test]
    fn test_unknown_is_member_where_expected() {
        // Main category, seasons and style tags have no unknown entry; the
        // sentinel only enters those fields through member_or_unknown.
        assert!(!contains(CATEGORY_MAIN, UNKNOWN));
        assert!(!contains(SEASON, UNKNOWN));
        assert!(!contains(STYLE_TAGS, UNKNOWN));
        assert!(contains(COLOR, UNKNOWN));
        assert!(contains(CLOSURE, UNKNOWN));
        assert!(contains(CATEGORY_SUB, UNKNOWN));
    }
}
