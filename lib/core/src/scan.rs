//! Balanced-delimiter scanning over raw model text.
//!
//! Generative output wraps its JSON in prose, markdown fences, or trailing
//! commentary. The scanner finds the first balanced `{...}` or `[...]` span
//! so the parser works on a candidate instead of the whole reply. Depth
//! tracking ignores delimiters inside string literals, including escaped
//! quotes, so `{"note": "a } inside"}` scans to the real closing brace.

/// Returns the first balanced `{...}` span of `text`, if any.
pub fn first_object(text: &str) -> Option<&str> {
    first_balanced(text, b'{', b'}')
}

/// Returns the first balanced `[...]` span of `text`, if any.
pub fn first_array(text: &str) -> Option<&str> {
    first_balanced(text, b'[', b']')
}

/// Scans byte-wise from the first `open` delimiter, tracking nesting depth
/// and string state, and slices out the span where depth returns to zero.
///
/// Byte scanning is UTF-8 safe here: every byte we compare against is ASCII
/// and never matches a continuation byte, and the returned slice ends on an
/// ASCII delimiter so the boundaries are valid char boundaries.
fn first_balanced(text: &str, open: u8, close: u8) -> Option<&str> {
    let trimmed = text.trim();
    let start = trimmed.find(open as char)?;
    let bytes = trimmed.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        if byte == b'"' {
            in_string = true;
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(&trimmed[start..=i]);
            }
        }
    }
    None
}
