//! Color harmony scoring over a fixed color wheel.
//!
//! Each chromatic color token maps to a hue angle in degrees. Two hues
//! are compared by their minimal angular difference and bucketed into a
//! harmony score. Neutral colors pair with everything and bypass the
//! wheel entirely; tokens without a stable hue fall back to a flat mid
//! score.

/// Colors that pair with anything.
const NEUTRALS: [&str; 3] = ["black", "white", "gray"];

/// Hue angle in degrees for a color token, `None` when the token has no
/// stable hue (`"unknown"`, `"other"`, or anything off the wheel).
fn hue(color: &str) -> Option<f64> {
    let angle = match color {
        "black" | "white" | "gray" | "red" => 0.0,
        "brown" => 25.0,
        "orange" => 30.0,
        "beige" => 45.0,
        "cream" => 50.0,
        "yellow" => 60.0,
        "khaki" => 90.0,
        "green" => 120.0,
        "skyblue" => 180.0,
        "blue" => 210.0,
        "navy" => 240.0,
        "purple" => 270.0,
        "pink" => 300.0,
        _ => return None,
    };
    Some(angle)
}

/// Harmony score in `[0, 1]` for two primary color tokens.
///
/// Checked in order: either side neutral scores 0.8, either side without
/// a hue scores 0.5, identical colors score 0.9 (monochromatic), and the
/// rest is bucketed by the minimal angle between the two hues.
pub fn harmony(color_a: &str, color_b: &str) -> f64 {
    let a = color_a.to_ascii_lowercase();
    let b = color_b.to_ascii_lowercase();

    if NEUTRALS.contains(&a.as_str()) || NEUTRALS.contains(&b.as_str()) {
        return 0.8;
    }

    let (hue_a, hue_b) = match (hue(&a), hue(&b)) {
        (Some(x), Some(y)) => (x, y),
        _ => return 0.5,
    };

    if a == b {
        return 0.9;
    }

    let mut diff = (hue_a - hue_b).abs();
    if diff > 180.0 {
        diff = 360.0 - diff;
    }

    if (170.0..=190.0).contains(&diff) {
        0.95 // complementary
    } else if diff <= 60.0 {
        0.85 // analogous
    } else if (110.0..=130.0).contains(&diff) {
        0.75 // triadic
    } else if diff <= 90.0 {
        0.6
    } else {
        0.4
    }
}
