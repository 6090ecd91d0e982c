//! Ordered repair heuristics for almost-JSON model output.
//!
//! Each rule fixes one habit generative models actually have: markdown code
//! fences around the payload, Python-style literals (`None`, `True`,
//! `False`), trailing commas before a closing delimiter, and whole replies
//! written with single quotes. Rules apply in a fixed order and the pass
//! runs once; repair never loops until a parse succeeds.

use std::sync::LazyLock;

use regex::Regex;

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*").expect("fence-open pattern compiles"));
static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("fence-close pattern compiles"));
static BARE_NONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bNone\b").expect("None pattern compiles"));
static BARE_TRUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bTrue\b").expect("True pattern compiles"));
static BARE_FALSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bFalse\b").expect("False pattern compiles"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing-comma pattern compiles"));

/// Quote-swap only fires on text that is clearly single-quoted throughout:
/// fewer double quotes than this and more single quotes than this.
const QUOTE_SWAP_THRESHOLD: usize = 4;

/// Applies the repair rules to `text` and returns the repaired candidate.
///
/// The output is what the parser attempts; callers keep it around for
/// diagnostics when parsing still fails.
pub fn repair(text: &str) -> String {
    let mut out = text.trim().to_string();

    out = FENCE_OPEN.replace(&out, "").into_owned();
    out = FENCE_CLOSE.replace(&out, "").into_owned();

    out = BARE_NONE.replace_all(&out, "null").into_owned();
    out = BARE_TRUE.replace_all(&out, "true").into_owned();
    out = BARE_FALSE.replace_all(&out, "false").into_owned();

    out = TRAILING_COMMA.replace_all(&out, "$1").into_owned();

    // Blanket swap, not char-wise parsing: a reply that is predominantly
    // single-quoted almost never carries meaningful double quotes, and the
    // count gate keeps apostrophes in ordinary JSON strings intact.
    if out.matches('"').count() < QUOTE_SWAP_THRESHOLD
        && out.matches('\'').count() > QUOTE_SWAP_THRESHOLD
    {
        out = out.replace('\'', "\"");
    }

    out
}
