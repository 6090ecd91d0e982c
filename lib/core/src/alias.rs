//! Synonym folding applied before dictionary membership gating.
//!
//! Vision models routinely answer with near-miss tokens ("navy blue",
//! "crewneck", "knitwear"). Each field with a known synonym set resolves
//! those to dictionary members first so they survive canonicalization
//! instead of collapsing to `unknown`.

/// Field families that carry an alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    CategoryMain,
    Color,
    Neckline,
    Closure,
    Tone,
}

/// Resolves a lowercased token through the alias table for `kind`.
///
/// Unmapped tokens pass through unchanged; membership gating decides
/// their fate afterwards.
pub fn resolve<'a>(kind: AliasKind, token: &'a str) -> &'a str {
    match (kind, token) {
        (AliasKind::CategoryMain, "clothing" | "sweater" | "knitwear") => "top",
        (AliasKind::Color, "dark blue" | "navy blue") => "navy",
        (AliasKind::Color, "light blue") => "skyblue",
        (AliasKind::Neckline, "round" | "crew neck" | "crewneck") => "crew",
        (AliasKind::Closure, "no closure") => "none",
        (AliasKind::Tone, "navy") => "dark",
        _ => token,
    }
}
