//! Handle/slug normalization.
//!
//! One canonical form serves both profile handles and collection slugs;
//! the two call sites must never diverge. The normalized alphabet is
//! lowercase ASCII letters, digits, and single interior hyphens.

use crate::ValidationError;

/// Canonicalizes free-text input into a slug.
///
/// Lowercases the input, turns every run of characters outside `[a-z0-9]`
/// (whitespace, punctuation, existing hyphens) into a single hyphen, and
/// trims leading/trailing hyphens:
///
/// - `"  Nathan's Plates!! "` → `"nathan-s-plates"`
/// - `"a---b"` → `"a-b"`
///
/// Total and idempotent: `normalize(normalize(x)) == normalize(x)` for
/// every input. Inputs with nothing salvageable yield `""`, which callers
/// must reject before persisting (see [`normalize_required`]).
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for ch in raw.to_lowercase().chars() {
        match ch {
            'a'..='z' | '0'..='9' => {
                if pending_hyphen && !out.is_empty() {
                    out.push('-');
                }
                pending_hyphen = false;
                out.push(ch);
            }
            _ => pending_hyphen = true,
        }
    }

    out
}

/// Normalizes and rejects inputs that canonicalize to nothing.
pub fn normalize_required(raw: &str) -> Result<String, ValidationError> {
    let slug = normalize(raw);
    if slug.is_empty() {
        return Err(ValidationError("handle required".to_string()));
    }
    Ok(slug)
}
