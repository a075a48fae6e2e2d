//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::NotFound(format!("{label} {value}")))
}

/// Collapse runs of whitespace and trim. Returns `None` for blank input.
pub(crate) fn normalize_display(input: &str) -> Option<String> {
    let out = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if out.is_empty() { None } else { Some(out) }
}

/// Comparison key for display names: accents stripped, lowercase,
/// punctuation folded into single spaces.
///
/// "José  Pérez" and "jose perez" share the same key.
pub(crate) fn normalize_name(input: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_folds_case_and_accents() {
        assert_eq!(normalize_name("José  Pérez"), "jose perez");
        assert_eq!(normalize_name("  ALICE "), "alice");
        assert_eq!(normalize_name("bob_the-builder"), "bob the builder");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn normalize_display_collapses_whitespace() {
        assert_eq!(normalize_display("  Alice   Smith "), Some("Alice Smith".to_string()));
        assert_eq!(normalize_display(" \t "), None);
    }
}
