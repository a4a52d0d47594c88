//! Word canonicalization shared by selection, scoring, and the session log.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical comparison form of a word: trimmed, lowercased, NFD-decomposed
/// with combining marks removed. Decomposition folds `ñ` onto `n`, `ü` onto
/// `u`, and all accented vowels onto their base letters, so `"Plátano"` and
/// `"platano"` compare equal.
///
/// Total on any input, including the empty string, and idempotent.
#[must_use]
pub fn normalize(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Whether the raw input contains any ASCII digit. Digit-bearing guesses are
/// rejected before normalization.
#[must_use]
pub fn contains_digit(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
}
