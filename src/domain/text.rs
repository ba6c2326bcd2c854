//! Text canonicalization.
//!
//! [`normalize`] is for display-preserving cleanup of page text and
//! candidates. [`fold`] produces the comparison key: accents stripped,
//! upper-cased. Folded strings are never shown to users.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Collapses every whitespace run to a single space and trims both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the accent-free, upper-case, whitespace-normalized form of `text`.
///
/// ```
/// use holerite::domain::text::fold;
///
/// assert_eq!(fold("  João   da Conceição "), "JOAO DA CONCEICAO");
/// ```
pub fn fold(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase();
    // Upper-casing can reintroduce decomposable characters (e.g. 'ǰ').
    let stripped: String = stripped.nfd().filter(|c| !is_combining_mark(*c)).collect();
    normalize(&stripped)
}

/// Splits folded or normalized text into words.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
