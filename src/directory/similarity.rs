//! Name similarity scores.
//!
//! Both scorers take folded names (see [`fold`](crate::domain::text::fold))
//! and return a confidence in `0..=100`.

/// Scores how likely two folded names refer to the same person.
pub trait Similarity: Send + Sync {
    fn name(&self) -> &str;
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Exact, containment, then word-overlap scoring.
///
/// - identical → 100
/// - one contains the other → `len(shorter) / len(longer) * 90`
/// - otherwise → `matched words / max(word counts) * 80`, where a word
///   matches if any word on the other side equals, contains, or is
///   contained by it
///
/// Used to accept or reject automatic matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordOverlapSimilarity;

impl Similarity for WordOverlapSimilarity {
    fn name(&self) -> &str {
        "word-overlap"
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        if a == b {
            return 100;
        }

        if a.contains(b) || b.contains(a) {
            let (len_a, len_b) = (a.chars().count(), b.chars().count());
            let (shorter, longer) = (len_a.min(len_b), len_a.max(len_b));
            return percent(shorter, longer, 90.0);
        }

        let words_a: Vec<&str> = a.split_whitespace().collect();
        let words_b: Vec<&str> = b.split_whitespace().collect();
        let matched = words_a
            .iter()
            .filter(|wa| {
                words_b
                    .iter()
                    .any(|wb| wa.contains(wb) || wb.contains(*wa))
            })
            .count();

        percent(matched, words_a.len().max(words_b.len()), 80.0)
    }
}

/// Normalized Levenshtein similarity: `(1 - distance / max_len) * 100`.
///
/// Used for "did you mean" suggestions, where typos matter more than
/// word structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistanceSimilarity;

impl Similarity for EditDistanceSimilarity {
    fn name(&self) -> &str {
        "edit-distance"
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        let max_len = a.chars().count().max(b.chars().count());
        if max_len == 0 {
            return 100;
        }
        let distance = strsim::levenshtein(a, b);
        percent(max_len - distance.min(max_len), max_len, 100.0)
    }
}

/// `round(part / whole * scale)`, 0 when `whole` is 0.
fn percent(part: usize, whole: usize, scale: f64) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * scale).round().clamp(0.0, 100.0) as u8
}
