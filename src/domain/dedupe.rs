//! Collision-free display names within one batch.
//!
//! The first occurrence of a name passes through unchanged; the Nth repeat
//! (compared case-insensitively) becomes `"NAME (N)"`. Counters belong to a
//! [`Deduplicator`] value, so each source document gets its own.

use std::collections::{HashMap, HashSet};

/// Batch-scoped duplicate counter.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    counts: HashMap<String, usize>,
    emitted: HashSet<String>,
    /// Longest output in characters, suffix included
    max_len: Option<usize>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps every output at `max_len` characters.
    ///
    /// The name is cut before the suffix is appended, so `" (N)"` is never lost.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..Self::default()
        }
    }

    /// Returns the unique form of `name` and records it.
    ///
    /// A generated suffix that collides with a name already emitted (for
    /// example a literal `"ANA (2)"` earlier in the batch) is bumped to the
    /// next free number.
    pub fn push(&mut self, name: &str) -> String {
        let key = name.to_uppercase();
        let mut n = self.counts.get(&key).copied().unwrap_or(0) + 1;
        let mut unique = self.suffixed(name, n);
        while self.emitted.contains(&unique.to_uppercase()) {
            n += 1;
            unique = self.suffixed(name, n);
        }
        self.counts.insert(key, n);
        self.emitted.insert(unique.to_uppercase());
        unique
    }

    /// Number of distinct names seen so far.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    fn suffixed(&self, name: &str, n: usize) -> String {
        let suffix = if n <= 1 {
            String::new()
        } else {
            format!(" ({})", n)
        };
        match self.max_len {
            Some(max) if name.chars().count() + suffix.len() > max => {
                let keep = max.saturating_sub(suffix.len());
                let head: String = name.chars().take(keep).collect();
                format!("{}{}", head.trim_end(), suffix)
            }
            _ => format!("{}{}", name, suffix),
        }
    }
}

/// Deduplicates a whole sequence, preserving length and order.
///
/// ```
/// use holerite::domain::dedupe::deduplicate;
///
/// let names = ["JOAO SILVA", "JOAO SILVA", "joao silva"];
/// assert_eq!(
///     deduplicate(&names),
///     vec!["JOAO SILVA", "JOAO SILVA (2)", "joao silva (3)"]
/// );
/// ```
pub fn deduplicate<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut dedup = Deduplicator::new();
    names.iter().map(|n| dedup.push(n.as_ref())).collect()
}

/// Like [`deduplicate`], with every output at most `max_len` characters.
///
/// ```
/// use holerite::domain::dedupe::deduplicate_within;
///
/// let names = ["ANA SOUZA", "ANA SOUZA"];
/// assert_eq!(deduplicate_within(&names, 11), vec!["ANA SOUZA", "ANA SOU (2)"]);
/// ```
pub fn deduplicate_within<S: AsRef<str>>(names: &[S], max_len: usize) -> Vec<String> {
    let mut dedup = Deduplicator::with_max_len(max_len);
    names.iter().map(|n| dedup.push(n.as_ref())).collect()
}

/// Returns `name`, or `name (k)` for the smallest `k >= 2` not in `existing`.
///
/// `existing` holds upper-cased names.
pub fn unique_against(name: &str, existing: &HashSet<String>) -> String {
    let upper = name.to_uppercase();
    if !existing.contains(&upper) {
        return name.to_string();
    }

    let mut counter = 2;
    while existing.contains(&format!("{} ({})", upper, counter)) {
        counter += 1;
    }
    format!("{} ({})", name, counter)
}
