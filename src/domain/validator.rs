//! Person-name validation.
//!
//! A conjunctive filter: a candidate is a name only if every rule passes.
//! Missing a name sends the page to manual review; accepting a payroll label
//! as a name would deliver someone's payslip to the wrong person.

use super::text::{fold, normalize};
use crate::config::{Blacklist, ExtractionConfig};
use std::fmt;
use std::sync::Arc;

/// Keeps a ratio of exactly 1/3 at or under a configured 1/3.
const RATIO_EPSILON: f64 = 1e-9;

/// The rule a rejected candidate failed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooShort { len: usize, min: usize },
    WordCount { count: usize, min: usize, max: usize },
    ShortWord(String),
    InvalidCharacter(char),
    BlacklistedPhrase,
    BlacklistDensity { blacklisted: usize, total: usize },
    BlacklistedFirstWord(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len, min } => write!(f, "too short ({} < {})", len, min),
            Self::WordCount { count, min, max } => {
                write!(f, "{} words, expected {}..={}", count, min, max)
            }
            Self::ShortWord(w) => write!(f, "word '{}' shorter than 2 letters", w),
            Self::InvalidCharacter(c) => write!(f, "invalid character {:?}", c),
            Self::BlacklistedPhrase => write!(f, "contains blacklisted phrase"),
            Self::BlacklistDensity { blacklisted, total } => {
                write!(f, "{} of {} words blacklisted", blacklisted, total)
            }
            Self::BlacklistedFirstWord(w) => write!(f, "first word '{}' blacklisted", w),
        }
    }
}

/// Decides whether a candidate string is a plausible Brazilian person name.
#[derive(Debug, Clone)]
pub struct NameValidator {
    config: ExtractionConfig,
    blacklist: Arc<Blacklist>,
}

impl NameValidator {
    pub fn new(config: ExtractionConfig, blacklist: Arc<Blacklist>) -> Self {
        Self { config, blacklist }
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Returns true if the candidate passes every rule.
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.check(candidate).is_ok()
    }

    /// Runs the rules in order and reports the first failure.
    pub fn check(&self, candidate: &str) -> Result<(), Rejection> {
        let name = normalize(candidate);
        let len = name.chars().count();
        if len < self.config.min_name_len {
            return Err(Rejection::TooShort {
                len,
                min: self.config.min_name_len,
            });
        }

        let words: Vec<&str> = name.split(' ').collect();
        if words.len() < self.config.min_words || words.len() > self.config.max_words {
            return Err(Rejection::WordCount {
                count: words.len(),
                min: self.config.min_words,
                max: self.config.max_words,
            });
        }

        if let Some(short) = words.iter().find(|w| w.chars().count() < 2) {
            return Err(Rejection::ShortWord(short.to_string()));
        }

        if let Some(bad) = name.chars().find(|c| !c.is_alphabetic() && *c != ' ') {
            return Err(Rejection::InvalidCharacter(bad));
        }

        let folded = fold(&name);
        if self.blacklist.contains_phrase(&folded) {
            return Err(Rejection::BlacklistedPhrase);
        }

        let folded_words: Vec<&str> = folded.split(' ').collect();
        let blacklisted = folded_words
            .iter()
            .filter(|w| self.blacklist.is_blacklisted_word(w))
            .count();
        let ratio = blacklisted as f64 / folded_words.len() as f64;
        if ratio > self.config.max_blacklist_ratio + RATIO_EPSILON {
            return Err(Rejection::BlacklistDensity {
                blacklisted,
                total: folded_words.len(),
            });
        }

        if let Some(first) = folded_words.first() {
            if self.blacklist.is_blacklisted_word(first) {
                return Err(Rejection::BlacklistedFirstWord(first.to_string()));
            }
        }

        Ok(())
    }
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new(ExtractionConfig::default(), Arc::new(Blacklist::default()))
    }
}
