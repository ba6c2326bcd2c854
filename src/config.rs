//! Tunable thresholds and blacklist data.
//!
//! Every number that decides whether a string is a name, or whether a name
//! matches a directory entry, lives here rather than next to the algorithm.
//! Both [`Settings`] and [`Blacklist`] load from JSON so that locale or
//! company specific boilerplate can change without a rebuild.

use crate::domain::text::fold;
use crate::error::{HoleriteError, HoleriteResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Blacklist shipped with the crate.
const DEFAULT_BLACKLIST: &str = include_str!("../data/blacklist.json");

/// Thresholds used by the name validator and the extraction rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum length of an accepted name, in characters
    pub min_name_len: usize,
    /// Minimum number of words in a name
    pub min_words: usize,
    /// Maximum number of words in a name
    pub max_words: usize,
    /// Highest tolerated fraction of blacklisted words
    pub max_blacklist_ratio: f64,
    /// Smallest employee code accepted by the layout rule
    pub min_employee_code: u32,
    /// Largest employee code accepted by the layout rule
    pub max_employee_code: u32,
    /// Characters searched on either side of the "Nome do Funcionário" label
    pub label_window: usize,
    /// Minimum length of an upper-case run picked up by the fallback rule
    pub fallback_min_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_name_len: 8,
            min_words: 2,
            max_words: 7,
            max_blacklist_ratio: 1.0 / 3.0,
            min_employee_code: 1,
            max_employee_code: 500,
            label_window: 50,
            fallback_min_len: 15,
        }
    }
}

/// How to pick between directory entries sharing the best score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the entry that appears first in the directory
    #[default]
    FirstEncountered,
    /// Keep the entry that appears last in the directory
    LastEncountered,
    /// Refuse to pick; the page is reported as not found
    RejectAmbiguous,
}

/// Thresholds used by the directory matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum score for an automatic match
    pub accept_threshold: u8,
    /// Minimum edit-distance similarity for a suggestion
    pub suggestion_threshold: u8,
    /// Maximum number of suggestions returned
    pub suggestion_limit: usize,
    pub tie_break: TieBreak,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 60,
            suggestion_threshold: 50,
            suggestion_limit: 5,
            tie_break: TieBreak::default(),
        }
    }
}

/// All tunable settings, as stored in a settings file.
///
/// Missing sections and fields fall back to their defaults, so a file only
/// needs to name what it changes:
///
/// ```
/// use holerite::Settings;
///
/// let settings = Settings::from_json_str(r#"{ "matching": { "accept_threshold": 80 } }"#).unwrap();
/// assert_eq!(settings.matching.accept_threshold, 80);
/// assert_eq!(settings.extraction.max_words, 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extraction: ExtractionConfig,
    pub matching: MatchConfig,
}

impl Settings {
    /// Parses settings from a JSON document and checks their ranges.
    pub fn from_json_str(json: &str) -> HoleriteResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn load(path: &Path) -> HoleriteResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HoleriteError::io(path, e))?;
        Self::from_json_str(&content)
    }

    /// Rejects settings that would make every name or every match impossible.
    pub fn validate(&self) -> HoleriteResult<()> {
        let ex = &self.extraction;
        if ex.min_words == 0 || ex.min_words > ex.max_words {
            return Err(config_error(
                "extraction.min_words",
                format!("must be between 1 and max_words ({})", ex.max_words),
            ));
        }
        if !(0.0..=1.0).contains(&ex.max_blacklist_ratio) {
            return Err(config_error(
                "extraction.max_blacklist_ratio",
                "must be within 0.0..=1.0",
            ));
        }
        if ex.min_employee_code > ex.max_employee_code {
            return Err(config_error(
                "extraction.min_employee_code",
                "must not exceed max_employee_code",
            ));
        }
        let m = &self.matching;
        if m.accept_threshold > 100 || m.suggestion_threshold > 100 {
            return Err(config_error("matching", "thresholds must be within 0..=100"));
        }
        Ok(())
    }
}

fn config_error(field: &str, reason: impl Into<String>) -> HoleriteError {
    HoleriteError::Config {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// On-disk shape of a blacklist file.
#[derive(Debug, Deserialize)]
struct BlacklistFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    phrases: Vec<String>,
    #[serde(default)]
    words: Vec<String>,
}

/// Payroll boilerplate that must never be taken for a person's name.
///
/// Phrases are matched as folded substrings of a candidate; words are matched
/// against individual folded words. Entries are folded on load, so the file
/// may spell them with or without accents.
#[derive(Debug, Clone, PartialEq)]
pub struct Blacklist {
    version: u32,
    phrases: Vec<String>,
    words: HashSet<String>,
}

impl Blacklist {
    /// Builds a blacklist from raw phrase and word lists.
    pub fn new<P, W>(version: u32, phrases: P, words: W) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let mut phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| fold(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        phrases.sort();
        phrases.dedup();

        let words = words
            .into_iter()
            .map(|w| fold(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            version,
            phrases,
            words,
        }
    }

    /// Parses a blacklist JSON document (`{"version", "phrases", "words"}`).
    pub fn from_json_str(json: &str) -> HoleriteResult<Self> {
        let file: BlacklistFile = serde_json::from_str(json)?;
        Ok(Self::new(file.version, file.phrases, file.words))
    }

    /// Reads a blacklist file.
    pub fn load(path: &Path) -> HoleriteResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HoleriteError::io(path, e))?;
        Self::from_json_str(&content)
    }

    /// Adds every entry of `other`; the higher version number is kept.
    pub fn merge(&mut self, other: &Blacklist) {
        self.version = self.version.max(other.version);
        for phrase in &other.phrases {
            if !self.phrases.contains(phrase) {
                self.phrases.push(phrase.clone());
            }
        }
        self.words.extend(other.words.iter().cloned());
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns true if the folded text contains a blacklisted phrase.
    pub fn contains_phrase(&self, folded_text: &str) -> bool {
        self.phrases.iter().any(|p| folded_text.contains(p.as_str()))
    }

    /// Returns true if the folded word is blacklisted.
    pub fn is_blacklisted_word(&self, folded_word: &str) -> bool {
        self.words.contains(folded_word)
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::from_json_str(DEFAULT_BLACKLIST).expect("Valid embedded blacklist")
    }
}
