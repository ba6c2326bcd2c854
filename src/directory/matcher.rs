//! Matching extracted names against the employee directory.
//!
//! A page ends up in exactly one [`MatchStatus`]:
//!
//! - `NoName`: extraction found nothing; the directory is not consulted
//! - `Matched`: the best entry scored at or above the acceptance threshold
//! - `NotFound`: a name exists but no entry is confident enough
//! - `Manual`: a person assigned the employee by hand
//!
//! None of these is an error. `NoName` and `NotFound` pages go to a human,
//! helped by [`DirectoryMatcher::suggest`].

use super::similarity::{EditDistanceSimilarity, Similarity, WordOverlapSimilarity};
use super::{Directory, Employee};
use crate::config::{MatchConfig, TieBreak};
use crate::domain::text::fold;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Outcome of matching one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Manual,
    NotFound,
    NoName,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Matched => "matched",
            Self::Manual => "manual",
            Self::NotFound => "not_found",
            Self::NoName => "no_name",
        };
        f.write_str(label)
    }
}

/// Match decision for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// 0-based index in the source document
    pub page_index: usize,
    /// 1-based page number
    pub page_number: usize,
    pub extracted_name: Option<String>,
    pub employee: Option<Employee>,
    /// Confidence, 0..=100
    pub score: u8,
    pub status: MatchStatus,
}

impl MatchResult {
    /// Result for a page without an extracted name.
    pub fn no_name(page_index: usize, page_number: usize) -> Self {
        Self {
            page_index,
            page_number,
            extracted_name: None,
            employee: None,
            score: 0,
            status: MatchStatus::NoName,
        }
    }

    /// Result for a named page without a confident match.
    pub fn not_found(page_index: usize, page_number: usize, name: impl Into<String>) -> Self {
        Self {
            page_index,
            page_number,
            extracted_name: Some(name.into()),
            employee: None,
            score: 0,
            status: MatchStatus::NotFound,
        }
    }

    /// Manually assigns an employee, bypassing scoring.
    pub fn assign(&mut self, employee: Employee) {
        self.employee = Some(employee);
        self.score = 100;
        self.status = MatchStatus::Manual;
    }

    /// Manually removes the employee.
    ///
    /// The page falls back to `NotFound` or `NoName` depending on whether a
    /// name was extracted, so that no other status is left without an
    /// employee.
    pub fn clear(&mut self) {
        self.employee = None;
        self.score = 0;
        self.status = if self.extracted_name.is_some() {
            MatchStatus::NotFound
        } else {
            MatchStatus::NoName
        };
    }

    /// True if the page can be handed to a delivery collaborator.
    pub fn is_deliverable(&self) -> bool {
        self.employee.is_some()
    }
}

/// A directory entry proposed for manual resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub employee: Employee,
    pub similarity: u8,
}

/// Per-status counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub total: usize,
    pub matched: usize,
    pub manual: usize,
    pub not_found: usize,
    pub no_name: usize,
}

impl MatchStats {
    pub fn from_results(results: &[MatchResult]) -> Self {
        results.iter().fold(Self::default(), |mut stats, r| {
            stats.total += 1;
            match r.status {
                MatchStatus::Matched => stats.matched += 1,
                MatchStatus::Manual => stats.manual += 1,
                MatchStatus::NotFound => stats.not_found += 1,
                MatchStatus::NoName => stats.no_name += 1,
            }
            stats
        })
    }

    /// Pages that still need a human.
    pub fn unresolved(&self) -> usize {
        self.not_found + self.no_name
    }
}

/// Results that carry an employee, in input order.
pub fn deliverable(results: &[MatchResult]) -> impl Iterator<Item = &MatchResult> {
    results.iter().filter(|r| r.is_deliverable())
}

/// Resolves extracted names against a [`Directory`].
///
/// Acceptance uses [`WordOverlapSimilarity`]; suggestions use
/// [`EditDistanceSimilarity`]. Either can be replaced.
pub struct DirectoryMatcher {
    directory: Directory,
    config: MatchConfig,
    scorer: Box<dyn Similarity>,
    suggester: Box<dyn Similarity>,
}

impl DirectoryMatcher {
    pub fn new(directory: Directory, config: MatchConfig) -> Self {
        Self {
            directory,
            config,
            scorer: Box::new(WordOverlapSimilarity),
            suggester: Box::new(EditDistanceSimilarity),
        }
    }

    /// Replaces the similarity used for accepting matches.
    pub fn with_scorer(mut self, scorer: impl Similarity + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Replaces the similarity used for suggestions.
    pub fn with_suggester(mut self, suggester: impl Similarity + 'static) -> Self {
        self.suggester = Box::new(suggester);
        self
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Returns the best-scoring entry if it clears the acceptance threshold.
    ///
    /// Entries scoring 0 are never returned. Ties at the best score follow
    /// the configured [`TieBreak`].
    pub fn best_match(&self, name: &str) -> Option<(&Employee, u8)> {
        let folded = fold(name);
        let mut best_score = 0;
        let mut tied: Vec<&Employee> = Vec::new();

        for (employee, entry) in self.directory.entries() {
            let score = self.scorer.score(&folded, entry);
            if score > best_score {
                best_score = score;
                tied.clear();
                tied.push(employee);
            } else if score == best_score && score > 0 {
                tied.push(employee);
            }
        }

        if best_score < self.config.accept_threshold || tied.is_empty() {
            return None;
        }

        if tied.len() > 1 {
            warn!(
                "'{}' ties with {} directory entries at score {}",
                name,
                tied.len(),
                best_score
            );
        }

        let chosen = match self.config.tie_break {
            TieBreak::FirstEncountered => tied.first().copied(),
            TieBreak::LastEncountered => tied.last().copied(),
            TieBreak::RejectAmbiguous if tied.len() > 1 => None,
            TieBreak::RejectAmbiguous => tied.first().copied(),
        };
        chosen.map(|employee| (employee, best_score))
    }

    /// Matches one page's extracted name.
    pub fn match_page(
        &self,
        page_index: usize,
        page_number: usize,
        name: Option<&str>,
    ) -> MatchResult {
        let Some(name) = name else {
            debug!("page {}: no name, skipping directory", page_number);
            return MatchResult::no_name(page_index, page_number);
        };

        match self.best_match(name) {
            Some((employee, score)) => {
                debug!(
                    "page {}: '{}' matched '{}' ({})",
                    page_number, name, employee.name, score
                );
                MatchResult {
                    page_index,
                    page_number,
                    extracted_name: Some(name.to_string()),
                    employee: Some(employee.clone()),
                    score,
                    status: MatchStatus::Matched,
                }
            }
            None => {
                debug!("page {}: '{}' not found in directory", page_number, name);
                MatchResult::not_found(page_index, page_number, name)
            }
        }
    }

    /// Up to `suggestion_limit` entries whose edit-distance similarity to
    /// `name` reaches `suggestion_threshold`, most similar first.
    pub fn suggest(&self, name: &str) -> Vec<Suggestion> {
        let folded = fold(name);
        let mut suggestions: Vec<Suggestion> = self
            .directory
            .entries()
            .filter_map(|(employee, entry)| {
                let similarity = self.suggester.score(&folded, entry);
                (similarity >= self.config.suggestion_threshold).then(|| Suggestion {
                    employee: employee.clone(),
                    similarity,
                })
            })
            .collect();

        // Stable: equal similarities keep directory order.
        suggestions.sort_by(|a, b| b.similarity.cmp(&a.similarity));
        suggestions.truncate(self.config.suggestion_limit);
        suggestions
    }

    /// Suggestions for a page that still needs a human, empty otherwise.
    pub fn suggest_for(&self, result: &MatchResult) -> Vec<Suggestion> {
        match (&result.status, &result.extracted_name) {
            (MatchStatus::NotFound | MatchStatus::NoName, Some(name)) => self.suggest(name),
            _ => Vec::new(),
        }
    }

    /// Direct lookup: exact folded match first, then containment either way.
    ///
    /// The first entry in directory order wins within each pass.
    pub fn lookup(&self, name: &str) -> Option<&Employee> {
        let folded = fold(name);
        if folded.is_empty() {
            return None;
        }
        self.directory
            .entries()
            .find(|(_, entry)| *entry == folded)
            .or_else(|| {
                self.directory
                    .entries()
                    .find(|(_, entry)| entry.contains(folded.as_str()) || folded.contains(entry))
            })
            .map(|(employee, _)| employee)
    }
}
