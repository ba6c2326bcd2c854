//! Employee name extraction and directory matching for payslip batches.
//!
//! A payroll PDF holds one payslip per page. This library finds the
//! employee's name in each page's text, turns it into a unique display name
//! and a safe filename stem, and resolves it against an employee directory so
//! the page can be delivered by email or Slack.
//!
//! # Features
//!
//! - **Layered Extraction**: layout, label, and upper-case fallback rules, best candidate wins
//! - **Boilerplate Filtering**: configurable blacklist of payroll phrases and words
//! - **Stable Deduplication**: repeated names become `NAME (2)`, `NAME (3)`, ...
//! - **Fuzzy Matching**: accent-insensitive scoring with "did you mean" suggestions
//!
//! # Architecture
//!
//! - [`domain`]: page-local name logic (text folding, validation, extraction, dedupe, sanitizing)
//! - [`directory`]: employee directory and matcher
//! - [`batch`]: one document, page by page
//! - [`config`]: thresholds and blacklist data
//! - [`error`]: error handling
//!
//! # Quick Start
//!
//! ```
//! use holerite::{Directory, DirectoryMatcher, Employee, MatchStatus, NameExtractor, Settings};
//! use holerite::batch::{PageText, PayslipBatch};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pages = vec![
//!     PageText::new(1, "20 Código AMANDA SANTOS COSTA Nome do Funcionário CBO 212405"),
//!     PageText::new(2, "Total de Vencimentos 3.120,00"),
//! ];
//! let batch = PayslipBatch::extract(&pages, &NameExtractor::default())?;
//! assert_eq!(
//!     batch.display_names(),
//!     vec!["AMANDA SANTOS COSTA", "SEM NOME - PAGINA 2"]
//! );
//!
//! let directory = Directory::from_employees(vec![
//!     Employee::new("Amanda Santos Costa").with_email("amanda@example.com"),
//! ])?;
//! let matcher = DirectoryMatcher::new(directory, Settings::default().matching);
//! let results = batch.match_directory(&matcher);
//! assert_eq!(results[0].status, MatchStatus::Matched);
//! assert_eq!(results[1].status, MatchStatus::NoName);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod directory;
pub mod domain;
pub mod error;

pub use batch::{FormFeedPages, PageResult, PageText, PageTextSource, PayslipBatch};
pub use config::{Blacklist, ExtractionConfig, MatchConfig, Settings, TieBreak};
pub use directory::{
    Directory, DirectoryMatcher, Employee, MatchResult, MatchStats, MatchStatus, Suggestion,
};
pub use domain::{deduplicate, sanitize, NameExtractor, NameValidator};
pub use error::{HoleriteError, HoleriteResult};

use std::sync::Arc;

/// Builds an extractor from loaded settings and blacklist.
pub fn extractor_from(settings: &Settings, blacklist: Blacklist) -> NameExtractor {
    NameExtractor::new(NameValidator::new(
        settings.extraction.clone(),
        Arc::new(blacklist),
    ))
}
