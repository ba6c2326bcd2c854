//! Page-local name logic.
//!
//! Everything here works on one string at a time and holds no state across
//! pages, except [`dedupe::Deduplicator`], which is scoped to one batch.

pub mod dedupe;
pub mod extractor;
pub mod sanitize;
pub mod text;
pub mod validator;

pub use dedupe::{deduplicate, deduplicate_within, unique_against, Deduplicator};
pub use extractor::{
    EmployeeCodeRule, EmployeeLabelRule, ExtractionRule, ExtractionStrategy, NameCandidate,
    NameExtractor, RawCapture, UppercaseRunRule,
};
pub use sanitize::sanitize;
pub use text::{fold, normalize};
pub use validator::{NameValidator, Rejection};
