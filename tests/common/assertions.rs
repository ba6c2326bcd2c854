//! Custom assertions for extraction and matching tests.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use holerite::{MatchResult, MatchStatus};
use std::collections::HashSet;

/// Asserts that no two names are equal ignoring case.
///
/// # Panics
/// Panics with the first duplicate found.
pub fn assert_case_insensitively_distinct(names: &[String]) {
    let mut seen = HashSet::new();
    for name in names {
        assert!(
            seen.insert(name.to_uppercase()),
            "Name '{}' appears more than once (case-insensitive) in {:?}",
            name,
            names
        );
    }
}

/// Asserts a page was matched automatically to `employee_name`.
pub fn assert_matched(result: &MatchResult, employee_name: &str) {
    assert_eq!(
        result.status,
        MatchStatus::Matched,
        "Page {} should be matched, got {:?}",
        result.page_number,
        result
    );
    let employee = result
        .employee
        .as_ref()
        .expect("Matched result must carry an employee");
    assert_eq!(employee.name, employee_name);
    assert!(
        result.score > 0 && result.score <= 100,
        "Score {} out of range",
        result.score
    );
}

/// Asserts the status/employee/score invariants every result must hold.
///
/// `accept_threshold` is the matcher's acceptance score; an automatic match
/// never scores below it.
///
/// # Panics
/// Panics if a status is paired with the wrong employee or score.
pub fn assert_result_consistent(result: &MatchResult, accept_threshold: u8) {
    match result.status {
        MatchStatus::Matched => {
            assert!(result.employee.is_some(), "Matched without employee: {:?}", result);
            assert!(
                result.score >= accept_threshold && result.score <= 100,
                "Matched with score {} outside {}..=100: {:?}",
                result.score,
                accept_threshold,
                result
            );
        }
        MatchStatus::Manual => {
            assert!(result.employee.is_some(), "Manual without employee: {:?}", result);
            assert_eq!(result.score, 100);
        }
        MatchStatus::NotFound => {
            assert!(result.employee.is_none(), "NotFound with employee: {:?}", result);
            assert!(result.extracted_name.is_some());
            assert_eq!(result.score, 0);
        }
        MatchStatus::NoName => {
            assert!(result.employee.is_none(), "NoName with employee: {:?}", result);
            assert!(result.extracted_name.is_none());
            assert_eq!(result.score, 0);
        }
    }
}
