//! Employee directory and name matching.
//!
//! The directory is the authoritative list of people a payslip can be
//! delivered to. It is loaded once per batch, validated on load, and only
//! read afterwards.

pub mod matcher;
pub mod similarity;

pub use matcher::{
    deliverable, DirectoryMatcher, MatchResult, MatchStats, MatchStatus, Suggestion,
};
pub use similarity::{EditDistanceSimilarity, Similarity, WordOverlapSimilarity};

use crate::domain::text::fold;
use crate::error::{HoleriteError, HoleriteResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Header aliases for the name column, compared case-insensitively.
const NAME_HEADERS: &[&str] = &["nome", "name", "funcionario", "colaborador"];
const EMAIL_HEADERS: &[&str] = &["email", "e-mail", "mail"];
const SLACK_HEADERS: &[&str] = &["slackid", "slack_id", "slack id", "slack"];

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "slackId", skip_serializing_if = "Option::is_none")]
    pub slack_id: Option<String>,
}

impl Employee {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            slack_id: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_slack_id(mut self, slack_id: impl Into<String>) -> Self {
        self.slack_id = Some(slack_id.into());
        self
    }

    /// True if the entry has a name and at least one contact.
    pub fn is_deliverable(&self) -> bool {
        !self.name.trim().is_empty() && (self.email.is_some() || self.slack_id.is_some())
    }

    /// Trims fields and turns blank contacts into `None`.
    fn cleaned(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: non_blank(self.email),
            slack_id: non_blank(self.slack_id),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validated, read-only employee list.
#[derive(Debug, Clone)]
pub struct Directory {
    employees: Vec<Employee>,
    folded: Vec<String>,
}

impl Directory {
    /// Builds a directory, dropping entries without a name or any contact.
    ///
    /// Fails only when no usable entry remains.
    pub fn from_employees<I>(records: I) -> HoleriteResult<Self>
    where
        I: IntoIterator<Item = Employee>,
    {
        let mut employees = Vec::new();
        let mut dropped = 0;

        for record in records {
            let record = record.cleaned();
            if record.is_deliverable() {
                employees.push(record);
            } else {
                warn!(
                    "dropping directory entry '{}': no name or no email/slack id",
                    record.name
                );
                dropped += 1;
            }
        }

        if employees.is_empty() {
            return Err(HoleriteError::EmptyDirectory { dropped });
        }

        debug!(
            "directory loaded: {} employees, {} dropped",
            employees.len(),
            dropped
        );
        let folded = employees.iter().map(|e| fold(&e.name)).collect();
        Ok(Self { employees, folded })
    }

    /// Parses a JSON array of `{"name", "email"?, "slack_id"?}` objects.
    pub fn from_json_str(json: &str) -> HoleriteResult<Self> {
        let records: Vec<Employee> = serde_json::from_str(json)?;
        Self::from_employees(records)
    }

    /// Reads a JSON directory file.
    pub fn load(path: &Path) -> HoleriteResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HoleriteError::io(path, e))?;
        Self::from_json_str(&content)
    }

    /// Builds a directory from decoded spreadsheet rows.
    ///
    /// Columns are located by header (`Nome`/`Name`/`Funcionario`/
    /// `Colaborador`, `Email`/`E-mail`/`Mail`, `SlackId`/`Slack_Id`/`Slack`),
    /// case-insensitively. A name column and at least one contact column are
    /// required.
    pub fn from_table<H, C>(headers: &[H], rows: &[Vec<C>]) -> HoleriteResult<Self>
    where
        H: AsRef<str>,
        C: AsRef<str>,
    {
        if rows.is_empty() {
            return Err(HoleriteError::DirectoryLoad {
                reason: "table has no rows".to_string(),
            });
        }

        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.contains(&h.as_ref().trim().to_lowercase().as_str()))
        };

        let name_col = find(NAME_HEADERS).ok_or_else(|| HoleriteError::DirectoryLoad {
            reason: "name column not found (use Nome, Name, Funcionario or Colaborador)"
                .to_string(),
        })?;
        let email_col = find(EMAIL_HEADERS);
        let slack_col = find(SLACK_HEADERS);
        if email_col.is_none() && slack_col.is_none() {
            return Err(HoleriteError::DirectoryLoad {
                reason: "email or slack id column not found (use Email or SlackId)".to_string(),
            });
        }

        let cell = |row: &Vec<C>, col: Option<usize>| {
            col.and_then(|c| row.get(c)).map(|v| v.as_ref().to_string())
        };

        let records = rows.iter().map(|row| Employee {
            name: cell(row, Some(name_col)).unwrap_or_default(),
            email: cell(row, email_col),
            slack_id: cell(row, slack_col),
        });
        Self::from_employees(records)
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Entries paired with their folded names.
    pub fn entries(&self) -> impl Iterator<Item = (&Employee, &str)> {
        self.employees
            .iter()
            .zip(self.folded.iter().map(String::as_str))
    }
}
