//! Aggregated results of one verification run

use crate::outcome::{Outcome, OutcomeKind};
use serde::{Deserialize, Serialize};

/// One missing or failed identifier, as persisted in failure reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    #[serde(rename = "act_num")]
    pub identifier: String,
    pub status_code: Option<u16>,
    pub error: String,
}

impl FailureRecord {
    /// Build a record from a non-`Exists` outcome
    #[must_use]
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let fallback = match outcome.kind() {
            OutcomeKind::Missing => "Not found",
            _ => "Unknown error",
        };
        Self {
            identifier: outcome.identifier().to_string(),
            status_code: outcome.status_code(),
            error: outcome.error_message().unwrap_or(fallback).to_string(),
        }
    }
}

/// Final result of a run
///
/// Counts and failure lists are in completion order; `details` holds every
/// outcome exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub exists: usize,
    pub missing: usize,
    pub errors: usize,
    pub missing_records: Vec<FailureRecord>,
    pub error_records: Vec<FailureRecord>,
    pub details: Vec<Outcome>,
}

impl Aggregate {
    /// Number of outcomes recorded
    #[must_use]
    pub fn total(&self) -> usize {
        self.exists + self.missing + self.errors
    }

    /// Whether counts, lists and details all agree with `submitted`
    #[must_use]
    pub fn is_consistent(&self, submitted: usize) -> bool {
        self.total() == submitted
            && self.details.len() == submitted
            && self.missing_records.len() == self.missing
            && self.error_records.len() == self.errors
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.missing > 0 || self.errors > 0
    }
}
