//! Per-file summary rendered after a run

use crate::aggregate::Aggregate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Summary of one input file's verification run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Input file name
    pub source: String,
    /// State or batch label
    pub label: String,
    /// Lines read from the input
    pub total_rows: usize,
    /// Blank or placeholder lines dropped by the loader
    pub blank_rows: usize,
    /// Unique identifiers submitted
    pub checked: usize,
    pub exists: usize,
    pub missing: usize,
    pub errors: usize,
    /// Wall-clock time for the run
    pub duration_ms: u64,
}

impl BatchSummary {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        label: impl Into<String>,
        aggregate: &Aggregate,
        duration: Duration,
    ) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
            total_rows: 0,
            blank_rows: 0,
            checked: aggregate.total(),
            exists: aggregate.exists,
            missing: aggregate.missing,
            errors: aggregate.errors,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Attach loader statistics
    #[must_use]
    pub fn with_rows(mut self, total_rows: usize, blank_rows: usize) -> Self {
        self.total_rows = total_rows;
        self.blank_rows = blank_rows;
        self
    }

    /// Share of `count` in the checked set, as a percentage
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self, count: usize) -> f64 {
        if self.checked == 0 {
            0.0
        } else {
            count as f64 / self.checked as f64 * 100.0
        }
    }

    /// Identifiers checked per second
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rate_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            self.checked as f64 / (self.duration_ms as f64 / 1000.0)
        }
    }
}
