use docaudit_types::OutcomeKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which failure list a report file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Missing,
    Errors,
}

/// Events emitted while a batch of identifiers is verified
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VerifyEvent {
    /// Work has been submitted to the dispatcher
    BatchStarted {
        label: String,
        total: usize,
        concurrency: usize,
    },

    /// A probe hit a transient failure and will try again
    ProbeRetrying {
        identifier: String,
        attempt: u32,
        max_attempts: u32,
        reason: String,
    },

    /// The aggregator accepted one outcome
    OutcomeRecorded {
        identifier: String,
        kind: OutcomeKind,
        completed: usize,
        total: usize,
    },

    /// Every submitted identifier has an outcome
    BatchCompleted {
        label: String,
        exists: usize,
        missing: usize,
        errors: usize,
        duration_ms: u64,
    },

    /// A failure list was persisted
    ReportWritten {
        kind: ReportKind,
        path: PathBuf,
        records: usize,
    },
}
