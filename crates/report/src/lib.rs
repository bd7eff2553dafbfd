#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Failure report persistence for docaudit
//!
//! After a batch finishes, the missing identifiers are written to a plain
//! text list and the errored identifiers to a JSON document, both under the
//! configured output directory. A list with no entries produces no file.

use chrono::Local;
use docaudit_errors::{Error, ReportError};
use docaudit_events::{EventEmitter, EventSender, ReportKind, VerifyEvent};
use docaudit_types::{Aggregate, FailureRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const RULE_WIDTH: usize = 50;

/// Where a batch's reports go and how they are labelled
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Name of the input the batch came from
    pub source: String,
    /// Batch label, used as the file name prefix
    pub label: String,
    pub output_dir: PathBuf,
}

impl ReportContext {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        label: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn missing_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_missing_act_nums.txt", self.label))
    }

    #[must_use]
    pub fn errors_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_error_act_nums.json", self.label))
    }
}

/// Paths of the files written for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmittedReports {
    pub missing: Option<PathBuf>,
    pub errors: Option<PathBuf>,
}

impl EmittedReports {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_none() && self.errors.is_none()
    }
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    filename: &'a str,
    state_code: &'a str,
    generated: String,
    total_errors: usize,
    errors: &'a [FailureRecord],
}

/// Writes the failure lists of an aggregate to disk
#[derive(Default)]
pub struct ReportEmitter {
    events: Option<EventSender>,
}

impl ReportEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Persist the missing and error lists of `aggregate`
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or a report
    /// cannot be serialized or written. Nothing is retried.
    pub async fn emit(
        &self,
        context: &ReportContext,
        aggregate: &Aggregate,
    ) -> Result<EmittedReports, Error> {
        let mut emitted = EmittedReports::default();
        if !aggregate.has_failures() {
            return Ok(emitted);
        }

        ensure_dir(&context.output_dir).await?;
        let generated = Local::now().format(TIMESTAMP_FORMAT).to_string();

        if !aggregate.missing_records.is_empty() {
            let path = context.missing_path();
            let body = render_missing(context, &aggregate.missing_records, &generated);
            write_report(&path, body).await?;
            self.written(ReportKind::Missing, &path, aggregate.missing_records.len());
            emitted.missing = Some(path);
        }

        if !aggregate.error_records.is_empty() {
            let path = context.errors_path();
            let report = ErrorReport {
                filename: &context.source,
                state_code: &context.label,
                generated,
                total_errors: aggregate.error_records.len(),
                errors: &aggregate.error_records,
            };
            let body = serde_json::to_string_pretty(&report).map_err(|e| {
                ReportError::SerializeFailed {
                    message: e.to_string(),
                }
            })?;
            write_report(&path, body).await?;
            self.written(ReportKind::Errors, &path, aggregate.error_records.len());
            emitted.errors = Some(path);
        }

        Ok(emitted)
    }

    fn written(&self, kind: ReportKind, path: &Path, records: usize) {
        info!(path = %path.display(), records, "report written");
        self.events.emit_verify(VerifyEvent::ReportWritten {
            kind,
            path: path.to_path_buf(),
            records,
        });
    }
}

fn render_missing(context: &ReportContext, records: &[FailureRecord], generated: &str) -> String {
    let mut body = format!(
        "Missing act_nums for {} ({})\nGenerated: {generated}\nTotal missing: {}\n{}\n\n",
        context.source,
        context.label,
        records.len(),
        "=".repeat(RULE_WIDTH)
    );
    for record in records {
        body.push_str(&record.identifier);
        body.push('\n');
    }
    body
}

async fn ensure_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).await.map_err(|e| {
        let err = if e.kind() == std::io::ErrorKind::PermissionDenied {
            ReportError::PermissionDenied {
                path: dir.display().to_string(),
            }
        } else {
            ReportError::CreateDirFailed {
                path: dir.display().to_string(),
                message: e.to_string(),
            }
        };
        err.into()
    })
}

async fn write_report(path: &Path, body: String) -> Result<(), Error> {
    fs::write(path, body)
        .await
        .map_err(|e| ReportError::from_io_with_path(&e, path).into())
}
