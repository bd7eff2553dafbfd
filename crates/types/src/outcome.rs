//! Per-identifier verification outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder identifier for outcomes whose work item faulted before it
/// could report which identifier it was checking.
pub const UNKNOWN_IDENTIFIER: &str = "unknown";

/// Trim an identifier, returning `None` when nothing is left.
#[must_use]
pub fn normalize_identifier(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Final classification of one identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Exists,
    Missing,
    Error,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => write!(f, "exists"),
            Self::Missing => write!(f, "missing"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Why an identifier did not resolve to `Exists`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Empty or whitespace-only identifier, never sent to the network
    InvalidIdentifier,
    /// Definitive negative from the store
    NotFound,
    /// Timeout or transport failure that outlived every retry
    Transient,
    /// Completed response with a status other than found/not found
    UnexpectedStatus,
    /// The unit of work itself faulted
    WorkerFault,
}

/// Result of checking a single identifier. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    identifier: String,
    kind: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<FailureClass>,
    status_code: Option<u16>,
    error: Option<String>,
}

impl Outcome {
    /// The object was found
    #[must_use]
    pub fn exists(identifier: impl Into<String>, status_code: u16) -> Self {
        Self {
            identifier: identifier.into(),
            kind: OutcomeKind::Exists,
            failure: None,
            status_code: Some(status_code),
            error: None,
        }
    }

    /// The store answered with a definitive "not found"
    #[must_use]
    pub fn missing(identifier: impl Into<String>, status_code: u16) -> Self {
        Self {
            identifier: identifier.into(),
            kind: OutcomeKind::Missing,
            failure: Some(FailureClass::NotFound),
            status_code: Some(status_code),
            error: Some("Not found".to_string()),
        }
    }

    /// Any outcome that lands in the error bucket
    #[must_use]
    pub fn error(
        identifier: impl Into<String>,
        failure: FailureClass,
        status_code: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            kind: OutcomeKind::Error,
            failure: Some(failure),
            status_code,
            error: Some(message.into()),
        }
    }

    /// Identifier was blank after trimming
    #[must_use]
    pub fn invalid(identifier: impl Into<String>) -> Self {
        Self::error(
            identifier,
            FailureClass::InvalidIdentifier,
            None,
            "Empty identifier",
        )
    }

    /// A work item faulted; the identifier is not recoverable from the fault
    #[must_use]
    pub fn worker_fault(detail: impl fmt::Display) -> Self {
        Self::error(
            UNKNOWN_IDENTIFIER,
            FailureClass::WorkerFault,
            None,
            format!("Processing error: {detail}"),
        )
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    #[must_use]
    pub fn failure(&self) -> Option<FailureClass> {
        self.failure
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
