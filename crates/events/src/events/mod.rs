use serde::{Deserialize, Serialize};

use crate::EventSource;

pub mod general;
pub mod verify;

pub use general::*;
pub use verify::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Verification batch lifecycle and per-identifier progress
    Verify(VerifyEvent),
}

impl AppEvent {
    /// Identify the source domain for this event
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Verify(VerifyEvent::ReportWritten { .. }) => EventSource::REPORT,
            Self::Verify(_) => EventSource::VERIFY,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. }) => {
                Level::ERROR
            }

            Self::General(GeneralEvent::Warning { .. })
            | Self::Verify(VerifyEvent::ProbeRetrying { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Verify(VerifyEvent::OutcomeRecorded { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "docaudit::events::general",
            Self::Verify(VerifyEvent::ReportWritten { .. }) => "docaudit::events::report",
            Self::Verify(_) => "docaudit::events::verify",
        }
    }
}
