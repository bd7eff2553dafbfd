//! Tracing setup and structured logging of events

use docaudit_events::{AppEvent, EventMessage, GeneralEvent, VerifyEvent};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,docaudit=info";
const DEBUG_FILTER: &str = "info,docaudit=debug,docaudit_net=debug,docaudit_verify=debug";

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the built-in filters. JSON mode writes structured
/// records to stderr so stdout stays machine-readable.
pub fn init_tracing(json_mode: bool, debug_enabled: bool) {
    let fallback = if debug_enabled {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    if json_mode {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(debug_enabled)
            .with_env_filter(filter)
            .init();
    }
}

/// Log an event with structured fields at the level its metadata carries
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    let source = meta.source.as_str();

    match &message.event {
        AppEvent::Verify(verify_event) => match verify_event {
            VerifyEvent::BatchStarted {
                label,
                total,
                concurrency,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation_id = ?meta.correlation_id,
                    label = %label,
                    total,
                    concurrency,
                    "Batch started"
                );
            }
            VerifyEvent::ProbeRetrying {
                identifier,
                attempt,
                max_attempts,
                reason,
            } => {
                warn!(
                    source,
                    identifier = %identifier,
                    attempt,
                    max_attempts,
                    reason = %reason,
                    "Probe retrying"
                );
            }
            VerifyEvent::OutcomeRecorded {
                identifier,
                kind,
                completed,
                total,
            } => {
                debug!(
                    source,
                    identifier = %identifier,
                    kind = %kind,
                    completed,
                    total,
                    "Outcome recorded"
                );
            }
            VerifyEvent::BatchCompleted {
                label,
                exists,
                missing,
                errors,
                duration_ms,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation_id = ?meta.correlation_id,
                    label = %label,
                    exists,
                    missing,
                    errors,
                    duration_ms,
                    "Batch completed"
                );
            }
            VerifyEvent::ReportWritten {
                kind,
                path,
                records,
            } => {
                info!(
                    source,
                    kind = ?kind,
                    path = %path.display(),
                    records,
                    "Report written"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::Warning { message, context } => {
                warn!(source, context = ?context, "{message}");
            }
            GeneralEvent::Error { message, details } => {
                error!(source, details = ?details, "{message}");
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(source, context = ?context, "{message}");
            }
            GeneralEvent::OperationStarted { operation } => {
                info!(source, operation = %operation, "Operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(source, operation = %operation, success, "Operation completed");
            }
            GeneralEvent::OperationFailed { operation, error } => {
                error!(source, operation = %operation, error = %error, "Operation failed");
            }
        },
    }
}
