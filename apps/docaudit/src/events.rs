//! Event handling and progress display

use console::{Style, Term};
use docaudit_events::{AppEvent, EventMessage, GeneralEvent, ReportKind, VerifyEvent};

use crate::logging::log_event_with_tracing;

/// Progress lines are printed each time this share of the batch completes
const PROGRESS_STEP_PERCENT: usize = 10;

/// Event handler for progress display and user feedback
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    debug_enabled: bool,
    /// Suppresses human-readable progress; events are still logged
    quiet: bool,
    last_step: usize,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            colors_enabled,
            debug_enabled,
            quiet,
            last_step: 0,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);
        if self.quiet {
            return;
        }

        match message.event {
            AppEvent::Verify(event) => self.handle_verify(event),
            AppEvent::General(event) => self.handle_general(event),
        }
    }

    fn handle_verify(&mut self, event: VerifyEvent) {
        match event {
            VerifyEvent::BatchStarted {
                label,
                total,
                concurrency,
            } => {
                self.last_step = 0;
                self.show_status(&format!(
                    "Checking {total} identifiers for {} ({concurrency} workers)",
                    self.bold(&label)
                ));
            }
            VerifyEvent::OutcomeRecorded {
                completed, total, ..
            } => {
                if total == 0 {
                    return;
                }
                let step = completed * 100 / total / PROGRESS_STEP_PERCENT;
                if step > self.last_step && completed < total {
                    self.last_step = step;
                    self.show_status(&format!(
                        "  {completed}/{total} ({}%)",
                        step * PROGRESS_STEP_PERCENT
                    ));
                }
            }
            VerifyEvent::ProbeRetrying {
                identifier,
                attempt,
                max_attempts,
                reason,
            } => {
                if self.debug_enabled {
                    self.show_warning(&format!(
                        "  retry {identifier} ({attempt}/{max_attempts}): {reason}"
                    ));
                }
            }
            VerifyEvent::BatchCompleted {
                label, duration_ms, ..
            } => {
                self.show_status(&format!("Finished {label} in {duration_ms} ms"));
            }
            VerifyEvent::ReportWritten {
                kind,
                path,
                records,
            } => {
                let what = match kind {
                    ReportKind::Missing => "missing",
                    ReportKind::Errors => "errored",
                };
                self.show_status(&format!(
                    "Saved {records} {what} identifiers to {}",
                    path.display()
                ));
            }
        }
    }

    fn handle_general(&self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => self.show_warning(&format!("{message} ({context})")),
                None => self.show_warning(&message),
            },
            GeneralEvent::Error { message, details } => match details {
                Some(details) => self.show_error(&format!("{message}: {details}")),
                None => self.show_error(&message),
            },
            GeneralEvent::OperationFailed { operation, error } => {
                self.show_error(&format!("{operation} failed: {error}"));
            }
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug_enabled {
                    self.show_status(&message);
                }
            }
            GeneralEvent::OperationStarted { .. } | GeneralEvent::OperationCompleted { .. } => {}
        }
    }

    fn show_status(&self, message: &str) {
        let _ = self.term.write_line(message);
    }

    fn show_warning(&self, message: &str) {
        let line = if self.colors_enabled {
            Style::new().yellow().apply_to(message).to_string()
        } else {
            message.to_string()
        };
        let _ = self.term.write_line(&line);
    }

    fn show_error(&self, message: &str) {
        let line = if self.colors_enabled {
            Style::new().red().bold().apply_to(message).to_string()
        } else {
            message.to_string()
        };
        let _ = self.term.write_line(&line);
    }

    fn bold(&self, text: &str) -> String {
        if self.colors_enabled {
            Style::new().bold().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}
