#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in docaudit
//!
//! Library crates never print. They emit [`AppEvent`]s on an unbounded
//! channel and the CLI decides how to render or log them.

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, GeneralEvent, ReportKind, VerifyEvent};

use tokio::sync::mpsc::UnboundedSender;

/// An event together with the metadata captured when it was emitted
#[derive(Debug, Clone)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with metadata derived from its domain and level
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// Implemented for the raw `EventSender` and for any component that may or
/// may not hold one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event with explicit metadata
    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        self.emit_with_meta(meta, event);
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit a warning event with context
    fn emit_warning_with_context(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning_with_context(
            message, context,
        )));
    }

    /// Emit an error event
    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit a verification event
    fn emit_verify(&self, event: VerifyEvent) {
        self.emit(AppEvent::Verify(event));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// Components that may run without a listener
impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docaudit_types::OutcomeKind;

    #[tokio::test]
    async fn test_emit_attaches_meta_from_event() {
        let (tx, mut rx) = channel();
        tx.emit_verify(VerifyEvent::OutcomeRecorded {
            identifier: "HB 1".to_string(),
            kind: OutcomeKind::Missing,
            completed: 1,
            total: 3,
        });

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.source, EventSource::VERIFY);
        assert_eq!(message.meta.level, EventLevel::Debug);
        assert!(matches!(
            message.event,
            AppEvent::Verify(VerifyEvent::OutcomeRecorded { completed: 1, .. })
        ));
    }

    #[test]
    fn test_emit_without_sender_is_noop() {
        let emitter: Option<EventSender> = None;
        emitter.emit_warning("nobody listening");
    }

    #[test]
    fn test_emit_after_receiver_dropped_is_ignored() {
        let (tx, rx) = channel();
        drop(rx);
        tx.emit_error("receiver gone");
    }
}
