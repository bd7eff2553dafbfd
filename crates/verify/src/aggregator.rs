//! Folds outcomes into one consistent aggregate

use docaudit_events::{EventEmitter, EventSender, VerifyEvent};
use docaudit_types::{Aggregate, FailureRecord, Outcome, OutcomeKind};
use futures::{Stream, StreamExt};
use std::sync::{Mutex, PoisonError};

/// Accumulates outcomes from any number of producers
///
/// Every [`record`](Self::record) updates the counter, the matching failure
/// list and the detail list inside one critical section, so an observer never
/// sees them disagree.
pub struct Aggregator {
    state: Mutex<Aggregate>,
    expected: usize,
    events: Option<EventSender>,
}

impl Aggregator {
    /// Create an aggregator for a batch of `expected` identifiers
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            state: Mutex::new(Aggregate::default()),
            expected,
            events: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Record one outcome
    pub fn record(&self, outcome: Outcome) {
        let identifier = outcome.identifier().to_string();
        let kind = outcome.kind();

        let completed = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match kind {
                OutcomeKind::Exists => state.exists += 1,
                OutcomeKind::Missing => {
                    state.missing += 1;
                    state.missing_records.push(FailureRecord::from_outcome(&outcome));
                }
                OutcomeKind::Error => {
                    state.errors += 1;
                    state.error_records.push(FailureRecord::from_outcome(&outcome));
                }
            }
            state.details.push(outcome);
            state.total()
        };

        self.events.emit_verify(VerifyEvent::OutcomeRecorded {
            identifier,
            kind,
            completed,
            total: self.expected,
        });
    }

    /// Number of outcomes recorded so far
    #[must_use]
    pub fn completed(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total()
    }

    /// Drain a stream of outcomes and return the final aggregate
    pub async fn consume<S>(self, stream: S) -> Aggregate
    where
        S: Stream<Item = Outcome>,
    {
        futures::pin_mut!(stream);
        while let Some(outcome) = stream.next().await {
            self.record(outcome);
        }
        self.finish()
    }

    /// Close the aggregator and hand out the accumulated state
    #[must_use]
    pub fn finish(self) -> Aggregate {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
