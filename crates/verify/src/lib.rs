#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Concurrent verification of identifier batches
//!
//! The dispatcher fans identifiers out to probe tasks under a concurrency
//! limit, and the aggregator folds the resulting outcomes back into one
//! [`Aggregate`]. A run always produces exactly one outcome per submitted
//! identifier unless it is cancelled by dropping the future.

mod aggregator;
mod dispatcher;
mod probe;

pub use aggregator::Aggregator;
pub use dispatcher::{Dispatcher, OutcomeStream};
pub use probe::Probe;

use docaudit_events::{AppEvent, EventEmitter, EventMeta, EventSender, VerifyEvent};
use docaudit_types::Aggregate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Aggregate of one batch plus how long it took
#[derive(Debug, Clone)]
pub struct VerifiedBatch {
    pub aggregate: Aggregate,
    pub elapsed: Duration,
}

/// Runs whole batches through a dispatcher and aggregator
pub struct Verifier<P> {
    dispatcher: Dispatcher<P>,
    events: Option<EventSender>,
}

impl<P: Probe> Verifier<P> {
    #[must_use]
    pub fn new(probe: Arc<P>, concurrency: usize) -> Self {
        Self {
            dispatcher: Dispatcher::new(probe, concurrency),
            events: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Verify every identifier and wait for the aggregate
    ///
    /// `label` only tags events and logs. Dropping the returned future aborts
    /// all probes still in flight.
    pub async fn verify(&self, label: &str, identifiers: Vec<String>) -> VerifiedBatch {
        let total = identifiers.len();
        let start = Instant::now();

        info!(label, total, concurrency = self.dispatcher.concurrency(), "verifying batch");
        self.emit_batch_event(
            label,
            VerifyEvent::BatchStarted {
                label: label.to_string(),
                total,
                concurrency: self.dispatcher.concurrency(),
            },
        );

        let mut aggregator = Aggregator::new(total);
        if let Some(events) = &self.events {
            aggregator = aggregator.with_events(events.clone());
        }
        let aggregate = aggregator
            .consume(self.dispatcher.dispatch(identifiers))
            .await;
        let elapsed = start.elapsed();

        debug_assert!(aggregate.is_consistent(total));
        debug!(
            label,
            exists = aggregate.exists,
            missing = aggregate.missing,
            errors = aggregate.errors,
            "batch aggregated"
        );
        self.emit_batch_event(
            label,
            VerifyEvent::BatchCompleted {
                label: label.to_string(),
                exists: aggregate.exists,
                missing: aggregate.missing,
                errors: aggregate.errors,
                duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            },
        );

        VerifiedBatch { aggregate, elapsed }
    }

    /// Batch start and end events carry the label as their correlation id
    fn emit_batch_event(&self, label: &str, event: VerifyEvent) {
        let event = AppEvent::Verify(event);
        let meta =
            EventMeta::new(event.log_level(), event.event_source()).with_correlation_id(label);
        self.events.emit_with_meta(meta, event);
    }
}

/// Verify a batch with a one-off verifier
pub async fn verify_batch<P: Probe>(
    probe: Arc<P>,
    identifiers: Vec<String>,
    concurrency: usize,
) -> Aggregate {
    Verifier::new(probe, concurrency)
        .verify("batch", identifiers)
        .await
        .aggregate
}
