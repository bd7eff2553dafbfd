//! Bounded fan-out of probes across tokio tasks

use docaudit_config::{acquire_semaphore_permit, create_semaphore};
use docaudit_types::Outcome;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::probe::Probe;

/// Runs one probe task per identifier, at most `concurrency` at a time
pub struct Dispatcher<P> {
    probe: Arc<P>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl<P: Probe> Dispatcher<P> {
    /// Create a dispatcher; a concurrency of zero is treated as one
    #[must_use]
    pub fn new(probe: Arc<P>, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            probe,
            semaphore: create_semaphore(concurrency),
            concurrency,
        }
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Submit every identifier and return the outcomes in completion order
    ///
    /// Must be called from within a tokio runtime. Each identifier is an
    /// independent task, duplicates included.
    #[must_use]
    pub fn dispatch<I, S>(&self, identifiers: I) -> OutcomeStream
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tasks = JoinSet::new();

        for identifier in identifiers {
            let identifier = identifier.into();
            let probe = Arc::clone(&self.probe);
            let semaphore = Arc::clone(&self.semaphore);

            tasks.spawn(async move {
                let _permit = match acquire_semaphore_permit(semaphore, "probe").await {
                    Ok(permit) => permit,
                    Err(e) => return Outcome::worker_fault(e),
                };
                probe.probe(&identifier).await
            });
        }

        OutcomeStream { tasks }
    }
}

/// Outcomes of dispatched probes, yielded as each one finishes
///
/// Dropping the stream aborts every task that has not finished yet.
pub struct OutcomeStream {
    tasks: JoinSet<Outcome>,
}

impl OutcomeStream {
    /// Number of tasks that have not been yielded yet
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl Stream for OutcomeStream {
    type Item = Outcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Outcome>> {
        loop {
            match ready!(self.tasks.poll_join_next(cx)) {
                None => return Poll::Ready(None),
                Some(Ok(outcome)) => return Poll::Ready(Some(outcome)),
                Some(Err(e)) if e.is_cancelled() => {}
                Some(Err(e)) => {
                    warn!(error = %e, "probe task faulted");
                    return Poll::Ready(Some(Outcome::worker_fault(e)));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.tasks.len()))
    }
}
