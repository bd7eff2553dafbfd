//! Existence probe for a single identifier
//!
//! One probe is a small state machine: attempt, then either finish with a
//! classified outcome or hit a transient failure and attempt again until the
//! retry policy runs out. Callers only ever see the final outcome.

use async_trait::async_trait;
use docaudit_events::{EventEmitter, EventSender, VerifyEvent};
use docaudit_types::{normalize_identifier, FailureClass, Outcome};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::resolver::ObjectUrlResolver;
use crate::retry::RetryPolicy;

const STATUS_FOUND: u16 = 200;
const STATUS_NOT_FOUND: u16 = 404;

/// Transport-level failure of one HEAD attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Request(String),
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Request(detail) => write!(f, "{detail}"),
        }
    }
}

/// Metadata-only existence check against a URL
#[async_trait]
pub trait HeadTransport: Send + Sync {
    /// Issue one HEAD request and return the final status code
    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, TransportFailure>;
}

/// Final outcome of a probe plus the number of attempts it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub outcome: Outcome,
    /// Zero when the identifier never reached the network
    pub attempts: u32,
}

/// Failure that may succeed on another attempt
#[derive(Debug, Clone)]
enum RetryableFailure {
    Timeout,
    Request(String),
    ServerStatus(u16),
}

impl RetryableFailure {
    fn into_outcome(self, identifier: &str) -> Outcome {
        match self {
            Self::Timeout => Outcome::error(identifier, FailureClass::Transient, None, "Timeout"),
            Self::Request(detail) => Outcome::error(
                identifier,
                FailureClass::Transient,
                None,
                format!("Request error: {detail}"),
            ),
            Self::ServerStatus(status) => Outcome::error(
                identifier,
                FailureClass::UnexpectedStatus,
                Some(status),
                format!("HTTP {status}"),
            ),
        }
    }
}

impl fmt::Display for RetryableFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Request(detail) => write!(f, "request error: {detail}"),
            Self::ServerStatus(status) => write!(f, "HTTP {status}"),
        }
    }
}

enum Attempt {
    Done(Outcome),
    Retry(RetryableFailure),
}

/// Checks whether the object for an identifier exists in the remote store
#[derive(Clone)]
pub struct ExistenceProber<T> {
    transport: T,
    resolver: ObjectUrlResolver,
    policy: RetryPolicy,
    events: Option<EventSender>,
}

impl<T: HeadTransport> ExistenceProber<T> {
    #[must_use]
    pub fn new(transport: T, resolver: ObjectUrlResolver, policy: RetryPolicy) -> Self {
        Self {
            transport,
            resolver,
            policy,
            events: None,
        }
    }

    /// Report retries on an event channel
    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    #[must_use]
    pub fn resolver(&self) -> &ObjectUrlResolver {
        &self.resolver
    }

    /// Probe one identifier
    pub async fn probe(&self, identifier: &str) -> Outcome {
        self.probe_with_attempts(identifier).await.outcome
    }

    /// Probe one identifier and report how many attempts were made
    pub async fn probe_with_attempts(&self, identifier: &str) -> ProbeReport {
        let Some(trimmed) = normalize_identifier(identifier) else {
            return ProbeReport {
                outcome: Outcome::invalid(identifier),
                attempts: 0,
            };
        };

        let url = self.resolver.resolve(trimmed);
        let mut attempts = 0;
        let mut last_failure = None;

        while attempts < self.policy.max_attempts {
            attempts += 1;
            match self.attempt(trimmed, &url).await {
                Attempt::Done(outcome) => return ProbeReport { outcome, attempts },
                Attempt::Retry(failure) => {
                    if self.policy.allows_retry_after(attempts) {
                        debug!(
                            identifier = trimmed,
                            attempt = attempts,
                            reason = %failure,
                            "retrying probe"
                        );
                        self.events.emit_verify(VerifyEvent::ProbeRetrying {
                            identifier: trimmed.to_string(),
                            attempt: attempts,
                            max_attempts: self.policy.max_attempts,
                            reason: failure.to_string(),
                        });
                        tokio::time::sleep(self.policy.delay_after(attempts)).await;
                    }
                    last_failure = Some(failure);
                }
            }
        }

        let outcome = match last_failure {
            Some(failure) => failure.into_outcome(trimmed),
            None => Outcome::error(
                trimmed,
                FailureClass::Transient,
                None,
                "Max retries exceeded",
            ),
        };
        ProbeReport { outcome, attempts }
    }

    async fn attempt(&self, identifier: &str, url: &str) -> Attempt {
        let timeout = self.policy.timeout;
        let result = tokio::time::timeout(timeout, self.transport.head(url, timeout))
            .await
            .unwrap_or(Err(TransportFailure::Timeout));

        match result {
            Ok(STATUS_FOUND) => Attempt::Done(Outcome::exists(identifier, STATUS_FOUND)),
            Ok(STATUS_NOT_FOUND) => Attempt::Done(Outcome::missing(identifier, STATUS_NOT_FOUND)),
            Ok(status) if self.policy.is_retryable_status(status) => {
                Attempt::Retry(RetryableFailure::ServerStatus(status))
            }
            Ok(status) => Attempt::Done(Outcome::error(
                identifier,
                FailureClass::UnexpectedStatus,
                Some(status),
                format!("HTTP {status}"),
            )),
            Err(TransportFailure::Timeout) => Attempt::Retry(RetryableFailure::Timeout),
            Err(TransportFailure::Request(detail)) => {
                Attempt::Retry(RetryableFailure::Request(detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docaudit_types::OutcomeKind;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Replays a fixed script of responses, repeating the last one
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        script: Arc<Mutex<VecDeque<Result<u16, TransportFailure>>>>,
        calls: Arc<AtomicU32>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<u16, TransportFailure>>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HeadTransport for ScriptedTransport {
        async fn head(&self, _url: &str, _timeout: Duration) -> Result<u16, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        }
    }

    /// Never answers inside the timeout
    struct HangingTransport {
        calls: AtomicU32,
    }

    #[async_trait]
    impl HeadTransport for HangingTransport {
        async fn head(&self, _url: &str, _timeout: Duration) -> Result<u16, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(200)
        }
    }

    fn prober<T: HeadTransport>(transport: T) -> ExistenceProber<T> {
        let resolver = ObjectUrlResolver::new("https://store.example.net/raw/", ".pdf").unwrap();
        ExistenceProber::new(transport, resolver, RetryPolicy::default())
    }

    #[tokio::test]
    async fn test_found_on_first_attempt() {
        let transport = ScriptedTransport::new(vec![Ok(200)]);
        let report = prober(transport.clone()).probe_with_attempts("HB 1").await;
        assert_eq!(report.outcome.kind(), OutcomeKind::Exists);
        assert_eq!(report.attempts, 1);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_never_retried() {
        let transport = ScriptedTransport::new(vec![Ok(404)]);
        let report = prober(transport.clone()).probe_with_attempts("HB 2").await;
        assert_eq!(report.outcome.kind(), OutcomeKind::Missing);
        assert_eq!(report.outcome.error_message(), Some("Not found"));
        assert_eq!(report.attempts, 1);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_status_is_final() {
        let transport = ScriptedTransport::new(vec![Ok(503), Ok(200)]);
        let report = prober(transport.clone()).probe_with_attempts("HB 3").await;
        assert_eq!(report.outcome.kind(), OutcomeKind::Error);
        assert_eq!(report.outcome.error_message(), Some("HTTP 503"));
        assert_eq!(report.outcome.status_code(), Some(503));
        assert_eq!(report.outcome.failure(), Some(FailureClass::UnexpectedStatus));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_then_found() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportFailure::Request("connection reset".to_string())),
            Ok(200),
        ]);
        let report = prober(transport.clone()).probe_with_attempts("HB 4").await;
        assert_eq!(report.outcome.kind(), OutcomeKind::Exists);
        assert_eq!(report.attempts, 2);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reported_timeout_exhausts_attempts() {
        let transport = ScriptedTransport::new(vec![Err(TransportFailure::Timeout)]);
        let report = prober(transport.clone()).probe_with_attempts("HB 5").await;
        assert_eq!(report.outcome.kind(), OutcomeKind::Error);
        assert_eq!(report.outcome.error_message(), Some("Timeout"));
        assert_eq!(report.outcome.status_code(), None);
        assert_eq!(report.attempts, 2);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_transport_times_out_per_attempt() {
        let transport = Arc::new(HangingTransport {
            calls: AtomicU32::new(0),
        });
        let resolver = ObjectUrlResolver::new("https://store.example.net/raw/", ".pdf").unwrap();
        let policy = RetryPolicy {
            max_attempts: 3,
            ..RetryPolicy::default()
        };
        let prober = ExistenceProber::new(ArcTransport(transport.clone()), resolver, policy);

        let report = prober.probe_with_attempts("HB 6").await;
        assert_eq!(report.outcome.error_message(), Some("Timeout"));
        assert_eq!(report.attempts, 3);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_error_preserves_cause() {
        let transport = ScriptedTransport::new(vec![Err(TransportFailure::Request(
            "dns error".to_string(),
        ))]);
        let outcome = prober(transport).probe("HB 7").await;
        assert_eq!(outcome.error_message(), Some("Request error: dns error"));
        assert_eq!(outcome.failure(), Some(FailureClass::Transient));
    }

    #[tokio::test]
    async fn test_empty_identifier_skips_network() {
        let transport = ScriptedTransport::new(vec![Ok(200)]);
        let report = prober(transport.clone()).probe_with_attempts("   ").await;
        assert_eq!(report.outcome.kind(), OutcomeKind::Error);
        assert_eq!(report.outcome.error_message(), Some("Empty identifier"));
        assert_eq!(report.attempts, 0);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_retried_when_enabled() {
        let transport = ScriptedTransport::new(vec![Ok(502), Ok(200)]);
        let resolver = ObjectUrlResolver::new("https://store.example.net/raw/", ".pdf").unwrap();
        let policy = RetryPolicy {
            retry_server_errors: true,
            ..RetryPolicy::default()
        };
        let report = ExistenceProber::new(transport.clone(), resolver, policy)
            .probe_with_attempts("HB 8")
            .await;
        assert_eq!(report.outcome.kind(), OutcomeKind::Exists);
        assert_eq!(report.attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_exhausted_keep_status() {
        let transport = ScriptedTransport::new(vec![Ok(500)]);
        let resolver = ObjectUrlResolver::new("https://store.example.net/raw/", ".pdf").unwrap();
        let policy = RetryPolicy {
            retry_server_errors: true,
            ..RetryPolicy::default()
        };
        let report = ExistenceProber::new(transport, resolver, policy)
            .probe_with_attempts("HB 9")
            .await;
        assert_eq!(report.outcome.error_message(), Some("HTTP 500"));
        assert_eq!(report.outcome.status_code(), Some(500));
        assert_eq!(report.attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_emits_event() {
        let (tx, mut rx) = docaudit_events::channel();
        let transport = ScriptedTransport::new(vec![Err(TransportFailure::Timeout), Ok(404)]);
        let outcome = prober(transport).with_events(tx).probe("HB 10").await;
        assert_eq!(outcome.kind(), OutcomeKind::Missing);

        let message = rx.try_recv().unwrap();
        assert!(matches!(
            message.event,
            docaudit_events::AppEvent::Verify(VerifyEvent::ProbeRetrying { attempt: 1, .. })
        ));
    }

    struct ArcTransport(Arc<HangingTransport>);

    #[async_trait]
    impl HeadTransport for ArcTransport {
        async fn head(&self, url: &str, timeout: Duration) -> Result<u16, TransportFailure> {
            self.0.head(url, timeout).await
        }
    }
}
