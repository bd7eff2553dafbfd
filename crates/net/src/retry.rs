//! Retry policy and backoff calculation for existence probes

use docaudit_config::VerifyConfig;
use std::time::Duration;

/// How a probe retries transient failures
///
/// Only timeouts and transport failures are retried. Completed responses are
/// final unless `retry_server_errors` opts 5xx statuses in.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Pause after the first failed attempt
    pub initial_delay: Duration,
    /// Upper bound for any single pause
    pub max_delay: Duration,
    /// Growth factor per attempt; 1.0 keeps the pause fixed
    pub backoff_multiplier: f64,
    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
    pub retry_server_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            timeout: Duration::from_secs(5),
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 1.0,
            jitter_factor: 0.0,
            retry_server_errors: false,
        }
    }
}

impl From<&VerifyConfig> for RetryPolicy {
    fn from(config: &VerifyConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            timeout: config.timeout(),
            initial_delay: config.retry_delay(),
            backoff_multiplier: config.backoff_multiplier,
            jitter_factor: config.jitter_factor,
            retry_server_errors: config.retry_server_errors,
            ..Self::default()
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `attempt` (1-based) failed
    #[must_use]
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Whether a completed response with `status` counts as transient
    #[must_use]
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_server_errors && (500..600).contains(&status)
    }

    /// Pause to take after `attempt` (1-based) failed
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        calculate_backoff_delay(self, attempt)
    }
}

/// Calculate exponential backoff delay with jitter
pub(crate) fn calculate_backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let base_delay = {
        // Precision loss acceptable for backoff calculations
        #[allow(clippy::cast_precision_loss)]
        {
            policy.initial_delay.as_millis().min(u128::from(u64::MAX)) as f64
        }
    };
    let max_delay = {
        #[allow(clippy::cast_precision_loss)]
        {
            policy.max_delay.as_millis().min(u128::from(u64::MAX)) as f64
        }
    };

    let exponent = {
        // Attempt counts are small, so this cast is safe
        #[allow(clippy::cast_possible_wrap)]
        {
            attempt.saturating_sub(1) as i32
        }
    };
    let delay = (base_delay * policy.backoff_multiplier.powi(exponent)).min(max_delay);

    let jitter = if policy.jitter_factor > 0.0 {
        delay * policy.jitter_factor * (rand::random::<f64>() - 0.5)
    } else {
        0.0
    };
    let final_delay = {
        // Safe cast: max(0.0) ensures non-negative, round() handles fractional part
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (delay + jitter).max(0.0).round() as u64
        }
    };

    Duration::from_millis(final_delay)
}
