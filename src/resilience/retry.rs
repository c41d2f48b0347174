//! # Retry Executor
//!
//! Generic wrapper that runs a unit of work under a bounded-attempts,
//! randomized-backoff policy. Transient-failure tolerance (rate limits,
//! flaky endpoints, momentary RPC unavailability) lives here so that
//! callers never implement their own sleep/retry loops.
//!
//! Outcomes are a closed tagged type instead of shape-sniffing: every task
//! implementation returns [`TaskOutcome`], and anything else retryable
//! (session acquisition, multi-step operations) participates through the
//! [`RetryOutcome`] trait.

use crate::utils::random_pause;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::info;

/// Result of one unit of work against an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskOutcome {
    /// The work succeeded, optionally carrying a payload for the caller.
    Success(Option<serde_json::Value>),
    /// The work failed with a reason suitable for logs and reports.
    Failure { reason: String },
}

impl TaskOutcome {
    pub fn success() -> Self {
        TaskOutcome::Success(None)
    }

    pub fn success_with(payload: serde_json::Value) -> Self {
        TaskOutcome::Success(Some(payload))
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        TaskOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success(_))
    }
}

/// Anything the retry executor can judge as success or failure.
pub trait RetryOutcome {
    fn is_retry_success(&self) -> bool;
}

impl RetryOutcome for TaskOutcome {
    fn is_retry_success(&self) -> bool {
        self.is_success()
    }
}

impl RetryOutcome for bool {
    fn is_retry_success(&self) -> bool {
        *self
    }
}

impl<T, E> RetryOutcome for Result<T, E> {
    fn is_retry_success(&self) -> bool {
        self.is_ok()
    }
}

/// Bounded-attempts, randomized-backoff policy.
///
/// `backoff_secs` is an inclusive `[min, max]` range; a uniformly random
/// pause is drawn before each retry. No pause follows the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_secs: (u64, u64),
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_secs: (u64, u64)) -> Self {
        Self {
            max_attempts,
            backoff_secs,
        }
    }

    /// One attempt, no backoff. The configured default for most call sites,
    /// trading resilience for speed.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            backoff_secs: (0, 0),
        }
    }
}

/// Run `operation` under the policy, returning the last outcome once it
/// either succeeds or attempts are exhausted.
///
/// With `max_attempts == 1` the first outcome is returned unconditionally
/// and no backoff sleep ever happens.
pub async fn run_with_retry<O, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> O
where
    O: RetryOutcome,
    F: FnMut() -> Fut,
    Fut: Future<Output = O>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let outcome = operation().await;
        if outcome.is_retry_success() || attempt >= max_attempts {
            return outcome;
        }

        let pause = random_pause(policy.backoff_secs);
        info!(
            operation = label,
            attempt,
            max_attempts,
            pause_secs = pause.as_secs(),
            "attempt failed, sleeping before retry"
        );
        tokio::time::sleep(pause).await;
        attempt += 1;
    }
}
