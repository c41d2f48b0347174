//! Transient-failure tolerance: the bounded-attempts retry executor.

pub mod retry;

pub use retry::{run_with_retry, RetryOutcome, RetryPolicy, TaskOutcome};
