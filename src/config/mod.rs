//! # Drover Configuration
//!
//! Typed configuration for the orchestrator, loaded from a YAML file and
//! validated up front. There is no process-wide singleton: the loaded
//! [`DroverConfig`] value is constructed once at startup and passed by
//! reference into the orchestrator and every account flow runner.

pub mod loader;

use crate::plan::PlanEntry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use loader::load_config;

/// Root configuration structure mirroring the YAML layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DroverConfig {
    /// Concurrency, retry, pacing and account-selection knobs
    pub settings: SettingsConfig,

    /// Declarative task specification and failure policy
    pub flow: FlowConfig,

    /// Notification sink settings
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Durable store location and pool sizing
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Concurrency, retry and pacing settings.
///
/// All pause fields are inclusive `[min, max]` second ranges; a uniformly
/// random value is drawn per use.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingsConfig {
    /// Maximum number of accounts processed concurrently
    pub concurrency: usize,

    /// Attempts per unit of work in the retry executor
    pub attempts: u32,

    /// Backoff slept between failed attempts
    pub pause_between_attempts: (u64, u64),

    /// Pacing between consecutive tasks within one account
    pub pause_between_tasks: (u64, u64),

    /// Pacing after each account finishes, before its slot is released
    pub pause_between_accounts: (u64, u64),

    /// Initial jitter before an account starts executing its plan
    pub initial_pause: (u64, u64),

    /// 1-based inclusive account range; `[0, 0]` defers to `exact_accounts`
    #[serde(default)]
    pub accounts_range: (usize, usize),

    /// Explicit 1-based account numbers; empty means "all"
    #[serde(default)]
    pub exact_accounts: Vec<usize>,

    /// Shuffle execution order of the selected accounts
    #[serde(default)]
    pub shuffle_accounts: bool,
}

/// Failure policy applied when a task exhausts its retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the remaining plan for this account
    Strict,
    /// Record the failure and continue with the next task
    Lenient,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Strict
    }
}

/// Declarative task specification and the per-account failure policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowConfig {
    /// Entries expanded into one concrete ordered task list per account
    pub tasks: Vec<PlanEntry>,

    /// Strict aborts an account's plan on first failure, lenient skips on
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Notification sink settings. Disabled by default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Bot token for the Telegram sink
    #[serde(default)]
    pub bot_token: String,

    /// Recipient chat ids
    #[serde(default)]
    pub chat_ids: Vec<i64>,
}

/// Durable store location and pool sizing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite store file
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds a writer waits on a locked database before failing
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/accounts.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

impl DroverConfig {
    /// Validate the loaded configuration before any account is touched.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::DroverError;

        if self.settings.concurrency == 0 {
            return Err(DroverError::Config(
                "settings.concurrency must be at least 1".to_string(),
            ));
        }
        if self.settings.attempts == 0 {
            return Err(DroverError::Config(
                "settings.attempts must be at least 1".to_string(),
            ));
        }
        for (label, range) in [
            ("pause_between_attempts", self.settings.pause_between_attempts),
            ("pause_between_tasks", self.settings.pause_between_tasks),
            ("pause_between_accounts", self.settings.pause_between_accounts),
            ("initial_pause", self.settings.initial_pause),
        ] {
            if range.0 > range.1 {
                return Err(DroverError::Config(format!(
                    "settings.{label}: min {} exceeds max {}",
                    range.0, range.1
                )));
            }
        }
        let (start, end) = self.settings.accounts_range;
        if start > end {
            return Err(DroverError::Config(format!(
                "settings.accounts_range: start {start} exceeds end {end}"
            )));
        }
        if self.settings.exact_accounts.iter().any(|&n| n == 0) {
            return Err(DroverError::Config(
                "settings.exact_accounts uses 1-based account numbers".to_string(),
            ));
        }
        if self.flow.tasks.is_empty() {
            return Err(DroverError::Config(
                "flow.tasks must declare at least one entry".to_string(),
            ));
        }
        if self.notifications.enabled {
            if self.notifications.bot_token.is_empty() {
                return Err(DroverError::Config(
                    "notifications.bot_token is required when notifications are enabled"
                        .to_string(),
                ));
            }
            if self.notifications.chat_ids.is_empty() {
                return Err(DroverError::Config(
                    "notifications.chat_ids is required when notifications are enabled"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Retry policy for task execution, driven by configuration.
    pub fn task_retry_policy(&self) -> crate::resilience::RetryPolicy {
        crate::resilience::RetryPolicy {
            max_attempts: self.settings.attempts,
            backoff_secs: self.settings.pause_between_attempts,
        }
    }
}
