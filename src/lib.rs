//! # Drover Core
//!
//! Concurrent multi-account task orchestration with durable per-account
//! progress.
//!
//! ## Overview
//!
//! Drover expands a declarative task specification into one concrete
//! ordered task list per account, persists each account's list and
//! per-task completion state in a single SQLite file, runs a bounded
//! number of accounts concurrently - each executing its plan sequentially
//! under a generic retry policy - and aggregates live progress across all
//! running flows. Runs are resumable: completed tasks stay completed, and
//! a later run picks up only what is still pending.
//!
//! Individual task implementations (HTTP calls, on-chain transactions,
//! social-account actions) are external collaborators registered in the
//! [`registry::TaskRegistry`] behind one uniform contract: run the named
//! task for an account, return a [`resilience::TaskOutcome`].
//!
//! ## Module Organization
//!
//! - [`config`] - typed YAML configuration, passed by value (no singleton)
//! - [`plan`] - declarative task specification and plan expansion
//! - [`models`] - account and task records with derived-status logic
//! - [`database`] - the durable task state store and provisioning flows
//! - [`resilience`] - the bounded-attempts retry executor
//! - [`progress`] - the shared progress tracker
//! - [`registry`] - task implementation registry
//! - [`notify`] - notification sink (Telegram or null)
//! - [`orchestration`] - account selection, flow runner and orchestrator
//! - [`error`] - structured error handling
//!
//! ## Failure isolation
//!
//! Every task- and account-level failure is caught at the account boundary,
//! logged with a masked identifier, reported once and counted once. Only a
//! store that cannot be opened at all aborts the whole run.

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod orchestration;
pub mod plan;
pub mod progress;
pub mod registry;
pub mod resilience;
pub mod utils;

pub use config::{load_config, DroverConfig, FailurePolicy};
pub use database::{DatabaseConnection, TaskStore};
pub use error::{DroverError, Result};
pub use models::{AccountRecord, AccountStatus, TaskItem, TaskList, TaskStatus};
pub use notify::{notifier_from_config, Notifier, NullNotifier, TelegramNotifier};
pub use orchestration::{
    select_accounts, AccountContext, AccountSeed, AccountSession, FlowSummary, Orchestrator,
    RunReport, RunSelection, SessionProvider,
};
pub use plan::{PlanEntry, TaskPlan};
pub use progress::ProgressTracker;
pub use registry::{TaskHandler, TaskRegistry};
pub use resilience::{run_with_retry, RetryPolicy, TaskOutcome};
