//! # Account Flow Runner
//!
//! Drives one account through its task plan:
//! initializing → planning → executing → reporting → done, with failure
//! reachable from any state. Every failure is caught at the account
//! boundary, logged with the masked account identifier and counted exactly
//! once in the progress tracker - nothing propagates to sibling accounts.

use super::types::{AccountContext, AccountSeed, AccountSession, FlowSummary, SessionProvider};
use crate::config::{DroverConfig, FailurePolicy};
use crate::database::TaskStore;
use crate::error::{DroverError, Result};
use crate::models::TaskStatus;
use crate::notify::{format_account_report, format_fatal_report, Notifier};
use crate::progress::ProgressTracker;
use crate::registry::TaskRegistry;
use crate::resilience::{run_with_retry, TaskOutcome};
use crate::utils::sleep_range;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A task literally named this is marked completed without dispatching.
const SKIP_TASK: &str = "skip";

pub struct AccountFlowRunner {
    seed: AccountSeed,
    config: Arc<DroverConfig>,
    store: TaskStore,
    registry: Arc<TaskRegistry>,
    provider: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
    tracker: Arc<ProgressTracker>,
}

impl AccountFlowRunner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seed: AccountSeed,
        config: Arc<DroverConfig>,
        store: TaskStore,
        registry: Arc<TaskRegistry>,
        provider: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
        tracker: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            seed,
            config,
            store,
            registry,
            provider,
            notifier,
            tracker,
        }
    }

    /// Run the whole flow for this account. Never returns an error: every
    /// outcome is absorbed here so one account cannot affect its siblings.
    pub async fn run(self) {
        let index = self.seed.index;
        let masked = self.seed.masked();

        match self.flow().await {
            Ok(summary) if summary.succeeded() => {
                info!(
                    account_index = index,
                    account = %masked,
                    completed = summary.completed.len(),
                    "account flow finished"
                );
            }
            Ok(summary) => {
                warn!(
                    account_index = index,
                    account = %masked,
                    completed = summary.completed.len(),
                    failed = summary.failed.len(),
                    "account flow finished with failed tasks"
                );
            }
            Err(e) => {
                error!(account_index = index, account = %masked, error = %e, "account flow failed");
                let report = format_fatal_report(index, &masked, &e.to_string());
                if let Err(notify_err) = self.notifier.send(&report).await {
                    warn!(account_index = index, error = %notify_err, "fatal-report delivery failed");
                }
            }
        }

        // Inter-account pacing runs before this slot's completion is signaled.
        sleep_range(self.config.settings.pause_between_accounts).await;
        self.tracker.increment(1);
    }

    /// Initializing through reporting. The session acquired here is released
    /// on every exit path before the result is returned.
    async fn flow(&self) -> Result<FlowSummary> {
        let index = self.seed.index;
        info!(account_index = index, account = %self.seed.masked(), "initializing account session");

        let policy = self.config.task_retry_policy();
        let provider = self.provider.as_ref();
        let seed = &self.seed;
        let session = run_with_retry(&policy, "initialize", move || provider.acquire(seed))
            .await
            .map_err(|e| DroverError::Session(format!("failed to initialize: {e}")))?;

        let result = self.execute_plan(session.clone()).await;

        match session.close().await {
            Ok(()) => info!(account_index = index, "all sessions closed"),
            Err(e) => error!(account_index = index, error = %e, "error during session cleanup"),
        }

        result
    }

    async fn execute_plan(&self, session: Arc<dyn AccountSession>) -> Result<FlowSummary> {
        let index = self.seed.index;

        // Planning
        let pending = match self.store.pending_tasks(&self.seed.identifier).await {
            Ok(pending) => pending,
            Err(DroverError::SchemaMissing) => {
                error!(
                    account_index = index,
                    "account store not created - run provisioning before starting"
                );
                return Err(DroverError::SchemaMissing);
            }
            Err(e) => {
                error!(account_index = index, error = %e, "error reading tasks from the store");
                return Err(e);
            }
        };

        if pending.is_empty() {
            warn!(
                account_index = index,
                "no pending tasks found for this account, nothing to do"
            );
            return Ok(FlowSummary::empty(index, self.seed.identifier.clone()));
        }

        sleep_range(self.config.settings.initial_pause).await;

        let plan_line = pending
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}. {}", i + 1, name))
            .collect::<Vec<_>>()
            .join(" | ");
        info!(account_index = index, "task execution plan: {plan_line}");

        let ctx = AccountContext::new(&self.seed, session);
        let policy = self.config.task_retry_policy();
        let mut summary = FlowSummary {
            account_index: index,
            identifier: self.seed.identifier.clone(),
            completed: Vec::new(),
            failed: Vec::new(),
            total_planned: pending.len(),
        };

        // Executing, in stored ordinal order
        for task_name in &pending {
            if task_name == SKIP_TASK {
                info!(account_index = index, task = %task_name, "skipping task");
                self.store
                    .update_task_status(&self.seed.identifier, task_name, TaskStatus::Completed)
                    .await?;
                summary.completed.push(task_name.clone());
                sleep_range(self.config.settings.pause_between_tasks).await;
                continue;
            }

            info!(account_index = index, task = %task_name, "executing task");
            let outcome = match self.registry.resolve(task_name) {
                Some(handler) => {
                    let handler_ref = &handler;
                    let ctx_ref = &ctx;
                    run_with_retry(&policy, task_name, move || handler_ref.run(ctx_ref)).await
                }
                None => {
                    error!(account_index = index, task = %task_name, "unknown task");
                    TaskOutcome::failure("unknown task name")
                }
            };

            match outcome {
                TaskOutcome::Success(_) => {
                    self.store
                        .update_task_status(&self.seed.identifier, task_name, TaskStatus::Completed)
                        .await?;
                    summary.completed.push(task_name.clone());
                    sleep_range(self.config.settings.pause_between_tasks).await;
                }
                TaskOutcome::Failure { reason } => {
                    summary.failed.push(task_name.clone());
                    match self.config.flow.failure_policy {
                        FailurePolicy::Strict => {
                            error!(
                                account_index = index,
                                task = %task_name,
                                reason = %reason,
                                "task failed, stopping account execution"
                            );
                            break;
                        }
                        FailurePolicy::Lenient => {
                            warn!(
                                account_index = index,
                                task = %task_name,
                                reason = %reason,
                                "task failed, skipping to next task"
                            );
                            sleep_range(self.config.settings.pause_between_tasks).await;
                        }
                    }
                }
            }
        }

        // Reporting - exactly once per account, strict or lenient alike.
        let report = format_account_report(&summary, self.config.flow.failure_policy);
        if let Err(e) = self.notifier.send(&report).await {
            warn!(account_index = index, error = %e, "report delivery failed");
        }

        Ok(summary)
    }
}
