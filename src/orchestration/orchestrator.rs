//! # Concurrency Orchestrator
//!
//! Launches one account flow runner per selected account behind a bounded
//! concurrency gate and waits for every runner to finish. A slow account
//! only occupies its own slot; the gate keeps admitting other accounts up
//! to the limit. The progress tracker is initialized with the selected
//! total before the first launch so percentages are meaningful from the
//! first completion.

use super::runner::AccountFlowRunner;
use super::selection::{select_accounts, RunSelection};
use super::types::{AccountSeed, SessionProvider};
use crate::config::DroverConfig;
use crate::database::TaskStore;
use crate::error::Result;
use crate::notify::Notifier;
use crate::progress::ProgressTracker;
use crate::registry::TaskRegistry;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};
use uuid::Uuid;

/// Aggregate result of one orchestrator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Accounts processed in this invocation
    pub processed: usize,
    /// Accounts in the store with every task completed, after the run
    pub completed_accounts: i64,
    /// Total accounts in the store
    pub total_accounts: i64,
}

pub struct Orchestrator {
    config: Arc<DroverConfig>,
    store: TaskStore,
    registry: Arc<TaskRegistry>,
    provider: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
}

impl Orchestrator {
    pub fn new(
        config: DroverConfig,
        store: TaskStore,
        registry: TaskRegistry,
        provider: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            registry: Arc::new(registry),
            provider,
            notifier,
        }
    }

    /// Resolve the configured run selection against the credential list and
    /// process the selected accounts.
    pub async fn run_from_credentials(
        &self,
        credentials: &[String],
        proxies: &[String],
    ) -> Result<RunReport> {
        let selection = RunSelection::from_settings(&self.config.settings);
        let seeds = select_accounts(credentials, proxies, &selection)?;
        self.run(seeds).await
    }

    /// Process the given accounts, at most `settings.concurrency` at a time,
    /// returning once every launched flow has finished.
    pub async fn run(&self, seeds: Vec<AccountSeed>) -> Result<RunReport> {
        let run_id = Uuid::new_v4();

        if seeds.is_empty() {
            info!(%run_id, "no accounts selected, nothing to run");
            return self.report(run_id, 0).await;
        }

        let total = seeds.len();
        let concurrency = self.config.settings.concurrency.max(1);
        info!(
            %run_id,
            accounts = total,
            concurrency,
            "starting orchestrator run"
        );

        let tracker = Arc::new(ProgressTracker::new(total as u64, "Accounts completed"));
        let gate = Arc::new(Semaphore::new(concurrency));

        let mut handles = Vec::with_capacity(total);
        for seed in seeds {
            let gate = gate.clone();
            let runner = AccountFlowRunner::new(
                seed,
                self.config.clone(),
                self.store.clone(),
                self.registry.clone(),
                self.provider.clone(),
                self.notifier.clone(),
                tracker.clone(),
            );
            handles.push(tokio::spawn(async move {
                // Closed only on shutdown; a closed gate means nothing left to run.
                let Ok(_permit) = gate.acquire_owned().await else {
                    return;
                };
                runner.run().await;
            }));
        }

        for join_result in join_all(handles).await {
            if let Err(e) = join_result {
                error!(%run_id, error = %e, "account flow task aborted");
            }
        }

        info!(
            %run_id,
            completed = tracker.current(),
            "orchestrator run finished"
        );
        self.report(run_id, total).await
    }

    async fn report(&self, run_id: Uuid, processed: usize) -> Result<RunReport> {
        let (completed_accounts, total_accounts) = match (
            self.store.completed_count().await,
            self.store.total_count().await,
        ) {
            (Ok(completed), Ok(total)) => (completed, total),
            // Store-level counting is informational; a missing schema was
            // already surfaced per account.
            _ => (0, 0),
        };

        Ok(RunReport {
            run_id,
            processed,
            completed_accounts,
            total_accounts,
        })
    }
}
