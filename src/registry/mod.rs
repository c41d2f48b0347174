//! # Task Implementation Registry
//!
//! Maps task names (case-insensitive) to the async operations that execute
//! them against an account. The orchestrator only ever sees the uniform
//! contract "run named task for account X, return an outcome"; the
//! implementations themselves (HTTP calls, on-chain transactions, social
//! actions) are external collaborators registered here at startup.
//!
//! Unknown task names resolve to `None`, which the account flow runner
//! reports as a failure for that task only - never fatal to the account or
//! the orchestrator.

use crate::orchestration::types::AccountContext;
use crate::resilience::TaskOutcome;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// One named task implementation.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Execute the task against the given account.
    async fn run(&self, ctx: &AccountContext) -> TaskOutcome;
}

/// Case-insensitive registry of task implementations.
#[derive(Default)]
pub struct TaskRegistry {
    handlers: DashMap<String, Arc<dyn TaskHandler>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Register a handler under a name. Re-registering a name replaces the
    /// previous handler; the latest registration wins.
    pub fn register(&self, name: &str, handler: Arc<dyn TaskHandler>) {
        debug!(task = name, "task handler registered");
        self.handlers.insert(name.to_lowercase(), handler);
    }

    /// Resolve a handler by name, ignoring case.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn TaskHandler>> {
        self.handlers
            .get(&name.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    /// Names of every registered handler.
    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysOk;

    #[async_trait]
    impl TaskHandler for AlwaysOk {
        async fn run(&self, _ctx: &AccountContext) -> TaskOutcome {
            TaskOutcome::success()
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl TaskHandler for AlwaysFails {
        async fn run(&self, _ctx: &AccountContext) -> TaskOutcome {
            TaskOutcome::failure("nope")
        }
    }

    #[test]
    fn resolution_is_case_insensitive() {
        let registry = TaskRegistry::new();
        registry.register("Faucet", Arc::new(AlwaysOk));

        assert!(registry.resolve("faucet").is_some());
        assert!(registry.resolve("FAUCET").is_some());
        assert!(registry.resolve("mint").is_none());
    }

    #[test]
    fn latest_registration_wins() {
        let registry = TaskRegistry::new();
        registry.register("faucet", Arc::new(AlwaysFails));
        registry.register("faucet", Arc::new(AlwaysOk));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn resolved_handlers_execute() {
        let registry = TaskRegistry::new();
        registry.register("faucet", Arc::new(AlwaysOk));

        let ctx = AccountContext::bare(1, "0xdeadbeefcafef00d");
        let handler = registry.resolve("faucet").unwrap();
        assert!(handler.run(&ctx).await.is_success());
    }
}
