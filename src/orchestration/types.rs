//! Shared orchestration types: account seeds and contexts, session
//! lifecycle traits and the per-account flow summary.

use crate::error::Result;
use crate::utils::mask_identifier;
use async_trait::async_trait;
use std::sync::Arc;

/// What the orchestrator knows about an account before initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSeed {
    /// 1-based account number, stable across runs
    pub index: usize,
    /// Secret credential acting as the stable identifier; logged masked only
    pub identifier: String,
    /// Optional network-egress descriptor
    pub proxy: Option<String>,
}

impl AccountSeed {
    pub fn new(index: usize, identifier: impl Into<String>, proxy: Option<String>) -> Self {
        Self {
            index,
            identifier: identifier.into(),
            proxy,
        }
    }

    pub fn masked(&self) -> String {
        mask_identifier(&self.identifier)
    }
}

/// Per-account network/session resources acquired from the provider.
///
/// Sessions are exclusively owned by one account flow and never shared;
/// the runner releases them on every exit path.
#[async_trait]
pub trait AccountSession: Send + Sync {
    /// Release the underlying resources. Called exactly once by the runner.
    async fn close(&self) -> Result<()>;
}

/// External collaborator that acquires per-account resources.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self, seed: &AccountSeed) -> Result<Arc<dyn AccountSession>>;
}

/// Session with nothing to hold or release, for task sets that manage their
/// own connections per call.
pub struct NoopSession;

#[async_trait]
impl AccountSession for NoopSession {
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Provider of [`NoopSession`]s.
#[derive(Default)]
pub struct NoopSessionProvider;

#[async_trait]
impl SessionProvider for NoopSessionProvider {
    async fn acquire(&self, _seed: &AccountSeed) -> Result<Arc<dyn AccountSession>> {
        Ok(Arc::new(NoopSession))
    }
}

/// Everything a task implementation gets to work with.
#[derive(Clone)]
pub struct AccountContext {
    pub index: usize,
    pub identifier: String,
    pub proxy: Option<String>,
    pub session: Arc<dyn AccountSession>,
}

impl AccountContext {
    pub fn new(seed: &AccountSeed, session: Arc<dyn AccountSession>) -> Self {
        Self {
            index: seed.index,
            identifier: seed.identifier.clone(),
            proxy: seed.proxy.clone(),
            session,
        }
    }

    /// Context without real resources behind it. Intended for tests and
    /// handlers that need no session.
    pub fn bare(index: usize, identifier: impl Into<String>) -> Self {
        Self {
            index,
            identifier: identifier.into(),
            proxy: None,
            session: Arc::new(NoopSession),
        }
    }

    pub fn masked(&self) -> String {
        mask_identifier(&self.identifier)
    }
}

/// End-of-run summary for one account, composed exactly once per flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSummary {
    pub account_index: usize,
    pub identifier: String,
    pub completed: Vec<String>,
    pub failed: Vec<String>,
    pub total_planned: usize,
}

impl FlowSummary {
    pub fn empty(account_index: usize, identifier: impl Into<String>) -> Self {
        Self {
            account_index,
            identifier: identifier.into(),
            completed: Vec::new(),
            failed: Vec::new(),
            total_planned: 0,
        }
    }

    /// The run converged with no task left failed.
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_planned == 0 {
            100.0
        } else {
            (self.completed.len() as f64 / self.total_planned as f64) * 100.0
        }
    }

    pub fn masked(&self) -> String {
        mask_identifier(&self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_success_follows_failed_list() {
        let mut summary = FlowSummary::empty(3, "0x1234567890ab");
        summary.total_planned = 2;
        summary.completed.push("faucet".to_string());
        assert!(summary.succeeded());
        assert_eq!(summary.success_rate(), 50.0);

        summary.failed.push("mint".to_string());
        assert!(!summary.succeeded());
    }

    #[test]
    fn empty_summary_counts_as_fully_converged() {
        let summary = FlowSummary::empty(1, "0x1234567890ab");
        assert!(summary.succeeded());
        assert_eq!(summary.success_rate(), 100.0);
    }

    #[tokio::test]
    async fn noop_provider_hands_out_closable_sessions() {
        let provider = NoopSessionProvider;
        let seed = AccountSeed::new(1, "0xdeadbeefcafef00d", None);
        let session = provider.acquire(&seed).await.unwrap();
        session.close().await.unwrap();
    }
}
