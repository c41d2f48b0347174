//! # Orchestration
//!
//! Turns a credential list and a configuration into a bounded-concurrency
//! run over account flows:
//!
//! - **RunSelection / select_accounts**: which accounts, in what order
//! - **AccountFlowRunner**: one account through its plan, failures contained
//! - **Orchestrator**: the concurrency gate, progress and the final report

pub mod orchestrator;
pub mod runner;
pub mod selection;
pub mod types;

pub use orchestrator::{Orchestrator, RunReport};
pub use runner::AccountFlowRunner;
pub use selection::{select_accounts, RunSelection};
pub use types::{
    AccountContext, AccountSeed, AccountSession, FlowSummary, NoopSession, NoopSessionProvider,
    SessionProvider,
};
