//! # Structured Logging
//!
//! One-shot tracing initialization for the orchestrator and its tests.
//! Honors `RUST_LOG` when set, defaulting to `info` otherwise.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize the global tracing subscriber exactly once.
///
/// Safe to call from multiple entry points (library consumers, tests);
/// later calls are no-ops, and an already-installed subscriber from the
/// embedding application is left alone.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_err()
        {
            tracing::debug!("global tracing subscriber already installed, reusing it");
        }
    });
}
