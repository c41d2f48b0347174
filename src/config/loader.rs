//! Configuration loading.
//!
//! Reads the YAML configuration file, deserializes it into [`DroverConfig`]
//! and validates it before anything else starts. The path defaults to
//! `config.yaml` and can be overridden with the `DROVER_CONFIG` environment
//! variable or an explicit argument.

use super::DroverConfig;
use crate::error::{DroverError, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_PATH_ENV: &str = "DROVER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Load configuration from the default location (or `DROVER_CONFIG`).
pub fn load_config() -> Result<DroverConfig> {
    let path = env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    load_config_from_path(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_config_from_path(path: &Path) -> Result<DroverConfig> {
    debug!(path = %path.display(), "loading configuration");

    let contents = std::fs::read_to_string(path).map_err(|e| {
        DroverError::Config(format!("cannot read {}: {e}", path.display()))
    })?;

    let config: DroverConfig = serde_yaml::from_str(&contents).map_err(|e| {
        DroverError::Config(format!("cannot parse {}: {e}", path.display()))
    })?;

    config.validate()?;

    info!(
        concurrency = config.settings.concurrency,
        attempts = config.settings.attempts,
        task_entries = config.flow.tasks.len(),
        database = %config.database.path.display(),
        "configuration loaded"
    );

    Ok(config)
}
