//! SQLite pool construction for the single-file account store.
//!
//! Failing to open the store here is the one error that is allowed to abort
//! the whole run: no account can make progress without it.

use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Open (creating if missing) the store file described by the config.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        Self::open(&config.path, config.max_connections, config.busy_timeout_secs).await
    }

    /// Open a store at an explicit path.
    ///
    /// WAL mode plus a busy timeout lets concurrent account flows commit
    /// their transactions against the shared file without corrupting state.
    pub async fn open(
        path: &Path,
        max_connections: u32,
        busy_timeout_secs: u64,
    ) -> Result<Self, sqlx::Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    sqlx::Error::Io(std::io::Error::new(
                        e.kind(),
                        format!("cannot create store directory {}: {e}", parent.display()),
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(busy_timeout_secs))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        debug!(path = %path.display(), max_connections, "account store opened");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 as health").fetch_one(&self.pool).await?;
        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
