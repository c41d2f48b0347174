//! # Task State Store
//!
//! Durable mapping from account identifier to its ordered task list and
//! per-task completion state, backed by the single SQLite file opened by
//! [`super::connection::DatabaseConnection`].
//!
//! Every mutating operation runs inside one transaction: a task-status
//! update and the derived account-status recomputation commit together or
//! not at all, so the invariant *account status is `completed` iff every
//! task is `completed`* holds after every commit. Concurrent account flows
//! touch distinct rows; writes to the same row are serialized by SQLite's
//! write lock plus the pool's busy timeout.

use crate::error::{DroverError, Result};
use crate::models::{AccountRecord, AccountRow, AccountStatus, TaskList, TaskStatus};
use crate::utils::mask_identifier;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

const SELECT_ACCOUNT: &str = "SELECT id, identifier, proxy, status, tasks, created_at, updated_at \
     FROM accounts WHERE identifier = ?1";

const CREATE_ACCOUNTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS accounts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        identifier TEXT NOT NULL UNIQUE,
        proxy TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        tasks TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )";

const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_accounts_status ON accounts (status)";

/// Aggregate task information for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksInfo {
    pub total: usize,
    pub completed: Vec<String>,
    pub pending: Vec<String>,
}

/// Durable store of accounts and their task plans.
#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema if it does not exist. Idempotent.
    pub async fn create_schema(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_ACCOUNTS_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_STATUS_INDEX).execute(&mut *tx).await?;
        tx.commit().await?;
        info!("✅ account store schema ready");
        Ok(())
    }

    /// Drop and recreate the schema in one scoped transaction.
    pub async fn reset_schema(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS accounts").execute(&mut *tx).await?;
        sqlx::query(CREATE_ACCOUNTS_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_STATUS_INDEX).execute(&mut *tx).await?;
        tx.commit().await?;
        info!("✅ account store cleared and recreated");
        Ok(())
    }

    /// Add a new account with a freshly expanded task plan.
    ///
    /// Tasks are stored `pending` with sequential ordinals; the initial
    /// account status is `pending`. Fails with [`DroverError::AccountExists`]
    /// when the identifier is already present.
    pub async fn add_account(
        &self,
        identifier: &str,
        proxy: Option<&str>,
        task_names: &[String],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if fetch_account(&mut tx, identifier).await?.is_some() {
            return Err(DroverError::AccountExists(mask_identifier(identifier)));
        }

        let tasks = TaskList::from_names(task_names.iter().cloned());
        let now = Utc::now().naive_utc();
        sqlx::query(
            "INSERT INTO accounts (identifier, proxy, status, tasks, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )
        .bind(identifier)
        .bind(proxy)
        .bind(AccountStatus::Pending.as_str())
        .bind(tasks.to_json()?)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(
            account = %mask_identifier(identifier),
            tasks = task_names.len(),
            "account added to store"
        );
        Ok(())
    }

    /// Names of this account's pending tasks, in stored ordinal order.
    pub async fn pending_tasks(&self, identifier: &str) -> Result<Vec<String>> {
        let record = self.require_account(identifier).await?;
        Ok(record.tasks.pending_names())
    }

    /// Names of this account's completed tasks, in stored ordinal order.
    pub async fn completed_tasks(&self, identifier: &str) -> Result<Vec<String>> {
        let record = self.require_account(identifier).await?;
        Ok(record.tasks.completed_names())
    }

    /// Update the named task's status and recompute the derived account
    /// status in the same transaction.
    ///
    /// A missing account is a logged no-op, matching the store contract.
    pub async fn update_task_status(
        &self,
        identifier: &str,
        task_name: &str,
        status: TaskStatus,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let Some(row) = fetch_account(&mut tx, identifier).await? else {
            warn!(account = %mask_identifier(identifier), "account not found, skipping task update");
            return Ok(());
        };

        let mut tasks = TaskList::from_json(&row.tasks)?;
        if !tasks.mark(task_name, status) {
            debug!(
                account = %mask_identifier(identifier),
                task = task_name,
                "task not present in plan, nothing to update"
            );
        }
        let derived = tasks.derived_status();

        sqlx::query("UPDATE accounts SET tasks = ?1, status = ?2, updated_at = ?3 WHERE identifier = ?4")
            .bind(tasks.to_json()?)
            .bind(derived.as_str())
            .bind(Utc::now().naive_utc())
            .bind(identifier)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            account = %mask_identifier(identifier),
            task = task_name,
            status = %status,
            account_status = %derived,
            "task status updated"
        );
        Ok(())
    }

    /// Replace the task list with an empty one and reset the account to
    /// `pending`.
    pub async fn clear_tasks(&self, identifier: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if fetch_account(&mut tx, identifier).await?.is_none() {
            warn!(account = %mask_identifier(identifier), "account not found, nothing to clear");
            return Ok(());
        }

        sqlx::query("UPDATE accounts SET tasks = '[]', status = ?1, updated_at = ?2 WHERE identifier = ?3")
            .bind(AccountStatus::Pending.as_str())
            .bind(Utc::now().naive_utc())
            .bind(identifier)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(account = %mask_identifier(identifier), "cleared all tasks");
        Ok(())
    }

    /// Append task names not already present; the account goes back to
    /// `pending` since new pending work exists.
    pub async fn add_tasks(&self, identifier: &str, new_task_names: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let Some(row) = fetch_account(&mut tx, identifier).await? else {
            warn!(account = %mask_identifier(identifier), "account not found, cannot add tasks");
            return Ok(());
        };

        let mut tasks = TaskList::from_json(&row.tasks)?;
        let added = tasks.append_missing(new_task_names);
        let derived = tasks.derived_status();

        sqlx::query("UPDATE accounts SET tasks = ?1, status = ?2, updated_at = ?3 WHERE identifier = ?4")
            .bind(tasks.to_json()?)
            .bind(derived.as_str())
            .bind(Utc::now().naive_utc())
            .bind(identifier)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            account = %mask_identifier(identifier),
            added,
            "appended new tasks"
        );
        Ok(())
    }

    /// Overwrite the account's egress descriptor.
    pub async fn update_proxy(&self, identifier: &str, proxy: Option<&str>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if fetch_account(&mut tx, identifier).await?.is_none() {
            warn!(account = %mask_identifier(identifier), "account not found, cannot update proxy");
            return Ok(());
        }

        sqlx::query("UPDATE accounts SET proxy = ?1, updated_at = ?2 WHERE identifier = ?3")
            .bind(proxy)
            .bind(Utc::now().naive_utc())
            .bind(identifier)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(account = %mask_identifier(identifier), "proxy updated");
        Ok(())
    }

    /// All accounts whose derived status is `completed`.
    pub async fn list_completed(&self) -> Result<Vec<AccountRecord>> {
        self.list_by_status(AccountStatus::Completed).await
    }

    /// All accounts with pending work remaining.
    pub async fn list_pending(&self) -> Result<Vec<AccountRecord>> {
        self.list_by_status(AccountStatus::Pending).await
    }

    /// The account's overall status, or `None` when it is not in the store.
    pub async fn account_status(&self, identifier: &str) -> Result<Option<AccountStatus>> {
        let row = sqlx::query_as::<_, AccountRow>(SELECT_ACCOUNT)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| AccountStatus::parse(&r.status)).transpose()
    }

    /// Fetch one account, failing when it is absent.
    pub async fn get_account(&self, identifier: &str) -> Result<AccountRecord> {
        self.require_account(identifier).await
    }

    /// Count of accounts with every task completed.
    pub async fn completed_count(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE status = 'completed'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Total number of accounts in the store.
    pub async fn total_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Aggregate task information for one account.
    pub async fn tasks_info(&self, identifier: &str) -> Result<TasksInfo> {
        let record = self.require_account(identifier).await?;
        Ok(TasksInfo {
            total: record.tasks.len(),
            completed: record.tasks.completed_names(),
            pending: record.tasks.pending_names(),
        })
    }

    async fn list_by_status(&self, status: AccountStatus) -> Result<Vec<AccountRecord>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, identifier, proxy, status, tasks, created_at, updated_at \
             FROM accounts WHERE status = ?1 ORDER BY id",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountRecord::try_from).collect()
    }

    async fn require_account(&self, identifier: &str) -> Result<AccountRecord> {
        let row = sqlx::query_as::<_, AccountRow>(SELECT_ACCOUNT)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => AccountRecord::try_from(row),
            None => Err(DroverError::AccountNotFound(mask_identifier(identifier))),
        }
    }
}

async fn fetch_account(
    conn: &mut SqliteConnection,
    identifier: &str,
) -> Result<Option<AccountRow>> {
    let row = sqlx::query_as::<_, AccountRow>(SELECT_ACCOUNT)
        .bind(identifier)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}
