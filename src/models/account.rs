//! # Account Model
//!
//! One [`AccountRecord`] per managed identity. Maps to the `accounts` table:
//!
//! ```sql
//! CREATE TABLE accounts (
//!   id INTEGER PRIMARY KEY AUTOINCREMENT,
//!   identifier TEXT NOT NULL UNIQUE,
//!   proxy TEXT,
//!   status TEXT NOT NULL DEFAULT 'pending',
//!   tasks TEXT NOT NULL DEFAULT '[]',
//!   created_at TEXT NOT NULL,
//!   updated_at TEXT NOT NULL
//! );
//! ```
//!
//! The `tasks` column holds the serialized [`TaskList`]; `status` is always
//! the value derived from it. The identifier is the account's secret
//! credential and appears in logs only through
//! [`crate::utils::mask_identifier`].

use super::task_item::TaskList;
use crate::error::{DroverError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Overall account status, derived from the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Completed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "pending" => Ok(AccountStatus::Pending),
            "completed" => Ok(AccountStatus::Completed),
            other => Err(DroverError::Database(format!(
                "unknown account status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw database row for an account.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub identifier: String,
    pub proxy: Option<String>,
    pub status: String,
    pub tasks: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// An account with its decoded task list.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub identifier: String,
    pub proxy: Option<String>,
    pub status: AccountStatus,
    pub tasks: TaskList,
}

impl TryFrom<AccountRow> for AccountRecord {
    type Error = DroverError;

    fn try_from(row: AccountRow) -> Result<Self> {
        Ok(AccountRecord {
            status: AccountStatus::parse(&row.status)?,
            tasks: TaskList::from_json(&row.tasks)?,
            identifier: row.identifier,
            proxy: row.proxy,
        })
    }
}
