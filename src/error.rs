//! Error types for the drover system.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DroverError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Account store schema is missing - create or reset the database before running")]
    SchemaMissing,
    #[error("Account {0} already exists in the store")]
    AccountExists(String),
    #[error("Account {0} not found in the store")]
    AccountNotFound(String),
    #[error("Plan expansion error: {0}")]
    Plan(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Session error: {0}")]
    Session(String),
    #[error("Notification error: {0}")]
    Notify(String),
    #[error("Orchestration error: {0}")]
    Orchestration(String),
}

impl From<sqlx::Error> for DroverError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // SQLite reports a dropped/never-created accounts table this way.
            if db_err.message().contains("no such table") {
                return DroverError::SchemaMissing;
            }
        }
        DroverError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DroverError {
    fn from(err: serde_json::Error) -> Self {
        DroverError::Database(format!("task list serialization error: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, DroverError>;
