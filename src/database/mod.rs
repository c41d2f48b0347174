//! Durable account/task state: connection handling, the task state store and
//! bulk provisioning flows.

pub mod connection;
pub mod provision;
pub mod store;

pub use connection::DatabaseConnection;
pub use provision::{add_new_accounts, regenerate_all, regenerate_completed, seed_accounts};
pub use store::{TaskStore, TasksInfo};
