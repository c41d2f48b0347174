//! Data model for accounts and their task lists.

pub mod account;
pub mod task_item;

pub use account::{AccountRecord, AccountRow, AccountStatus};
pub use task_item::{TaskItem, TaskList, TaskStatus};
