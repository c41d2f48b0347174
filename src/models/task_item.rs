//! # Task Records
//!
//! One [`TaskItem`] per unit of work within an account's plan, serialized as
//! a JSON array of `{name, status, ordinal}` records in the store's single
//! task-list column. [`TaskList`] owns all derived-status logic so the
//! account invariant - status is `completed` iff every task is `completed` -
//! lives in one place and is testable without a database.

use super::account::AccountStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion state of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One unit of work within an account's plan.
///
/// Ordinal positions are unique within an account and fix strict execution
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub name: String,
    pub status: TaskStatus,
    pub ordinal: u32,
}

/// An account's ordered task list with derived-status logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList(Vec<TaskItem>);

impl TaskList {
    /// Build a fresh list of pending tasks with sequential ordinals from 1.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| TaskItem {
                name: name.into(),
                status: TaskStatus::Pending,
                ordinal: (i + 1) as u32,
            })
            .collect();
        Self(items)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskItem> {
        self.0.iter()
    }

    /// Set the status of the named task. Returns whether a task was updated.
    pub fn mark(&mut self, name: &str, status: TaskStatus) -> bool {
        match self.0.iter_mut().find(|t| t.name == name) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    /// Append tasks whose names are not already present, continuing ordinals
    /// after the current maximum. Returns how many were added.
    pub fn append_missing(&mut self, names: &[String]) -> usize {
        let mut next_ordinal = self.0.iter().map(|t| t.ordinal).max().unwrap_or(0);
        let mut added = 0;
        for name in names {
            if self.0.iter().any(|t| &t.name == name) {
                continue;
            }
            next_ordinal += 1;
            self.0.push(TaskItem {
                name: name.clone(),
                status: TaskStatus::Pending,
                ordinal: next_ordinal,
            });
            added += 1;
        }
        added
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Names of pending tasks in ordinal order.
    pub fn pending_names(&self) -> Vec<String> {
        let mut pending: Vec<&TaskItem> = self
            .0
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .collect();
        pending.sort_by_key(|t| t.ordinal);
        pending.iter().map(|t| t.name.clone()).collect()
    }

    /// Names of completed tasks in ordinal order.
    pub fn completed_names(&self) -> Vec<String> {
        let mut completed: Vec<&TaskItem> = self
            .0
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect();
        completed.sort_by_key(|t| t.ordinal);
        completed.iter().map(|t| t.name.clone()).collect()
    }

    /// Account status derived from the task list.
    ///
    /// A non-empty list with every task completed derives `completed`;
    /// anything else - including an empty list - derives `pending`.
    pub fn derived_status(&self) -> AccountStatus {
        if !self.0.is_empty() && self.0.iter().all(|t| t.status == TaskStatus::Completed) {
            AccountStatus::Completed
        } else {
            AccountStatus::Pending
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        Ok(Self(serde_json::from_str(raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_names_assigns_sequential_ordinals() {
        let list = TaskList::from_names(["faucet", "mint", "swap"]);
        let ordinals: Vec<u32> = list.iter().map(|t| t.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert!(list.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[test]
    fn derived_status_requires_every_task_completed() {
        let mut list = TaskList::from_names(["faucet", "mint"]);
        assert_eq!(list.derived_status(), AccountStatus::Pending);

        assert!(list.mark("faucet", TaskStatus::Completed));
        assert_eq!(list.derived_status(), AccountStatus::Pending);

        assert!(list.mark("mint", TaskStatus::Completed));
        assert_eq!(list.derived_status(), AccountStatus::Completed);
    }

    #[test]
    fn empty_list_derives_pending() {
        let list = TaskList::default();
        assert_eq!(list.derived_status(), AccountStatus::Pending);
    }

    #[test]
    fn marking_twice_is_idempotent() {
        let mut list = TaskList::from_names(["faucet"]);
        assert!(list.mark("faucet", TaskStatus::Completed));
        let after_first = list.derived_status();

        assert!(list.mark("faucet", TaskStatus::Completed));
        assert_eq!(list.derived_status(), after_first);
    }

    #[test]
    fn marking_an_unknown_name_reports_false() {
        let mut list = TaskList::from_names(["faucet"]);
        assert!(!list.mark("missing", TaskStatus::Completed));
    }

    #[test]
    fn append_missing_skips_existing_names_and_extends_ordinals() {
        let mut list = TaskList::from_names(["a"]);
        list.mark("a", TaskStatus::Completed);

        let added = list.append_missing(&["a".to_string(), "b".to_string()]);
        assert_eq!(added, 1);
        assert_eq!(list.len(), 2);

        // Existing completed task untouched, new task pending with the next ordinal.
        let a = list.iter().find(|t| t.name == "a").unwrap();
        assert_eq!(a.status, TaskStatus::Completed);
        let b = list.iter().find(|t| t.name == "b").unwrap();
        assert_eq!(b.status, TaskStatus::Pending);
        assert_eq!(b.ordinal, 2);

        assert_eq!(list.derived_status(), AccountStatus::Pending);
    }

    #[test]
    fn pending_names_come_back_in_ordinal_order() {
        let mut list = TaskList::from_names(["a", "b", "c"]);
        list.mark("b", TaskStatus::Completed);
        assert_eq!(list.pending_names(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(list.completed_names(), vec!["b".to_string()]);
    }

    #[test]
    fn json_round_trip_preserves_record_layout() {
        let list = TaskList::from_names(["faucet", "mint"]);
        let raw = list.to_json().unwrap();
        assert!(raw.contains(r#""name":"faucet""#));
        assert!(raw.contains(r#""status":"pending""#));
        assert!(raw.contains(r#""ordinal":1"#));

        let parsed = TaskList::from_json(&raw).unwrap();
        assert_eq!(parsed, list);
    }
}
