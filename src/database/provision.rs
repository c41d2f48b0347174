//! Bulk provisioning flows over the store and the plan expander.
//!
//! Each account gets its own freshly expanded plan; an expansion that comes
//! back empty skips that account with an error log and never creates a
//! zero-task record.

use super::store::TaskStore;
use crate::config::DroverConfig;
use crate::error::Result;
use crate::plan::TaskPlan;
use crate::utils::mask_identifier;
use tracing::{error, info};

/// Reset the store and seed it with every credential, proxies assigned
/// round-robin. Returns how many accounts were provisioned.
pub async fn seed_accounts(
    store: &TaskStore,
    config: &DroverConfig,
    credentials: &[String],
    proxies: &[String],
) -> Result<usize> {
    store.reset_schema().await?;

    let plan = TaskPlan::from(config.flow.tasks.as_slice());
    let mut added = 0;
    for (i, credential) in credentials.iter().enumerate() {
        let proxy = cycled_proxy(proxies, i);
        match plan.expand() {
            Ok(task_names) => {
                store.add_account(credential, proxy, &task_names).await?;
                added += 1;
            }
            Err(e) => {
                error!(
                    account = %mask_identifier(credential),
                    error = %e,
                    "no tasks generated, account skipped"
                );
            }
        }
    }

    info!(accounts = added, "store reset and seeded");
    Ok(added)
}

/// Add accounts from the credential list that the store does not know yet.
/// Existing accounts are left untouched.
pub async fn add_new_accounts(
    store: &TaskStore,
    config: &DroverConfig,
    credentials: &[String],
    proxies: &[String],
) -> Result<usize> {
    let mut known: Vec<String> = store
        .list_completed()
        .await?
        .into_iter()
        .map(|r| r.identifier)
        .collect();
    known.extend(store.list_pending().await?.into_iter().map(|r| r.identifier));

    let plan = TaskPlan::from(config.flow.tasks.as_slice());
    let mut added = 0;
    for credential in credentials {
        if known.iter().any(|k| k == credential) {
            continue;
        }
        let proxy = cycled_proxy(proxies, added);
        match plan.expand() {
            Ok(task_names) => {
                store.add_account(credential, proxy, &task_names).await?;
                added += 1;
            }
            Err(e) => {
                error!(
                    account = %mask_identifier(credential),
                    error = %e,
                    "no tasks generated, account skipped"
                );
            }
        }
    }

    info!(accounts = added, "new accounts added to store");
    Ok(added)
}

/// Replace the plans of accounts whose every task is completed.
pub async fn regenerate_completed(store: &TaskStore, config: &DroverConfig) -> Result<usize> {
    let completed = store.list_completed().await?;
    regenerate(store, config, completed.iter().map(|r| r.identifier.as_str())).await
}

/// Replace the plans of every account in the store.
pub async fn regenerate_all(store: &TaskStore, config: &DroverConfig) -> Result<usize> {
    let mut accounts = store.list_completed().await?;
    accounts.extend(store.list_pending().await?);
    regenerate(store, config, accounts.iter().map(|r| r.identifier.as_str())).await
}

async fn regenerate<'a, I>(store: &TaskStore, config: &DroverConfig, identifiers: I) -> Result<usize>
where
    I: Iterator<Item = &'a str>,
{
    let plan = TaskPlan::from(config.flow.tasks.as_slice());
    let mut regenerated = 0;
    for identifier in identifiers {
        match plan.expand() {
            Ok(task_names) => {
                store.clear_tasks(identifier).await?;
                store.add_tasks(identifier, &task_names).await?;
                regenerated += 1;
            }
            Err(e) => {
                error!(
                    account = %mask_identifier(identifier),
                    error = %e,
                    "no tasks generated, plan left untouched"
                );
            }
        }
    }

    info!(accounts = regenerated, "task plans regenerated");
    Ok(regenerated)
}

fn cycled_proxy(proxies: &[String], index: usize) -> Option<&str> {
    if proxies.is_empty() {
        None
    } else {
        Some(proxies[index % proxies.len()].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxies_cycle_round_robin() {
        let proxies = vec!["p1".to_string(), "p2".to_string()];
        assert_eq!(cycled_proxy(&proxies, 0), Some("p1"));
        assert_eq!(cycled_proxy(&proxies, 1), Some("p2"));
        assert_eq!(cycled_proxy(&proxies, 2), Some("p1"));
        assert_eq!(cycled_proxy(&[], 0), None);
    }
}
