//! # Run Selection
//!
//! Resolves which accounts one orchestrator invocation processes and in what
//! order: an explicit 1-based index range, an explicit list of account
//! numbers, or everything - with an independent shuffle option. Held only
//! for the duration of one invocation, never persisted.

use super::types::AccountSeed;
use crate::config::SettingsConfig;
use crate::error::{DroverError, Result};
use rand::seq::SliceRandom;
use tracing::info;

/// Account-selection parameters for one run.
#[derive(Debug, Clone, Default)]
pub struct RunSelection {
    /// 1-based inclusive range; `(0, 0)` defers to `exact`
    pub range: (usize, usize),
    /// Explicit 1-based account numbers; empty means "all"
    pub exact: Vec<usize>,
    /// Shuffle execution order after selection
    pub shuffle: bool,
}

impl RunSelection {
    pub fn from_settings(settings: &SettingsConfig) -> Self {
        Self {
            range: settings.accounts_range,
            exact: settings.exact_accounts.clone(),
            shuffle: settings.shuffle_accounts,
        }
    }
}

/// Resolve the selection against the credential list, pairing each selected
/// account with a proxy assigned round-robin.
///
/// Returns seeds in execution order (shuffled when requested).
pub fn select_accounts(
    credentials: &[String],
    proxies: &[String],
    selection: &RunSelection,
) -> Result<Vec<AccountSeed>> {
    if credentials.is_empty() {
        return Err(DroverError::Orchestration(
            "no account credentials supplied".to_string(),
        ));
    }

    let account_numbers: Vec<usize> = if selection.range == (0, 0) {
        if selection.exact.is_empty() {
            (1..=credentials.len()).collect()
        } else {
            for &number in &selection.exact {
                if number == 0 || number > credentials.len() {
                    return Err(DroverError::Config(format!(
                        "exact account number {number} is outside 1..={}",
                        credentials.len()
                    )));
                }
            }
            selection.exact.clone()
        }
    } else {
        let (start, end) = selection.range;
        if start == 0 || start > end {
            return Err(DroverError::Config(format!(
                "accounts_range [{start}, {end}] is not a valid 1-based range"
            )));
        }
        let end = end.min(credentials.len());
        if start > end {
            return Err(DroverError::Config(format!(
                "accounts_range starts at {start} but only {} accounts are available",
                credentials.len()
            )));
        }
        (start..=end).collect()
    };

    let mut seeds: Vec<AccountSeed> = account_numbers
        .iter()
        .enumerate()
        .map(|(position, &number)| {
            let proxy = if proxies.is_empty() {
                None
            } else {
                Some(proxies[position % proxies.len()].clone())
            };
            AccountSeed::new(number, credentials[number - 1].clone(), proxy)
        })
        .collect();

    let order_label = if selection.shuffle {
        seeds.shuffle(&mut rand::thread_rng());
        "random"
    } else {
        "sequential"
    };

    let account_order = seeds
        .iter()
        .map(|s| s.index.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    info!(
        accounts = seeds.len(),
        order = order_label,
        "accounts order: {account_order}"
    );

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("0xcredential{i:032}")).collect()
    }

    #[test]
    fn defaults_select_every_account_in_order() {
        let seeds = select_accounts(&credentials(4), &[], &RunSelection::default()).unwrap();
        let numbers: Vec<usize> = seeds.iter().map(|s| s.index).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(seeds.iter().all(|s| s.proxy.is_none()));
    }

    #[test]
    fn range_selection_is_one_based_and_inclusive() {
        let selection = RunSelection {
            range: (2, 3),
            ..Default::default()
        };
        let seeds = select_accounts(&credentials(5), &[], &selection).unwrap();
        let numbers: Vec<usize> = seeds.iter().map(|s| s.index).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn range_end_is_clamped_to_available_accounts() {
        let selection = RunSelection {
            range: (2, 100),
            ..Default::default()
        };
        let seeds = select_accounts(&credentials(3), &[], &selection).unwrap();
        let numbers: Vec<usize> = seeds.iter().map(|s| s.index).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn exact_selection_picks_the_listed_accounts() {
        let selection = RunSelection {
            exact: vec![4, 1],
            ..Default::default()
        };
        let seeds = select_accounts(&credentials(5), &[], &selection).unwrap();
        let numbers: Vec<usize> = seeds.iter().map(|s| s.index).collect();
        assert_eq!(numbers, vec![4, 1]);
    }

    #[test]
    fn exact_selection_out_of_bounds_is_rejected() {
        let selection = RunSelection {
            exact: vec![9],
            ..Default::default()
        };
        assert!(select_accounts(&credentials(3), &[], &selection).is_err());
    }

    #[test]
    fn proxies_cycle_over_selected_positions() {
        let proxies = vec!["p1".to_string(), "p2".to_string()];
        let seeds = select_accounts(&credentials(5), &proxies, &RunSelection::default()).unwrap();
        let assigned: Vec<&str> = seeds.iter().map(|s| s.proxy.as_deref().unwrap()).collect();
        assert_eq!(assigned, vec!["p1", "p2", "p1", "p2", "p1"]);
    }

    #[test]
    fn shuffle_preserves_the_selected_set() {
        let selection = RunSelection {
            shuffle: true,
            ..Default::default()
        };
        let seeds = select_accounts(&credentials(10), &[], &selection).unwrap();
        let mut numbers: Vec<usize> = seeds.iter().map(|s| s.index).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn empty_credential_list_is_rejected() {
        assert!(select_accounts(&[], &[], &RunSelection::default()).is_err());
    }
}
