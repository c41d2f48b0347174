//! # Task Plan Expander
//!
//! Turns the declarative task specification into one concrete ordered task
//! list per account. The specification is a closed set of entry kinds rather
//! than runtime container inspection:
//!
//! - [`PlanEntry::Plain`] - a single task name, included as-is
//! - [`PlanEntry::PickOne`] - exactly one member chosen uniformly at random
//! - [`PlanEntry::ShuffleAll`] - every member included, order randomized
//!
//! Output ordering is the concatenation in specification order with
//! intra-group randomization only. Expansion never mutates the
//! specification; randomness is the only side effect.

use crate::error::{DroverError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One entry of the declarative task specification.
///
/// In YAML, a plain string is a `Plain` entry, `pick_one: [..]` selects one
/// member at random and `shuffle_all: [..]` includes all members in random
/// order. Groups hold plain names only; groups do not nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanEntry {
    Plain(String),
    PickOne { pick_one: Vec<String> },
    ShuffleAll { shuffle_all: Vec<String> },
}

/// A declarative task specification, expandable into concrete plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPlan(pub Vec<PlanEntry>);

impl TaskPlan {
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self(entries)
    }

    /// Expand into one concrete ordered task list using the thread RNG.
    pub fn expand(&self) -> Result<Vec<String>> {
        self.expand_with(&mut rand::thread_rng())
    }

    /// Expand with a caller-supplied RNG (deterministic in tests).
    ///
    /// Fails if the expansion yields an empty list: an account must never be
    /// provisioned with zero tasks.
    pub fn expand_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<String>> {
        let mut planned = Vec::new();

        for entry in &self.0 {
            match entry {
                PlanEntry::Plain(name) => planned.push(name.clone()),
                PlanEntry::PickOne { pick_one } => {
                    let chosen = pick_one.choose(rng).ok_or_else(|| {
                        DroverError::Plan("pick_one group has no members".to_string())
                    })?;
                    planned.push(chosen.clone());
                }
                PlanEntry::ShuffleAll { shuffle_all } => {
                    let mut members = shuffle_all.clone();
                    members.shuffle(rng);
                    planned.extend(members);
                }
            }
        }

        if planned.is_empty() {
            return Err(DroverError::Plan(
                "task specification expanded to an empty plan".to_string(),
            ));
        }

        debug!(tasks = ?planned, "expanded task plan");
        Ok(planned)
    }
}

impl From<&[PlanEntry]> for TaskPlan {
    fn from(entries: &[PlanEntry]) -> Self {
        Self(entries.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeSet, HashSet};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_entries_expand_in_input_order() {
        let plan = TaskPlan::new(vec![
            PlanEntry::Plain("faucet".to_string()),
            PlanEntry::Plain("mint".to_string()),
            PlanEntry::Plain("swap".to_string()),
        ]);

        for seed in 0..10u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let expanded = plan.expand_with(&mut rng).unwrap();
            assert_eq!(expanded, names(&["faucet", "mint", "swap"]));
        }
    }

    #[test]
    fn pick_one_selects_exactly_one_member() {
        let plan = TaskPlan::new(vec![PlanEntry::PickOne {
            pick_one: names(&["a", "b", "c"]),
        }]);

        let mut rng = StdRng::seed_from_u64(7);
        let expanded = plan.expand_with(&mut rng).unwrap();
        assert_eq!(expanded.len(), 1);
        assert!(["a", "b", "c"].contains(&expanded[0].as_str()));
    }

    #[test]
    fn pick_one_eventually_selects_every_member() {
        let plan = TaskPlan::new(vec![PlanEntry::PickOne {
            pick_one: names(&["a", "b", "c"]),
        }]);

        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(plan.expand_with(&mut rng).unwrap().remove(0));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn shuffle_all_preserves_the_member_multiset() {
        let members = names(&["a", "b", "c", "d"]);
        let plan = TaskPlan::new(vec![PlanEntry::ShuffleAll {
            shuffle_all: members.clone(),
        }]);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let expanded = plan.expand_with(&mut rng).unwrap();
            let expected: BTreeSet<_> = members.iter().cloned().collect();
            let actual: BTreeSet<_> = expanded.iter().cloned().collect();
            assert_eq!(expanded.len(), members.len());
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn groups_randomize_only_within_themselves() {
        let plan = TaskPlan::new(vec![
            PlanEntry::Plain("first".to_string()),
            PlanEntry::ShuffleAll {
                shuffle_all: names(&["x", "y"]),
            },
            PlanEntry::Plain("last".to_string()),
        ]);

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let expanded = plan.expand_with(&mut rng).unwrap();
            assert_eq!(expanded.len(), 4);
            assert_eq!(expanded[0], "first");
            assert_eq!(expanded[3], "last");
        }
    }

    #[test]
    fn empty_specification_is_an_error() {
        let plan = TaskPlan::new(vec![]);
        let err = plan.expand().unwrap_err();
        assert!(matches!(err, DroverError::Plan(_)));
    }

    #[test]
    fn empty_pick_one_group_is_an_error() {
        let plan = TaskPlan::new(vec![PlanEntry::PickOne { pick_one: vec![] }]);
        assert!(matches!(plan.expand(), Err(DroverError::Plan(_))));
    }

    #[test]
    fn expansion_does_not_mutate_the_specification() {
        let plan = TaskPlan::new(vec![PlanEntry::ShuffleAll {
            shuffle_all: names(&["a", "b", "c"]),
        }]);
        let before = plan.clone();
        let _ = plan.expand().unwrap();
        assert_eq!(plan, before);
    }
}
