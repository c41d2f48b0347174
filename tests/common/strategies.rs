//! Shared proptest strategies for task-list and plan properties.

use proptest::prelude::*;

/// Size of the task-name pool the operation strategies index into.
pub const NAME_POOL: usize = 8;

/// Resolve a pool index to its task name.
pub fn pool_name(index: usize) -> String {
    format!("task{index}")
}

/// One mutation against an account's task list, mirroring the store's
/// mutating operations.
#[derive(Debug, Clone)]
pub enum StoreOp {
    MarkCompleted(usize),
    MarkPending(usize),
    Append(Vec<usize>),
    Clear,
}

pub fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (0..NAME_POOL).prop_map(StoreOp::MarkCompleted),
        (0..NAME_POOL).prop_map(StoreOp::MarkPending),
        prop::collection::vec(0..NAME_POOL, 1..4).prop_map(StoreOp::Append),
        Just(StoreOp::Clear),
    ]
}

/// Random sequences of add/update/clear operations.
pub fn store_ops_strategy() -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(store_op_strategy(), 0..32)
}

/// Distinct group member names for pick-one / shuffle-all properties.
pub fn member_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,11}", 1..6)
        .prop_map(|set| set.into_iter().collect())
}

/// Plain task-name sequences (possibly with repeats).
pub fn plain_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,11}", 1..10)
}
