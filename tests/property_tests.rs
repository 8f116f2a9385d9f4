//! Property-based tests for the merge algebra using proptest.
//!
//! These tests verify laws that must hold for all settings trees, not just
//! hand-picked examples.

use proptest::prelude::*;
use std::collections::BTreeMap;

use sensu_settings::merge::is_unchanged;
use sensu_settings::{deep_diff, deep_merge, Table, Value};

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Generate arbitrary settings values with controlled recursion depth.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        // NaN never equals itself
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::Float),
        "[a-zA-Z0-9_\\-]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..5).prop_map(Value::Table),
        ]
    })
}

fn arb_table() -> impl Strategy<Value = Table> {
    prop::collection::btree_map("[a-z_]{1,8}", arb_value(), 0..6)
}

/// Arrays as merge produces them: no duplicate items.
fn dedup(items: Vec<Value>) -> Vec<Value> {
    let mut unique = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

// ============================================================================
// Merge Laws
// ============================================================================

proptest! {
    /// Merging an empty table changes nothing.
    #[test]
    fn merge_with_empty_table_is_identity(a in arb_table(), b in arb_table()) {
        let merged = deep_merge(&Value::Table(a), &Value::Table(b));
        prop_assert_eq!(deep_merge(&merged, &Value::table()), merged);
    }

    /// Disjoint keys end up side by side, unchanged.
    #[test]
    fn merge_disjoint_tables_is_union(a in arb_table(), b in arb_table()) {
        let b: Table = b
            .into_iter()
            .map(|(k, v)| (format!("B{}", k), v))
            .collect();
        let merged = deep_merge(&Value::Table(a.clone()), &Value::Table(b.clone()));
        let table = merged.as_table().unwrap();

        prop_assert_eq!(table.len(), a.len() + b.len());
        for (key, value) in a.iter().chain(b.iter()) {
            prop_assert_eq!(table.get(key), Some(value));
        }
    }

    /// Arrays concatenate, keeping the first occurrence of every item.
    #[test]
    fn merge_arrays_concatenate_unique(
        x in prop::collection::vec(0i64..6, 0..8),
        y in prop::collection::vec(0i64..6, 0..8),
    ) {
        let xs: Vec<Value> = x.iter().copied().map(Value::Integer).collect();
        let ys: Vec<Value> = y.iter().copied().map(Value::Integer).collect();
        let merged = deep_merge(&Value::Array(dedup(xs.clone())), &Value::Array(ys.clone()));

        let expected = dedup(xs.into_iter().chain(ys).collect());
        prop_assert_eq!(merged, Value::Array(expected));
    }

    /// The incoming side always wins for scalars.
    #[test]
    fn merge_scalar_incoming_wins(key in "[a-z]{1,8}", old in any::<i64>(), new in "[a-z]{0,8}") {
        let base = Value::Table(BTreeMap::from([(key.clone(), Value::Integer(old))]));
        let incoming = Value::Table(BTreeMap::from([(key.clone(), Value::String(new.clone()))]));
        let merged = deep_merge(&base, &incoming);
        prop_assert_eq!(merged.get(&key), &Value::String(new));
    }

    /// Merging never mutates its inputs.
    #[test]
    fn merge_is_pure(a in arb_value(), b in arb_value()) {
        let (a_before, b_before) = (a.clone(), b.clone());
        let _ = deep_merge(&a, &b);
        prop_assert_eq!(a, a_before);
        prop_assert_eq!(b, b_before);
    }
}

// ============================================================================
// Diff Laws
// ============================================================================

proptest! {
    /// A tree never differs from itself.
    #[test]
    fn diff_with_self_is_empty(a in arb_value()) {
        prop_assert!(is_unchanged(&deep_diff(&a, &a)));
    }

    /// Merging `b` into `a` changes something exactly when the diff says so.
    #[test]
    fn diff_detects_merge_changes(a in arb_table(), b in arb_table()) {
        let a = Value::Table(a);
        let merged = deep_merge(&a, &Value::Table(b));
        prop_assert_eq!(is_unchanged(&deep_diff(&a, &merged)), a == merged);
    }

    /// Every changed scalar leaf shows up as a `[before, after]` pair.
    #[test]
    fn diff_records_before_and_after(key in "[a-z]{1,8}", old in any::<i64>(), new in any::<i64>()) {
        prop_assume!(old != new);
        let before = Value::Table(BTreeMap::from([(key.clone(), Value::Integer(old))]));
        let after = Value::Table(BTreeMap::from([(key.clone(), Value::Integer(new))]));
        let diff = deep_diff(&before, &after);
        prop_assert_eq!(
            diff.get(&key),
            &Value::Array(vec![Value::Integer(old), Value::Integer(new)])
        );
    }
}
