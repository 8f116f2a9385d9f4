//! Deep merge and deep diff over settings trees.
//!
//! Both functions are pure: they never touch the inputs and always succeed.

use crate::value::{Table, Value};

/// Deep merge `incoming` on top of `base`.
///
/// - table + table: merged key by key, recursively
/// - array + array: concatenated, duplicates dropped, first occurrence wins
/// - anything else: `incoming` replaces `base`
pub fn deep_merge(base: &Value, incoming: &Value) -> Value {
    match (base, incoming) {
        (Value::Table(base), Value::Table(incoming)) => Value::Table(merge_tables(base, incoming)),
        (Value::Array(base), Value::Array(incoming)) => Value::Array(concat_unique(base, incoming)),
        (_, incoming) => incoming.clone(),
    }
}

fn merge_tables(base: &Table, incoming: &Table) -> Table {
    let mut merged = base.clone();
    for (key, value) in incoming {
        let value = match base.get(key) {
            Some(existing) => deep_merge(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

fn concat_unique(base: &[Value], incoming: &[Value]) -> Vec<Value> {
    let mut items: Vec<Value> = Vec::with_capacity(base.len() + incoming.len());
    for item in base.iter().chain(incoming) {
        if !items.contains(item) {
            items.push(item.clone());
        }
    }
    items
}

/// Compare two trees over the union of their keys.
///
/// For every key whose values differ the result holds either a nested diff
/// (both sides are tables) or a `[before, after]` pair, with `null` standing
/// in for a missing side. Arrays are compared by equality only. Non-table
/// inputs are treated as empty tables.
pub fn deep_diff(before: &Value, after: &Value) -> Value {
    static EMPTY: Table = Table::new();
    let before = before.as_table().unwrap_or(&EMPTY);
    let after = after.as_table().unwrap_or(&EMPTY);
    Value::Table(diff_tables(before, after))
}

fn diff_tables(before: &Table, after: &Table) -> Table {
    static NULL: Value = Value::Null;
    let mut diff = Table::new();
    let keys = before.keys().chain(after.keys().filter(|k| !before.contains_key(*k)));
    for key in keys {
        let old = before.get(key).unwrap_or(&NULL);
        let new = after.get(key).unwrap_or(&NULL);
        if old == new {
            continue;
        }
        let change = match (old, new) {
            (Value::Table(old), Value::Table(new)) => Value::Table(diff_tables(old, new)),
            _ => Value::Array(vec![old.clone(), new.clone()]),
        };
        diff.insert(key.clone(), change);
    }
    diff
}

/// Whether a diff produced by [`deep_diff`] records no change.
pub fn is_unchanged(diff: &Value) -> bool {
    diff.as_table().map_or(true, Table::is_empty)
}
