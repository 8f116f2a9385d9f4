//! Atomic predicates shared by every validator.
//!
//! Each rule inspects one value (or a handful of values) and answers with a
//! `bool`. Rules never fail: malformed input simply yields `false`. The
//! `*_if_set` variants treat `null` as trivially valid, which is how optional
//! attributes are told apart from required ones.

use chrono::NaiveTime;
use regex::Regex;

use crate::value::Value;

/// Accepted time-of-day layouts, tried in order.
///
/// 24-hour `H:MM` or `H:MM:SS`, or 12-hour with an `AM`/`PM` suffix
/// (case-insensitive, optional space). Time zones are not accepted.
const TIME_FORMATS: &[&str] = &[
    "%H:%M",
    "%H:%M:%S",
    "%I:%M %p",
    "%I:%M:%S %p",
    "%I:%M%p",
    "%I:%M:%S%p",
];

pub fn is_table(value: &Value) -> bool {
    value.is_table()
}

pub fn is_table_if_set(value: &Value) -> bool {
    value.is_null() || is_table(value)
}

pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

pub fn is_array_if_set(value: &Value) -> bool {
    value.is_null() || is_array(value)
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

pub fn is_string_if_set(value: &Value) -> bool {
    value.is_null() || is_string(value)
}

pub fn is_integer(value: &Value) -> bool {
    value.is_integer()
}

pub fn is_integer_if_set(value: &Value) -> bool {
    value.is_null() || is_integer(value)
}

/// An integer strictly greater than zero.
pub fn is_positive_integer(value: &Value) -> bool {
    value.as_integer().is_some_and(|i| i > 0)
}

pub fn is_numeric(value: &Value) -> bool {
    value.is_number()
}

pub fn is_numeric_if_set(value: &Value) -> bool {
    value.is_null() || is_numeric(value)
}

pub fn is_boolean(value: &Value) -> bool {
    value.is_bool()
}

pub fn is_boolean_if_set(value: &Value) -> bool {
    value.is_null() || is_boolean(value)
}

/// A string matching `regex`. Anchoring is up to the pattern.
pub fn matches_regex(regex: &Regex, value: &Value) -> bool {
    value.as_str().is_some_and(|s| regex.is_match(s))
}

pub fn matches_regex_if_set(regex: &Regex, value: &Value) -> bool {
    value.is_null() || matches_regex(regex, value)
}

/// An array whose items are all non-empty strings.
pub fn items_are_strings(value: &Value) -> bool {
    value.as_array().is_some_and(|items| {
        items
            .iter()
            .all(|item| item.as_str().is_some_and(|s| !s.is_empty()))
    })
}

/// An array whose items are all non-empty strings matching `regex`.
pub fn items_match_regex(regex: &Regex, value: &Value) -> bool {
    items_are_strings(value)
        && value
            .as_array()
            .is_some_and(|items| items.iter().all(|item| matches_regex(regex, item)))
}

/// At least one of `values` is non-null.
pub fn either_is_set(values: &[&Value]) -> bool {
    values.iter().any(|value| !value.is_null())
}

/// At most one of `values` is non-null.
pub fn at_most_one_is_set(values: &[&Value]) -> bool {
    values.iter().filter(|value| !value.is_null()).count() <= 1
}

/// Every value is a string that parses as a time of day.
pub fn are_times(values: &[&Value]) -> bool {
    values
        .iter()
        .all(|value| value.as_str().is_some_and(is_time_token))
}

/// Whether `token` parses as a time of day.
pub fn is_time_token(token: &str) -> bool {
    let token = token.trim();
    TIME_FORMATS
        .iter()
        .any(|format| NaiveTime::parse_from_str(token, format).is_ok())
}

/// The value (a string, or an array of strings) only holds members of
/// `allowed`.
pub fn is_one_of(allowed: &[&str], value: &Value) -> bool {
    let member = |v: &Value| v.as_str().is_some_and(|s| allowed.contains(&s));
    match value {
        Value::Array(items) => items.iter().all(member),
        other => member(other),
    }
}

pub fn is_one_of_if_set(allowed: &[&str], value: &Value) -> bool {
    value.is_null() || is_one_of(allowed, value)
}
