//! Time windows: `subdue` on checks and handlers, `when` on filters.
//!
//! ```json
//! {"days": {"all": [{"begin": "5:00 PM", "end": "8:00 AM"}]}}
//! ```

use super::Validator;
use crate::rules::{are_times, either_is_set, is_table};
use crate::value::{Table, Value};

const VALID_DAYS: &[&str] = &[
    "all",
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

impl Validator {
    /// Validate `definition[attribute]` as a time window.
    ///
    /// `scope` prefixes every message, e.g. `check subdue days must be a hash`.
    pub fn validate_time_windows(&mut self, definition: &Value, scope: &str, attribute: &str) {
        let window = definition.get(attribute);
        if !is_table(window) {
            self.invalid(definition, format!("{} {} must be a hash", scope, attribute));
            return;
        }
        match window.get("days").as_table() {
            None => self.invalid(
                definition,
                format!("{} {} days must be a hash", scope, attribute),
            ),
            Some(days) if days.is_empty() => self.invalid(
                definition,
                format!(
                    "{} {} days must include at least one day of the week or 'all'",
                    scope, attribute
                ),
            ),
            Some(days) => self.validate_time_window_days(definition, scope, attribute, days),
        }
    }

    fn validate_time_window_days(
        &mut self,
        definition: &Value,
        scope: &str,
        attribute: &str,
        days: &Table,
    ) {
        if !days.keys().all(|day| VALID_DAYS.contains(&day.as_str())) {
            self.invalid(
                definition,
                format!(
                    "{} {} days must be valid days of the week or 'all'",
                    scope, attribute
                ),
            );
            return;
        }
        for (day, conditions) in days {
            match conditions.as_array() {
                Some([]) => self.invalid(
                    definition,
                    format!("{} {} {} time windows must not be empty", scope, attribute, day),
                ),
                Some(conditions) => {
                    for condition in conditions {
                        self.validate_time_window_condition(
                            definition, scope, attribute, condition,
                        );
                    }
                }
                None => self.invalid(
                    definition,
                    format!(
                        "{} {} {} time windows must be in an array",
                        scope, attribute, day
                    ),
                ),
            }
        }
    }

    fn validate_time_window_condition(
        &mut self,
        definition: &Value,
        scope: &str,
        attribute: &str,
        condition: &Value,
    ) {
        if !is_table(condition) {
            self.invalid(definition, format!("{} {} must be a hash", scope, attribute));
            return;
        }
        let (begin, end) = (condition.get("begin"), condition.get("end"));
        if either_is_set(&[begin, end]) && !are_times(&[begin, end]) {
            self.invalid(
                definition,
                format!("{} {} begin and end times must be valid", scope, attribute),
            );
        }
    }
}
