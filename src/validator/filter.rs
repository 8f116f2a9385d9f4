use super::Validator;
use crate::rules::{is_boolean_if_set, is_table};
use crate::value::Value;

impl Validator {
    /// Validate a filter definition.
    pub fn validate_filter(&mut self, filter: &Value) {
        self.check(
            is_boolean_if_set(filter.get("negate")),
            filter,
            "filter negate must be boolean",
        );
        self.check(
            is_table(filter.get("attributes")),
            filter,
            "filter attributes must be a hash",
        );
        if filter.get("when").is_truthy() {
            self.validate_time_windows(filter, "filter", "when");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count(filter: serde_json::Value) -> usize {
        let mut validator = Validator::new();
        validator.validate_filter(&Value::from(filter));
        validator.reset()
    }

    #[test]
    fn test_filter_definition() {
        assert_eq!(count(json!({})), 1);
        assert_eq!(count(json!({"attributes": 1})), 1);
        assert_eq!(count(json!({"attributes": {}})), 0);
        assert_eq!(count(json!({"attributes": {}, "negate": "true"})), 1);
        assert_eq!(count(json!({"attributes": {}, "negate": true})), 0);
    }

    #[test]
    fn test_filter_when() {
        assert_eq!(count(json!({"attributes": {}, "when": true})), 1);
        assert_eq!(count(json!({"attributes": {}, "when": {"days": []}})), 1);
        assert_eq!(count(json!({"attributes": {}, "when": {"days": {"all": []}}})), 1);
        assert_eq!(
            count(json!({"attributes": {}, "when": {"days": {"all": [{"begin": "5:00 PM", "end": "8:00 AM"}]}}})),
            0
        );
    }
}
