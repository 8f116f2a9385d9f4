use super::Validator;
use crate::rules::{is_boolean_if_set, is_string_if_set, is_table};
use crate::value::Value;

impl Validator {
    /// Validate the optional `tessen` call-home block.
    pub fn validate_tessen(&mut self, tessen: &Value) {
        if tessen.is_null() {
            return;
        }
        if !is_table(tessen) {
            self.invalid(tessen, "tessen must be a hash");
            return;
        }
        self.check(
            is_boolean_if_set(tessen.get("enabled")),
            tessen,
            "tessen enabled must be boolean",
        );
        self.check(
            is_string_if_set(tessen.get("identity_key")),
            tessen,
            "tessen identity_key must be a string",
        );
    }
}
