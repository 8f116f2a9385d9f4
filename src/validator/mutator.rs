use super::Validator;
use crate::rules::{is_numeric_if_set, is_string};
use crate::value::Value;

impl Validator {
    /// Validate a mutator definition.
    pub fn validate_mutator(&mut self, mutator: &Value) {
        self.check(
            is_string(mutator.get("command")),
            mutator,
            "mutator command must be a string",
        );
        self.check(
            is_numeric_if_set(mutator.get("timeout")),
            mutator,
            "mutator timeout must be numeric",
        );
    }
}
