use super::Validator;
use crate::rules::is_string_if_set;
use crate::value::Value;

impl Validator {
    /// Validate an extension definition.
    pub fn validate_extension(&mut self, extension: &Value) {
        self.check(
            is_string_if_set(extension.get("gem")),
            extension,
            "extension gem must be a string",
        );
        self.check(
            is_string_if_set(extension.get("version")),
            extension,
            "extension version must be a string",
        );
    }
}
