use super::Validator;
use crate::rules::{is_boolean_if_set, is_string, is_table};
use crate::value::Value;

impl Validator {
    /// Validate the `transport` block. It is required and must name a
    /// transport.
    pub fn validate_transport(&mut self, transport: &Value) {
        if !is_table(transport) {
            self.invalid(transport, "transport must be a hash");
            return;
        }
        self.check(
            is_string(transport.get("name")),
            transport,
            "transport name must be a string",
        );
        self.check(
            is_boolean_if_set(transport.get("reconnect_on_error")),
            transport,
            "transport reconnect_on_error must be boolean",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_definition() {
        let mut validator = Validator::new();
        for (transport, expected) in [
            (json!(null), 1),
            (json!({}), 1),
            (json!({"name": 1}), 1),
            (json!({"name": "rabbitmq"}), 0),
            (json!({"name": "rabbitmq", "reconnect_on_error": "invalid"}), 1),
            (json!({"name": "rabbitmq", "reconnect_on_error": false}), 0),
        ] {
            validator.validate_transport(&Value::from(transport));
            assert_eq!(validator.reset(), expected);
        }
    }

    #[test]
    fn test_missing_transport_has_no_object() {
        let mut validator = Validator::new();
        validator.validate_transport(&Value::Null);
        assert_eq!(validator.failures()[0].object, None);
    }
}
