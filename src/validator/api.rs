use super::Validator;
use crate::rules::{
    either_is_set, is_boolean_if_set, is_integer, is_integer_if_set, is_string, is_string_if_set,
    is_table,
};
use crate::value::Value;

impl Validator {
    /// Validate the optional `api` block.
    pub fn validate_api(&mut self, api: &Value) {
        if api.is_null() {
            return;
        }
        if !is_table(api) {
            self.invalid(api, "api must be a hash");
            return;
        }
        self.check(
            is_integer_if_set(api.get("port")),
            api,
            "api port must be an integer",
        );
        self.check(
            is_string_if_set(api.get("bind")),
            api,
            "api bind must be a string",
        );
        self.validate_credentials(api, api, "api");
        if api.get("endpoints").is_truthy() {
            self.validate_api_endpoints(api);
        }
    }

    /// `user` and `password` of `block` are both required once either is set.
    pub(super) fn validate_credentials(&mut self, object: &Value, block: &Value, prefix: &str) {
        let (user, password) = (block.get("user"), block.get("password"));
        if either_is_set(&[user, password]) {
            if !is_string(user) {
                self.invalid(object, format!("{} user must be a string", prefix));
            }
            if !is_string(password) {
                self.invalid(object, format!("{} password must be a string", prefix));
            }
        }
    }

    fn validate_api_endpoints(&mut self, api: &Value) {
        let Some(endpoints) = api.get("endpoints").as_array() else {
            self.invalid(api, "api endpoints must be an array");
            return;
        };
        for endpoint in endpoints {
            if !is_table(endpoint) {
                self.invalid(api, "api endpoints must each be a hash");
                continue;
            }
            let url = endpoint.get("url");
            if url.is_truthy() {
                self.check(is_string(url), api, "api endpoint url must be a string");
            } else {
                self.check(
                    is_string(endpoint.get("host")),
                    api,
                    "api endpoint host must be a string",
                );
                self.check(
                    is_integer(endpoint.get("port")),
                    api,
                    "api endpoint port must be an integer",
                );
                self.check(
                    is_boolean_if_set(endpoint.get("ssl")),
                    api,
                    "api endpoint ssl must be a boolean",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count(api: serde_json::Value) -> usize {
        let mut validator = Validator::new();
        validator.validate_api(&Value::from(api));
        validator.reset()
    }

    #[test]
    fn test_api_definition() {
        assert_eq!(count(json!(null)), 0);
        assert_eq!(count(json!(true)), 1);
        assert_eq!(count(json!({})), 0);
        assert_eq!(count(json!({"port": true})), 1);
        assert_eq!(count(json!({"port": 4567})), 0);
        assert_eq!(count(json!({"port": 4567, "bind": true})), 1);
        assert_eq!(count(json!({"port": 4567, "bind": "127.0.0.1"})), 0);
    }

    #[test]
    fn test_api_credentials() {
        assert_eq!(count(json!({"user": 1})), 2);
        assert_eq!(count(json!({"user": "foo"})), 1);
        assert_eq!(count(json!({"user": "foo", "password": 1})), 1);
        assert_eq!(count(json!({"user": "foo", "password": "bar"})), 0);
    }

    #[test]
    fn test_api_endpoints() {
        assert_eq!(count(json!({"endpoints": "http://localhost:4567"})), 1);
        assert_eq!(count(json!({"endpoints": [1]})), 1);
        assert_eq!(count(json!({"endpoints": [{"url": "https://api.example.com"}]})), 0);
        assert_eq!(count(json!({"endpoints": [{"url": 1}]})), 1);
        assert_eq!(count(json!({"endpoints": [{}]})), 2);
        assert_eq!(
            count(json!({"endpoints": [{"host": "10.0.0.1", "port": 4567, "ssl": "yes"}]})),
            1
        );
        assert_eq!(
            count(json!({"endpoints": [{"host": "10.0.0.1", "port": 4567, "ssl": true}]})),
            0
        );
    }
}
