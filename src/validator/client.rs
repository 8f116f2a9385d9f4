use super::{Validator, NAME_PATTERN};
use crate::rules::{
    is_array, is_array_if_set, is_boolean_if_set, is_integer_if_set, is_string, is_string_if_set,
    is_table, is_table_if_set, items_are_strings, matches_regex,
};
use crate::value::Value;

impl Validator {
    /// Validate the `client` block of a client service.
    pub fn validate_client(&mut self, client: &Value) {
        if !is_table(client) {
            self.invalid(client, "client must be a hash");
            return;
        }
        let name = client.get("name");
        self.check(is_string(name), client, "client name must be a string");
        self.check(
            matches_regex(&NAME_PATTERN, name),
            client,
            "client name cannot contain spaces or special characters",
        );
        self.check(
            is_string(client.get("address")),
            client,
            "client address must be a string",
        );
        self.check(
            is_boolean_if_set(client.get("safe_mode")),
            client,
            "client safe_mode must be boolean",
        );
        self.validate_client_subscriptions(client);
        self.validate_client_socket(client);
        self.validate_client_http_socket(client);
        self.check(
            is_boolean_if_set(client.get("keepalives")),
            client,
            "client keepalives must be boolean",
        );
        self.validate_client_keepalive(client);
        self.validate_client_redact(client);
        self.check(
            is_string_if_set(client.get("signature")),
            client,
            "client signature must be a string",
        );
        self.validate_client_registration(client, "registration");
        self.validate_client_registration(client, "deregistration");
    }

    fn validate_client_subscriptions(&mut self, client: &Value) {
        let subscriptions = client.get("subscriptions");
        if is_array(subscriptions) {
            self.check(
                items_are_strings(subscriptions),
                client,
                "client subscriptions must each be a non empty string",
            );
        } else {
            self.invalid(client, "client subscriptions must be an array");
        }
    }

    fn validate_client_socket(&mut self, client: &Value) {
        let socket = client.get("socket");
        if !is_table_if_set(socket) {
            self.invalid(client, "client socket must be a hash");
            return;
        }
        self.check(
            is_boolean_if_set(socket.get("enabled")),
            client,
            "client socket enabled must be a boolean",
        );
        self.check(
            is_string_if_set(socket.get("bind")),
            client,
            "client socket bind must be a string",
        );
        self.check(
            is_integer_if_set(socket.get("port")),
            client,
            "client socket port must be an integer",
        );
    }

    fn validate_client_http_socket(&mut self, client: &Value) {
        let http_socket = client.get("http_socket");
        if !is_table_if_set(http_socket) {
            self.invalid(client, "client http_socket must be a hash");
            return;
        }
        self.check(
            is_boolean_if_set(http_socket.get("enabled")),
            client,
            "client http_socket enabled must be boolean",
        );
        self.check(
            is_string_if_set(http_socket.get("bind")),
            client,
            "client http_socket bind must be a string",
        );
        self.check(
            is_integer_if_set(http_socket.get("port")),
            client,
            "client http_socket port must be an integer",
        );
        self.validate_credentials(client, http_socket, "client http_socket");
        self.check(
            is_boolean_if_set(http_socket.get("protect_all_endpoints")),
            client,
            "client http_socket protect_all_endpoints must be boolean",
        );
    }

    fn validate_client_keepalive(&mut self, client: &Value) {
        let keepalive = client.get("keepalive");
        if !is_table_if_set(keepalive) {
            self.invalid(client, "client keepalive must be a hash");
            return;
        }
        if keepalive.is_null() {
            return;
        }
        self.validate_handler_list(client, keepalive, "client keepalive");
        self.validate_thresholds(client, keepalive, "client keepalive");
        // A keepalive may carry check attributes; failures name the check.
        if keepalive.get("source").is_truthy() {
            self.validate_check_source(keepalive);
        }
        self.validate_check_aggregate(keepalive);
        self.validate_check_flap_detection(keepalive);
    }

    fn validate_client_redact(&mut self, client: &Value) {
        let redact = client.get("redact");
        self.check(
            is_array_if_set(redact),
            client,
            "client redact must be an array",
        );
        if is_array(redact) {
            self.check(
                items_are_strings(redact),
                client,
                "client redact keys must each be a string",
            );
        }
    }

    /// `kind` is either `registration` or `deregistration`.
    fn validate_client_registration(&mut self, client: &Value, kind: &str) {
        let block = client.get(kind);
        if !is_table_if_set(block) {
            self.invalid(client, format!("client {} must be a hash", kind));
            return;
        }
        if block.is_null() {
            return;
        }
        self.validate_handler_list(client, block, &format!("client {}", kind));
        if !is_integer_if_set(block.get("status")) {
            self.invalid(client, format!("client {} status must be an integer", kind));
        }
    }
}
