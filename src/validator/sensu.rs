use super::Validator;
use crate::rules::{
    is_boolean_if_set, is_integer, is_integer_if_set, is_positive_integer, is_string_if_set,
    is_table,
};
use crate::value::Value;

impl Validator {
    /// Validate the top-level `sensu` block.
    ///
    /// `spawn.limit` is required. `keepalives` and `server` are checked when
    /// present.
    pub fn validate_sensu(&mut self, sensu: &Value) {
        if !is_table(sensu) {
            self.invalid(sensu, "sensu must be a hash");
            return;
        }
        self.validate_sensu_spawn(sensu);
        if !sensu.get("keepalives").is_null() {
            self.validate_sensu_keepalives(sensu);
        }
        if sensu.get("server").is_truthy() {
            self.validate_sensu_server(sensu);
        }
        self.check(
            is_boolean_if_set(sensu.get("global_error_handler")),
            sensu,
            "sensu global_error_handler must be boolean",
        );
    }

    fn validate_sensu_spawn(&mut self, sensu: &Value) {
        let spawn = sensu.get("spawn");
        if !is_table(spawn) {
            self.invalid(sensu, "sensu spawn must be a hash");
            return;
        }
        let limit = spawn.get("limit");
        if is_integer(limit) {
            self.check(
                is_positive_integer(limit),
                sensu,
                "sensu spawn limit must be greater than 0",
            );
        } else {
            self.invalid(sensu, "sensu spawn limit must be an integer");
        }
    }

    fn validate_sensu_keepalives(&mut self, sensu: &Value) {
        let keepalives = sensu.get("keepalives");
        if !is_table(keepalives) {
            self.invalid(sensu, "sensu keepalives must be a hash");
            return;
        }
        self.validate_thresholds(sensu, keepalives, "sensu keepalives");
        self.validate_handler_list(sensu, keepalives, "sensu keepalives");
    }

    fn validate_sensu_server(&mut self, sensu: &Value) {
        let server = sensu.get("server");
        if !is_table(server) {
            self.invalid(sensu, "sensu server must be a hash");
            return;
        }
        self.check(
            is_string_if_set(server.get("results_pipe")),
            sensu,
            "sensu server results_pipe must be a string",
        );
        self.check(
            is_string_if_set(server.get("keepalives_pipe")),
            sensu,
            "sensu server keepalives_pipe must be a string",
        );
        self.check(
            is_integer_if_set(server.get("max_message_size")),
            sensu,
            "sensu server max_message_size must be an integer",
        );
    }
}
