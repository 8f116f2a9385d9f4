use super::{Validator, SEVERITIES};
use crate::rules::{
    is_array, is_array_if_set, is_boolean_if_set, is_integer, is_numeric_if_set, is_one_of,
    is_string, is_string_if_set, is_table, is_table_if_set, items_are_strings,
};
use crate::value::Value;

const HANDLER_TYPES: &[&str] = &["pipe", "tcp", "udp", "transport", "set"];
const PIPE_TYPES: &[&str] = &["direct", "fanout", "topic"];

impl Validator {
    /// Validate a handler definition.
    ///
    /// The `type` selects the type-specific attributes: `command` for pipe,
    /// `socket` for tcp and udp, `pipe` for transport and `handlers` for set.
    pub fn validate_handler(&mut self, handler: &Value) {
        self.validate_handler_type(handler);
        self.validate_handler_filters(handler);
        self.validate_handler_severities(handler);
        self.check(
            is_string_if_set(handler.get("mutator")),
            handler,
            "handler mutator must be a string",
        );
        self.check(
            is_numeric_if_set(handler.get("timeout")),
            handler,
            "handler timeout must be numeric",
        );
        self.check(
            is_boolean_if_set(handler.get("handle_flapping")),
            handler,
            "handler handle_flapping must be boolean",
        );
        if handler.get("subdue").is_truthy() {
            self.validate_time_windows(handler, "handler", "subdue");
        }
    }

    fn validate_handler_type(&mut self, handler: &Value) {
        let kind = handler.get("type");
        self.check(is_string(kind), handler, "handler type must be a string");
        self.check(
            is_one_of(HANDLER_TYPES, kind),
            handler,
            "handler type must be either pipe, tcp, udp, transport, or set",
        );
        match kind.as_str() {
            Some("pipe") => self.check(
                is_string(handler.get("command")),
                handler,
                "handler command must be a string",
            ),
            Some("tcp") | Some("udp") => self.validate_handler_socket(handler),
            Some("transport") => self.validate_handler_pipe(handler),
            Some("set") => self.validate_handler_set(handler),
            _ => {}
        }
    }

    fn validate_handler_socket(&mut self, handler: &Value) {
        let socket = handler.get("socket");
        if !is_table(socket) {
            self.invalid(handler, "handler socket must be a hash");
            return;
        }
        self.check(
            is_string(socket.get("host")),
            handler,
            "handler host must be a string",
        );
        self.check(
            is_integer(socket.get("port")),
            handler,
            "handler port must be an integer",
        );
    }

    fn validate_handler_pipe(&mut self, handler: &Value) {
        let pipe = handler.get("pipe");
        if !is_table(pipe) {
            self.invalid(handler, "handler transport pipe must be a hash");
            return;
        }
        let kind = pipe.get("type");
        self.check(
            is_string(kind),
            handler,
            "handler transport pipe type must be a string",
        );
        self.check(
            is_one_of(PIPE_TYPES, kind),
            handler,
            "handler transport pipe type must be either direct, fanout, or topic",
        );
        self.check(
            is_string(pipe.get("name")),
            handler,
            "handler transport pipe name must be a string",
        );
        self.check(
            is_table_if_set(pipe.get("options")),
            handler,
            "handler transport pipe options must be a hash",
        );
    }

    fn validate_handler_set(&mut self, handler: &Value) {
        let handlers = handler.get("handlers");
        if is_array(handlers) {
            self.check(
                items_are_strings(handlers),
                handler,
                "handler set handlers must each be a string",
            );
        } else {
            self.invalid(handler, "handler set handlers must be an array");
        }
    }

    fn validate_handler_filters(&mut self, handler: &Value) {
        self.check(
            is_string_if_set(handler.get("filter")),
            handler,
            "handler filter must be a string",
        );
        let filters = handler.get("filters");
        self.check(
            is_array_if_set(filters),
            handler,
            "handler filters must be an array",
        );
        if is_array(filters) {
            self.check(
                items_are_strings(filters),
                handler,
                "handler filters items must be strings",
            );
        }
    }

    fn validate_handler_severities(&mut self, handler: &Value) {
        let severities = handler.get("severities");
        self.check(
            is_array_if_set(severities),
            handler,
            "handler severities must be an array",
        );
        if is_array(severities) {
            self.check(
                is_one_of(SEVERITIES, severities),
                handler,
                "handler severities are invalid",
            );
        }
    }
}
