use super::{Validator, NAME_PATTERN};
use crate::rules::{
    at_most_one_is_set, either_is_set, is_array, is_array_if_set, is_boolean_if_set,
    is_integer_if_set, is_numeric_if_set, is_string, is_string_if_set, is_table, is_table_if_set,
    items_are_strings, matches_regex, matches_regex_if_set,
};
use crate::value::Value;

impl Validator {
    /// Validate the `client` block of an agent service.
    ///
    /// An agent may stand in for another entity (`represents`) or discover
    /// entities (`discovery`), but not both.
    pub fn validate_agent(&mut self, agent: &Value) {
        if !is_table(agent) {
            self.invalid(agent, "agent must be a hash");
            return;
        }
        let name = agent.get("name");
        self.check(is_string(name), agent, "agent name must be a string");
        self.check(
            matches_regex(&NAME_PATTERN, name),
            agent,
            "agent name cannot contain spaces or special characters",
        );
        self.check(
            is_string(agent.get("address")),
            agent,
            "agent address must be a string",
        );
        self.check(
            at_most_one_is_set(&[agent.get("represents"), agent.get("discovery")]),
            agent,
            "agent cannot have both a represents and a discovery section",
        );
        self.check(
            is_boolean_if_set(agent.get("safe_mode")),
            agent,
            "agent safe_mode must be boolean",
        );
        self.validate_agent_socket(agent);
        self.validate_agent_represents(agent);
        self.validate_agent_discovery(agent);
        self.validate_agent_subscriptions(agent);
        self.validate_agent_keepalive(agent);
        self.validate_agent_redact(agent);
    }

    fn validate_agent_socket(&mut self, agent: &Value) {
        let socket = agent.get("socket");
        if !is_table_if_set(socket) {
            self.invalid(agent, "agent socket must be a hash");
            return;
        }
        self.check(
            is_string_if_set(socket.get("bind")),
            agent,
            "agent socket bind must be a string",
        );
        self.check(
            is_integer_if_set(socket.get("port")),
            agent,
            "agent socket port must be an integer",
        );
    }

    fn validate_agent_represents(&mut self, agent: &Value) {
        let represents = agent.get("represents");
        if !is_table_if_set(represents) {
            self.invalid(agent, "agent represents must be a hash");
            return;
        }
        if represents.is_null() {
            return;
        }
        let name = represents.get("name");
        let address = represents.get("address");
        self.check(
            either_is_set(&[name, address]),
            agent,
            "agent represents must include a name or an address",
        );
        self.check(
            is_string_if_set(name),
            agent,
            "agent represents name must be a string",
        );
        self.check(
            matches_regex_if_set(&NAME_PATTERN, name),
            agent,
            "agent represents name cannot contain spaces or special characters",
        );
        self.check(
            is_string_if_set(address),
            agent,
            "agent represents address must be a string",
        );
    }

    fn validate_agent_discovery(&mut self, agent: &Value) {
        let discovery = agent.get("discovery");
        if !is_table_if_set(discovery) {
            self.invalid(agent, "agent discovery must be a hash");
            return;
        }
        if discovery.is_null() {
            return;
        }
        let command = discovery.get("command");
        let extension = discovery.get("extension");
        self.check(
            either_is_set(&[command, extension]),
            agent,
            "agent discovery must include a command or an extension",
        );
        self.check(
            is_string_if_set(command),
            agent,
            "agent discovery command must be a string",
        );
        self.check(
            is_string_if_set(extension),
            agent,
            "agent discovery extension must be a string",
        );
        self.check(
            is_numeric_if_set(discovery.get("timeout")),
            agent,
            "agent discovery timeout must be numeric",
        );
        self.check(
            is_numeric_if_set(discovery.get("interval")),
            agent,
            "agent discovery interval must be numeric",
        );
    }

    fn validate_agent_subscriptions(&mut self, agent: &Value) {
        let subscriptions = agent.get("subscriptions");
        if is_array(subscriptions) {
            self.check(
                items_are_strings(subscriptions),
                agent,
                "agent subscriptions must each be a string",
            );
        } else {
            self.invalid(agent, "agent subscriptions must be an array");
        }
    }

    fn validate_agent_keepalive(&mut self, agent: &Value) {
        let keepalive = agent.get("keepalive");
        if !is_table_if_set(keepalive) {
            self.invalid(agent, "agent keepalive must be a hash");
            return;
        }
        if keepalive.is_table() {
            self.validate_handler_list(agent, keepalive, "agent keepalive");
            self.validate_thresholds(agent, keepalive, "agent keepalive");
        }
    }

    fn validate_agent_redact(&mut self, agent: &Value) {
        let redact = agent.get("redact");
        self.check(
            is_array_if_set(redact),
            agent,
            "agent redact must be an array",
        );
        if is_array(redact) {
            self.check(
                items_are_strings(redact),
                agent,
                "agent redact keys must each be a string",
            );
        }
    }
}
