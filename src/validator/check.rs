use super::{Validator, AGGREGATE_PATTERN, NAME_PATTERN, SEVERITIES};
use crate::rules::{
    either_is_set, is_array, is_boolean, is_boolean_if_set, is_integer, is_integer_if_set,
    is_numeric_if_set, is_positive_integer, is_string, is_string_if_set, is_table,
    items_are_strings, items_match_regex, matches_regex,
};
use crate::value::Value;

/// Whether `expression` parses as a cron schedule.
///
/// Standard five-field expressions are accepted by assuming a seconds field
/// of `0`.
pub fn is_valid_cron(expression: &str) -> bool {
    let expression = expression.trim();
    let expression = if expression.split_whitespace().count() == 5 {
        format!("0 {}", expression)
    } else {
        expression.to_string()
    };
    expression.parse::<cron::Schedule>().is_ok()
}

/// Hooks are keyed by exit status (`0`-`255`), severity name, or `non-zero`.
fn is_hook_name(name: &str) -> bool {
    let is_status =
        !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) && name.parse::<u8>().is_ok();
    is_status || SEVERITIES.contains(&name) || name == "non-zero"
}

impl Validator {
    /// Validate a check definition.
    pub fn validate_check(&mut self, check: &Value) {
        self.validate_check_name(check);
        self.validate_check_execution(check);
        if check.get("source").is_truthy() {
            self.validate_check_source(check);
        }
        self.validate_check_scheduling(check);
        self.validate_check_handling(check);
        if check.get("ttl").is_truthy() {
            self.validate_check_ttl(check);
        }
        self.validate_check_aggregate(check);
        self.validate_check_flap_detection(check);
        if check.get("proxy_requests").is_truthy() {
            self.validate_check_proxy_requests(check);
        }
        if check.get("hooks").is_truthy() {
            self.validate_check_hooks(check);
        }
        if check.get("subdue").is_truthy() {
            self.validate_time_windows(check, "check", "subdue");
        }
    }

    fn validate_check_name(&mut self, check: &Value) {
        let name = check.get("name");
        self.check(is_string(name), check, "check name must be a string");
        self.check(
            matches_regex(&NAME_PATTERN, name),
            check,
            "check name cannot contain spaces or special characters",
        );
    }

    fn validate_check_execution(&mut self, check: &Value) {
        let command = check.get("command");
        let extension = check.get("extension");
        self.check(is_string_if_set(command), check, "check command must be a string");
        self.check(
            is_string_if_set(extension),
            check,
            "check extension must be a string",
        );
        self.check(
            command.is_null() != extension.is_null(),
            check,
            "either check command or extension must be set",
        );
        self.check(
            is_numeric_if_set(check.get("timeout")),
            check,
            "check timeout must be numeric",
        );
    }

    /// Shared with client keepalives, which carry check attributes.
    pub(super) fn validate_check_source(&mut self, check: &Value) {
        let source = check.get("source");
        if is_string(source) {
            self.check(
                matches_regex(&NAME_PATTERN, source),
                check,
                "check source cannot contain spaces or special characters",
            );
        } else {
            self.invalid(check, "check source must be a string");
        }
    }

    fn validate_check_scheduling(&mut self, check: &Value) {
        let publish = check.get("publish");
        self.check(is_boolean_if_set(publish), check, "check publish must be boolean");
        if publish.as_bool() != Some(false) {
            let cron = check.get("cron");
            if cron.is_null() {
                self.check(
                    is_positive_integer(check.get("interval")),
                    check,
                    "check interval must be an integer greater than 0",
                );
            } else {
                self.validate_check_cron(check, cron);
            }
        }
        let standalone = check.get("standalone");
        self.check(
            is_boolean_if_set(standalone),
            check,
            "check standalone must be boolean",
        );
        if !standalone.is_truthy() {
            let subscribers = check.get("subscribers");
            if is_array(subscribers) {
                self.check(
                    items_are_strings(subscribers),
                    check,
                    "check subscribers must each be a string",
                );
            } else {
                self.invalid(check, "check subscribers must be an array");
            }
        }
    }

    fn validate_check_cron(&mut self, check: &Value, cron: &Value) {
        match cron.as_str() {
            Some(expression) => self.check(
                is_valid_cron(expression),
                check,
                "check cron string must use a valid cron syntax",
            ),
            None => self.invalid(check, "check cron must be a string"),
        }
    }

    fn validate_check_handling(&mut self, check: &Value) {
        self.validate_handler_list(check, check, "check");
    }

    fn validate_check_ttl(&mut self, check: &Value) {
        let ttl = check.get("ttl");
        if is_integer(ttl) {
            self.check(is_positive_integer(ttl), check, "check ttl must be greater than 0");
        } else {
            self.invalid(check, "check ttl must be an integer");
        }
        self.check(
            is_integer_if_set(check.get("ttl_status")),
            check,
            "check ttl_status must be an integer",
        );
    }

    /// Shared with client keepalives.
    pub(super) fn validate_check_aggregate(&mut self, check: &Value) {
        let aggregates = check.get("aggregates");
        if aggregates.is_truthy() {
            if is_array(aggregates) {
                self.check(
                    items_match_regex(&AGGREGATE_PATTERN, aggregates),
                    check,
                    "check aggregates items must be strings without spaces or special characters",
                );
            } else {
                self.invalid(check, "check aggregates must be an array");
            }
        }
        let aggregate = check.get("aggregate");
        if aggregate.is_truthy() {
            if is_string(aggregate) {
                self.check(
                    matches_regex(&AGGREGATE_PATTERN, aggregate),
                    check,
                    "check aggregate cannot contain spaces or special characters",
                );
            } else {
                self.check(
                    is_boolean(aggregate),
                    check,
                    "check aggregate must be a string (name) or boolean",
                );
            }
        }
    }

    /// Shared with client keepalives.
    pub(super) fn validate_check_flap_detection(&mut self, check: &Value) {
        let low = check.get("low_flap_threshold");
        let high = check.get("high_flap_threshold");
        if either_is_set(&[low, high]) {
            self.check(
                is_integer(low),
                check,
                "check low flap threshold must be an integer",
            );
            self.check(
                is_integer(high),
                check,
                "check high flap threshold must be an integer",
            );
        }
    }

    fn validate_check_proxy_requests(&mut self, check: &Value) {
        let proxy_requests = check.get("proxy_requests");
        if !is_table(proxy_requests) {
            self.invalid(check, "check proxy_requests must be a hash");
            return;
        }
        self.check(
            is_table(proxy_requests.get("client_attributes")),
            check,
            "check proxy_requests client_attributes must be a hash",
        );
        self.check(
            is_boolean_if_set(proxy_requests.get("splay")),
            check,
            "check proxy_requests splay must be a boolean",
        );
        self.check(
            is_integer_if_set(proxy_requests.get("splay_coverage")),
            check,
            "check proxy_requests splay_coverage must be an integer",
        );
    }

    fn validate_check_hooks(&mut self, check: &Value) {
        let Some(hooks) = check.get("hooks").as_table() else {
            self.invalid(check, "check hooks must be a hash");
            return;
        };
        for (name, hook) in hooks {
            self.check(
                is_hook_name(name),
                check,
                "check hook names must be a valid exit status code, a severity, or 'non-zero'",
            );
            if !is_table(hook) {
                self.invalid(check, "check hook must be a hash");
                continue;
            }
            self.check(
                is_string(hook.get("command")),
                check,
                "check hook command must be a string",
            );
            self.check(
                is_numeric_if_set(hook.get("timeout")),
                check,
                "check hook timeout must be numeric",
            );
            self.check(
                is_boolean_if_set(hook.get("stdin")),
                check,
                "check hook stdin must be a boolean",
            );
        }
    }
}
