//! Rule-based validation of a settings tree.
//!
//! The [`Validator`] walks the tree, dispatches every definition to the
//! validator of its category and collects one [`Failure`] per violated rule.
//! Nothing short-circuits: a single malformed definition can produce many
//! failures, and a fully empty tree still yields a complete report.
//!
//! # Example
//!
//! ```
//! use sensu_settings::{Role, Validator, Value};
//! use serde_json::json;
//!
//! let settings = Value::from(json!({
//!     "sensu": {"spawn": {"limit": 12}},
//!     "transport": {"name": "rabbitmq"},
//!     "checks": {"disk": {"command": "check-disk", "interval": 60, "subscribers": ["linux"]}},
//!     "filters": {}, "mutators": {}, "handlers": {}, "extensions": {}
//! }));
//!
//! let mut validator = Validator::new();
//! assert!(validator.run(&settings, Role::Server).is_empty());
//! ```

mod agent;
mod api;
mod check;
mod client;
mod extension;
mod filter;
mod handler;
mod mutator;
mod sensu;
mod tessen;
mod time_window;
mod transport;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{into_validation, Failure, SettingsValidation};
use crate::rules;
use crate::role::Role;
use crate::value::Value;

/// Names of checks, clients and check sources.
pub(crate) static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+$").expect("name pattern is valid"));

/// Aggregate names may also carry `:` and `|` for token substitution.
pub(crate) static AGGREGATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.:|-]+$").expect("aggregate pattern is valid"));

pub(crate) const SEVERITIES: &[&str] = &["ok", "warning", "critical", "unknown"];

/// Signature shared by every definition validator.
pub type DefinitionValidator = fn(&mut Validator, &Value);

/// The plural settings categories, each a table of named definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Checks,
    Filters,
    Mutators,
    Handlers,
    Extensions,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Checks,
        Category::Filters,
        Category::Mutators,
        Category::Handlers,
        Category::Extensions,
    ];

    /// The top-level settings key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Checks => "checks",
            Category::Filters => "filters",
            Category::Mutators => "mutators",
            Category::Handlers => "handlers",
            Category::Extensions => "extensions",
        }
    }

    /// The name of one definition in this category.
    pub fn singular(&self) -> &'static str {
        match self {
            Category::Checks => "check",
            Category::Filters => "filter",
            Category::Mutators => "mutator",
            Category::Handlers => "handler",
            Category::Extensions => "extension",
        }
    }

    /// The validator applied to each definition of this category.
    pub fn validator(&self) -> DefinitionValidator {
        match self {
            Category::Checks => Validator::validate_check,
            Category::Filters => Validator::validate_filter,
            Category::Mutators => Validator::validate_mutator,
            Category::Handlers => Validator::validate_handler,
            Category::Extensions => Validator::validate_extension,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulates validation failures across any number of `validate_*` calls.
#[derive(Debug, Default)]
pub struct Validator {
    failures: Vec<Failure>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a whole settings tree for `role`.
    ///
    /// The `sensu` and `transport` blocks and every plural category are
    /// always checked. The role then selects the singleton blocks:
    /// `client` for [`Role::Client`], `client` with agent rules for
    /// [`Role::Agent`], `api` for [`Role::Api`], and both `client` and
    /// `api` for [`Role::Test`]. A `tessen` block is checked when present.
    ///
    /// Returns every failure accumulated so far.
    pub fn run(&mut self, settings: &Value, role: Role) -> &[Failure] {
        self.validate_sensu(settings.get("sensu"));
        self.validate_transport(settings.get("transport"));
        for category in Category::ALL {
            self.validate_category(category, settings.get(category.as_str()));
        }
        match role {
            Role::Client => self.validate_client(settings.get("client")),
            Role::Agent => self.validate_agent(settings.get("client")),
            Role::Api => self.validate_api(settings.get("api")),
            Role::Test => {
                self.validate_client(settings.get("client"));
                self.validate_api(settings.get("api"));
            }
            Role::Server => {}
        }
        let tessen = settings.get("tessen");
        if !tessen.is_null() {
            self.validate_tessen(tessen);
        }
        &self.failures
    }

    /// Validate every definition of one category.
    ///
    /// Each definition is validated with its table key injected as `name`.
    pub fn validate_category(&mut self, category: Category, definitions: &Value) {
        let Some(definitions) = definitions.as_table() else {
            self.invalid(definitions, format!("{} must be a hash", category));
            return;
        };
        let validate = category.validator();
        for (name, definition) in definitions {
            if definition.is_table() {
                let mut definition = definition.clone();
                definition.insert("name", name.as_str());
                validate(self, &definition);
            } else {
                self.invalid(definition, format!("{} must be a hash", category.singular()));
            }
        }
    }

    /// Failures accumulated so far.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Clear accumulated failures, returning how many there were.
    pub fn reset(&mut self) -> usize {
        let count = self.failures.len();
        self.failures.clear();
        count
    }

    /// Consume the validator, returning its failures.
    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    /// Record a failure against `object`.
    pub(crate) fn invalid(&mut self, object: &Value, message: impl Into<String>) {
        let object = (!object.is_null()).then(|| object.clone());
        self.failures.push(Failure::new(object, message));
    }

    /// Record `message` unless `valid` holds.
    pub(crate) fn check(&mut self, valid: bool, object: &Value, message: &str) {
        if !valid {
            self.invalid(object, message);
        }
    }

    /// Validate the optional `handler` / `handlers` pair of `block`.
    pub(crate) fn validate_handler_list(&mut self, object: &Value, block: &Value, prefix: &str) {
        if !rules::is_string_if_set(block.get("handler")) {
            self.invalid(object, format!("{} handler must be a string", prefix));
        }
        let handlers = block.get("handlers");
        if !rules::is_array_if_set(handlers) {
            self.invalid(object, format!("{} handlers must be an array", prefix));
        } else if rules::is_array(handlers) && !rules::items_are_strings(handlers) {
            self.invalid(object, format!("{} handlers must each be a string", prefix));
        }
    }

    /// Validate optional keepalive `thresholds` of `block`.
    pub(crate) fn validate_thresholds(&mut self, object: &Value, block: &Value, prefix: &str) {
        let thresholds = block.get("thresholds");
        if !rules::is_table_if_set(thresholds) {
            self.invalid(object, format!("{} thresholds must be a hash", prefix));
            return;
        }
        for level in ["warning", "critical"] {
            if !rules::is_integer_if_set(thresholds.get(level)) {
                self.invalid(
                    object,
                    format!("{} {} threshold must be an integer", prefix, level),
                );
            }
        }
    }
}

/// Validate `settings` for `role`, accumulating every failure.
pub fn validate_settings(settings: &Value, role: Role) -> SettingsValidation<()> {
    let mut validator = Validator::new();
    validator.run(settings, role);
    into_validation(validator.into_failures())
}
