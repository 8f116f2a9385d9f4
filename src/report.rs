//! Human-readable rendering of validation failures and loader diagnostics.
//!
//! # Output Format
//!
//! ```text
//! Settings validation failures (3):
//!
//!   check disk:
//!     • check interval must be an integer greater than 0
//!     • check subscribers must be an array
//!
//!   settings:
//!     • transport must be a hash
//! ```
//!
//! Definition objects are shown after each failure when
//! [`ReportOptions::show_objects`] is set, with sensitive attributes
//! redacted and long objects truncated.

use std::collections::BTreeMap;
use std::io::Write;

use stillwater::Validation;

use crate::error::{Diagnostic, Failure, Failures, SettingsValidation};
use crate::value::{Table, Value};

/// Attribute names whose values are never printed.
pub const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "passwd",
    "pass",
    "api_key",
    "api_token",
    "access_key",
    "secret_key",
    "private_key",
    "secret",
    "token",
];

const REDACTED: &str = "REDACTED";

/// Options for rendering reports.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub color: ColorOption,
    /// Group failures under the name of the definition they belong to.
    pub group_by_definition: bool,
    /// Print the offending object below each failure.
    pub show_objects: bool,
    /// Maximum entries to display (None for all).
    pub max_entries: Option<usize>,
    /// Objects longer than this many characters are cut short.
    pub max_object_len: usize,
    pub redact_sensitive: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            color: ColorOption::Auto,
            group_by_definition: true,
            show_objects: false,
            max_entries: Some(20),
            max_object_len: 120,
            redact_sensitive: true,
        }
    }
}

impl ReportOptions {
    pub fn no_color() -> Self {
        Self {
            color: ColorOption::Never,
            ..Default::default()
        }
    }

    /// Show every entry, without truncation.
    pub fn show_all() -> Self {
        Self {
            max_entries: None,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: ColorOption) -> Self {
        self.color = color;
        self
    }

    pub fn with_grouping(mut self, group: bool) -> Self {
        self.group_by_definition = group;
        self
    }

    pub fn with_objects(mut self, show: bool) -> Self {
        self.show_objects = show;
        self
    }

    pub fn with_max_entries(mut self, max: Option<usize>) -> Self {
        self.max_entries = max;
        self
    }

    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact_sensitive = redact;
        self
    }
}

/// Color output option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOption {
    /// Color when stderr is a terminal.
    Auto,
    Always,
    Never,
}

struct Colors {
    error: &'static str,
    warning: &'static str,
    info: &'static str,
    value: &'static str,
    reset: &'static str,
}

impl Colors {
    fn enabled() -> Self {
        Self {
            error: "\x1b[1;31m",
            warning: "\x1b[1;33m",
            info: "\x1b[1;36m",
            value: "\x1b[33m",
            reset: "\x1b[0m",
        }
    }

    fn disabled() -> Self {
        Self {
            error: "",
            warning: "",
            info: "",
            value: "",
            reset: "",
        }
    }
}

struct Printer<'a> {
    options: &'a ReportOptions,
    colors: Colors,
}

impl<'a> Printer<'a> {
    fn new(options: &'a ReportOptions, use_color: bool) -> Self {
        let colors = if use_color {
            Colors::enabled()
        } else {
            Colors::disabled()
        };
        Self { options, colors }
    }

    fn print_failures(&self, failures: &Failures, writer: &mut dyn Write) {
        let c = &self.colors;
        writeln!(
            writer,
            "\n{}Settings validation failures ({}):{}\n",
            c.error,
            failures.len(),
            c.reset
        )
        .ok();

        if self.options.group_by_definition {
            self.print_grouped(failures, writer);
        } else {
            let all: Vec<&Failure> = failures.iter().collect();
            if !self.print_entries(&all, 0, failures.len(), writer) {
                writeln!(writer).ok();
            }
        }
    }

    fn print_grouped(&self, failures: &Failures, writer: &mut dyn Write) {
        let c = &self.colors;
        let mut groups: BTreeMap<String, Vec<&Failure>> = BTreeMap::new();
        for failure in failures.iter() {
            groups.entry(group_label(failure)).or_default().push(failure);
        }

        let mut shown = 0;
        for (label, group) in groups {
            writeln!(writer, "  {}{}:{}", c.info, label, c.reset).ok();
            if self.print_entries(&group, shown, failures.len(), writer) {
                return;
            }
            shown += group.len();
            writeln!(writer).ok();
        }
    }

    /// Returns true once the entry limit cut the listing short.
    fn print_entries(
        &self,
        failures: &[&Failure],
        already_shown: usize,
        total: usize,
        writer: &mut dyn Write,
    ) -> bool {
        let c = &self.colors;
        for (i, failure) in failures.iter().enumerate() {
            let shown = already_shown + i;
            if self.options.max_entries.is_some_and(|max| shown >= max) {
                writeln!(
                    writer,
                    "\n  {}...and {} more failures{}\n",
                    c.warning,
                    total - shown,
                    c.reset
                )
                .ok();
                return true;
            }
            writeln!(writer, "    {}•{} {}", c.error, c.reset, failure.message).ok();
            if let (true, Some(object)) = (self.options.show_objects, &failure.object) {
                writeln!(
                    writer,
                    "      {}{}{}",
                    c.value,
                    self.render_object(object),
                    c.reset
                )
                .ok();
            }
        }
        false
    }

    fn print_diagnostics(&self, title: &str, diagnostics: &[Diagnostic], writer: &mut dyn Write) {
        let c = &self.colors;
        writeln!(writer, "\n{}{} ({}):{}\n", c.warning, title, diagnostics.len(), c.reset).ok();
        for (shown, diagnostic) in diagnostics.iter().enumerate() {
            if self.options.max_entries.is_some_and(|max| shown >= max) {
                writeln!(
                    writer,
                    "\n  {}...and {} more{}\n",
                    c.warning,
                    diagnostics.len() - shown,
                    c.reset
                )
                .ok();
                return;
            }
            write!(writer, "    {}•{} {}", c.info, c.reset, diagnostic.message).ok();
            for (key, value) in &diagnostic.context {
                write!(writer, " {}={}{}{}", key, c.value, self.render_object(value), c.reset)
                    .ok();
            }
            writeln!(writer).ok();
        }
        writeln!(writer).ok();
    }

    fn render_object(&self, object: &Value) -> String {
        let text = if self.options.redact_sensitive {
            redact(object).to_string()
        } else {
            object.to_string()
        };
        truncate(&text, self.options.max_object_len)
    }
}

fn group_label(failure: &Failure) -> String {
    let Some(object) = &failure.object else {
        return "settings".to_string();
    };
    let kind = failure.message.split_whitespace().next().unwrap_or("definition");
    match object.get("name").as_str() {
        Some(name) => format!("{} {}", kind, name),
        None => kind.to_string(),
    }
}

/// Copy of `value` with every sensitive attribute replaced.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Table(table) => Value::Table(
            table
                .iter()
                .map(|(key, value)| {
                    let value = if is_sensitive_key(key) {
                        Value::from(REDACTED)
                    } else {
                        redact(value)
                    };
                    (key.clone(), value)
                })
                .collect::<Table>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_KEYS.contains(&lower.as_str())
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn should_use_color(color: ColorOption) -> bool {
    match color {
        ColorOption::Always => true,
        ColorOption::Never => false,
        ColorOption::Auto => {
            use std::io::IsTerminal;
            std::io::stderr().is_terminal()
        }
    }
}

fn string_color(color: ColorOption) -> bool {
    color == ColorOption::Always
}

impl Failures {
    /// Print the failures to stderr.
    pub fn report(&self, options: &ReportOptions) {
        let printer = Printer::new(options, should_use_color(options.color));
        printer.print_failures(self, &mut std::io::stderr());
    }

    /// Render the failures to a string. `Auto` color renders plain.
    pub fn format(&self, options: &ReportOptions) -> String {
        let printer = Printer::new(options, string_color(options.color));
        let mut buf = Vec::new();
        printer.print_failures(self, &mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }
}

/// Render loader warnings or errors under `title`.
pub fn format_diagnostics(
    title: &str,
    diagnostics: &[Diagnostic],
    options: &ReportOptions,
) -> String {
    let printer = Printer::new(options, string_color(options.color));
    let mut buf = Vec::new();
    printer.print_diagnostics(title, diagnostics, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Unwrap a [`SettingsValidation`], reporting failures.
pub trait ValidationExt<T> {
    /// Unwrap or report failures to stderr and exit with code 1.
    fn unwrap_or_exit(self) -> T;

    fn unwrap_or_exit_with(self, options: &ReportOptions) -> T;

    /// Convert to `Result`, reporting failures but not exiting.
    fn unwrap_or_report(self) -> Result<T, Failures>;
}

impl<T> ValidationExt<T> for SettingsValidation<T> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_exit_with(&ReportOptions::default())
    }

    fn unwrap_or_exit_with(self, options: &ReportOptions) -> T {
        match self {
            Validation::Success(value) => value,
            Validation::Failure(failures) => {
                failures.report(options);
                std::process::exit(1);
            }
        }
    }

    fn unwrap_or_report(self) -> Result<T, Failures> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(failures) => {
                failures.report(&ReportOptions::default());
                Err(failures)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(json: serde_json::Value) -> Option<Value> {
        Some(Value::from(json))
    }

    fn sample() -> Failures {
        Failures::from_vec(vec![
            Failure::new(
                check(json!({"name": "disk", "command": "check-disk"})),
                "check interval must be an integer greater than 0",
            ),
            Failure::new(
                check(json!({"name": "disk", "command": "check-disk"})),
                "check subscribers must be an array",
            ),
            Failure::new(None, "transport must be a hash"),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_header_and_groups() {
        let output = sample().format(&ReportOptions::no_color());
        assert!(output.contains("Settings validation failures (3):"));
        assert!(output.contains("  check disk:"));
        assert!(output.contains("  settings:"));
        assert!(output.contains("• transport must be a hash"));
    }

    #[test]
    fn test_flat_output_without_grouping() {
        let output = sample().format(&ReportOptions::no_color().with_grouping(false));
        assert!(!output.contains("check disk:"));
        assert!(output.contains("• check subscribers must be an array"));
    }

    #[test]
    fn test_truncation_with_max_entries() {
        let output = sample().format(&ReportOptions::no_color().with_max_entries(Some(1)));
        assert!(output.contains("...and 2 more failures"));
        assert!(!output.contains("transport must be a hash"));
    }

    #[test]
    fn test_objects_are_redacted() {
        let failures = Failures::single(Failure::new(
            check(json!({"name": "mail", "type": "pipe", "options": {"password": "hunter2"}})),
            "handler command must be a string",
        ));
        let options = ReportOptions::no_color().with_objects(true);
        let output = failures.format(&options);
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("hunter2"));

        let output = failures.format(&options.with_redaction(false));
        assert!(output.contains("hunter2"));
    }

    #[test]
    fn test_long_objects_are_truncated() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long, 10), format!("{}...", "x".repeat(10)));
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_color_always_and_never() {
        let colored = sample().format(&ReportOptions::default().with_color(ColorOption::Always));
        assert!(colored.contains("\x1b["));
        let plain = sample().format(&ReportOptions::default().with_color(ColorOption::Auto));
        assert!(!plain.contains("\x1b["));
    }

    #[test]
    fn test_format_diagnostics() {
        let warnings = vec![
            Diagnostic::new("loading config file").with("file", "/etc/sensu/config.json"),
            Diagnostic::new("using redis url environment variable")
                .with("redis", "redis://localhost"),
        ];
        let output = format_diagnostics("Settings warnings", &warnings, &ReportOptions::no_color());
        assert!(output.contains("Settings warnings (2):"));
        assert!(output.contains("loading config file file=\"/etc/sensu/config.json\""));
    }

    #[test]
    fn test_redact_nested() {
        let value = Value::from(json!({
            "api": {"user": "admin", "password": "secret"},
            "list": [{"token": "t"}]
        }));
        assert_eq!(
            redact(&value),
            Value::from(json!({
                "api": {"user": "admin", "password": "REDACTED"},
                "list": [{"token": "REDACTED"}]
            }))
        );
    }

    #[test]
    fn test_unwrap_or_report() {
        let ok: SettingsValidation<u8> = Validation::Success(3);
        assert_eq!(ok.unwrap_or_report().unwrap(), 3);

        let failed: SettingsValidation<u8> = Validation::Failure(sample());
        assert_eq!(failed.unwrap_or_report().unwrap_err().len(), 3);
    }
}
