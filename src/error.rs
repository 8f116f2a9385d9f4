//! Error, warning and failure types for settings loading and validation.
//!
//! Two disjoint taxonomies live here:
//!
//! - [`LoadError`]: fatal to the `load_*` call that produced it.
//! - [`Failure`]: one schema violation found by the validator. Failures are
//!   data, accumulated exhaustively and never raised.
//!
//! [`Diagnostic`] is the structured `{message, context}` record the loader
//! keeps for both its warnings and its errors.

use std::collections::BTreeMap;
use std::fmt;

use stillwater::{NonEmptyVec, Semigroup, Validation};
use thiserror::Error;

use crate::value::Value;

/// A fatal error raised by one of the loader's `load_*` operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// A required config file is missing or unreadable.
    #[error("config file does not exist or is not readable: {file}")]
    FileNotReadable { file: String },

    /// A config file did not parse as JSON.
    #[error("config file must be valid json: {file}: {error}")]
    InvalidJson { file: String, error: String },

    /// A config file parsed, but its top level is not an object.
    #[error("config file must contain a json object: {file}")]
    NotAnObject { file: String },

    /// A config directory could not be listed.
    #[error("insufficient permissions for loading: {directory}")]
    DirectoryNotReadable { directory: String },

    /// The loaded files manifest could not be written.
    #[error("unable to write loaded files manifest: {file}: {error}")]
    ManifestNotWritable { file: String, error: String },

    /// The key-value store returned content that is not JSON.
    #[error("config from key-value store must be valid json: {store_type} {url} at chroot {chroot}: {error}")]
    KeyValue {
        store_type: String,
        url: String,
        chroot: String,
        error: String,
    },
}

impl LoadError {
    /// The operator-facing message, without the context values.
    pub fn message(&self) -> &'static str {
        match self {
            LoadError::FileNotReadable { .. } => "config file does not exist or is not readable",
            LoadError::InvalidJson { .. } => "config file must be valid json",
            LoadError::NotAnObject { .. } => "config file must contain a json object",
            LoadError::DirectoryNotReadable { .. } => "insufficient permissions for loading",
            LoadError::ManifestNotWritable { .. } => "unable to write loaded files manifest",
            LoadError::KeyValue { .. } => "config from key-value store must be valid json",
        }
    }

    /// The error as the loader records it in its error list.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.message());
        match self {
            LoadError::FileNotReadable { file } | LoadError::NotAnObject { file } => {
                diagnostic.with("file", file.as_str())
            }
            LoadError::InvalidJson { file, error }
            | LoadError::ManifestNotWritable { file, error } => diagnostic
                .with("file", file.as_str())
                .with("error", error.as_str()),
            LoadError::DirectoryNotReadable { directory } => {
                diagnostic.with("directory", directory.as_str())
            }
            LoadError::KeyValue {
                store_type,
                url,
                chroot,
                error,
            } => diagnostic
                .with("type", store_type.as_str())
                .with("url", url.as_str())
                .with("chroot", chroot.as_str())
                .with("error", error.as_str()),
        }
    }
}

/// A structured warning or error record.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub context: BTreeMap<String, Value>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Attach a context value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Look up a context value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for (key, value) in &self.context {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// One violated validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// The definition being validated, or `None` for tree-level failures.
    pub object: Option<Value>,
    pub message: String,
}

impl Failure {
    pub fn new(object: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            object,
            message: message.into(),
        }
    }

    /// The failure as the loader records it in its error list.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.message.as_str());
        match &self.object {
            Some(object) => diagnostic.with("object", object.clone()),
            None => diagnostic,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            Some(object) => write!(f, "{}: {}", self.message, object),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A non-empty collection of validation failures.
#[derive(Debug, Clone)]
pub struct Failures(pub NonEmptyVec<Failure>);

impl Failures {
    pub fn single(failure: Failure) -> Self {
        Self(NonEmptyVec::singleton(failure))
    }

    /// Returns `None` if `failures` is empty.
    pub fn from_vec(failures: Vec<Failure>) -> Option<Self> {
        NonEmptyVec::from_vec(failures).map(Self)
    }

    pub fn first(&self) -> &Failure {
        self.0.head()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Failure> {
        self.0.iter()
    }

    /// Failure messages in the order they were found.
    pub fn messages(&self) -> Vec<&str> {
        self.iter().map(|f| f.message.as_str()).collect()
    }
}

impl Semigroup for Failures {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<Failure> for Failures {
    fn from(failure: Failure) -> Self {
        Self::single(failure)
    }
}

impl IntoIterator for Failures {
    type Item = Failure;
    type IntoIter = std::vec::IntoIter<Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl fmt::Display for Failures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings validation failures ({}):", self.len())?;
        for failure in self.iter() {
            writeln!(f, "  {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for Failures {}

/// The accumulated result of validating a settings tree.
pub type SettingsValidation<T> = Validation<T, Failures>;

/// Turn a failure list into a `Validation`.
pub fn into_validation(failures: Vec<Failure>) -> SettingsValidation<()> {
    match Failures::from_vec(failures) {
        Some(failures) => Validation::Failure(failures),
        None => Validation::Success(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::FileNotReadable {
            file: "/etc/sensu/config.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "config file does not exist or is not readable: /etc/sensu/config.json"
        );
    }

    #[test]
    fn test_load_error_to_diagnostic() {
        let err = LoadError::InvalidJson {
            file: "bad.json".to_string(),
            error: "expected value at line 1 column 1".to_string(),
        };
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.message, "config file must be valid json");
        assert_eq!(diagnostic.get("file"), Some(&Value::from("bad.json")));
        assert!(diagnostic.get("error").is_some());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new("loading config file").with("file", "a.json");
        assert_eq!(diagnostic.to_string(), "loading config file file=\"a.json\"");
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure::new(None, "checks must be a hash");
        assert_eq!(failure.to_string(), "checks must be a hash");
    }

    #[test]
    fn test_failure_to_diagnostic_keeps_object() {
        let object = Value::from("cat");
        let diagnostic =
            Failure::new(Some(object.clone()), "mutator must be a hash").to_diagnostic();
        assert_eq!(diagnostic.message, "mutator must be a hash");
        assert_eq!(diagnostic.get("object"), Some(&object));
        assert!(Failure::new(None, "x").to_diagnostic().context.is_empty());
    }

    #[test]
    fn test_failures_combine() {
        let a = Failures::single(Failure::new(None, "a"));
        let b = Failures::single(Failure::new(None, "b"));
        let combined = a.combine(b);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.messages(), vec!["a", "b"]);
    }

    #[test]
    fn test_into_validation() {
        assert!(into_validation(vec![]).is_success());
        assert!(into_validation(vec![Failure::new(None, "x")]).is_failure());
    }
}
