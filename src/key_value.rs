//! Remote key-value store collaborator.
//!
//! The loader never talks to a store itself. It is handed something that
//! implements [`KeyValueStore`] together with the [`KeyValueConfig`] naming
//! where to read from, and merges whatever tree comes back.
//!
//! Stores that expose flat `a/b/c` keys holding JSON text can use
//! [`nest_entries`] to produce that tree.

use thiserror::Error;

use crate::value::{Table, Value};

/// Where and how to reach a key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueConfig {
    /// Store flavour, e.g. `consul` or `etcd`.
    pub store_type: String,
    pub url: String,
    /// Key prefix under which the settings live.
    pub chroot: String,
    /// Access token or credentials, passed through untouched.
    pub auth: Option<String>,
}

impl KeyValueConfig {
    pub fn new(store_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            store_type: store_type.into(),
            url: url.into(),
            chroot: "/".to_string(),
            auth: None,
        }
    }

    pub fn chroot(mut self, chroot: impl Into<String>) -> Self {
        self.chroot = chroot.into();
        self
    }

    pub fn auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }
}

/// Errors a [`KeyValueStore`] may return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyValueError {
    /// Nothing is stored under the path. Treated as an empty tree.
    #[error("the {path} key was not found")]
    NotFound { path: String },

    /// A stored value is not JSON.
    #[error("the {path} key does not hold valid json: {error}")]
    InvalidJson { path: String, error: String },
}

/// Read access to a key-value store.
pub trait KeyValueStore {
    /// Read the tree stored under `path`, relative to `config.chroot`.
    /// `None` reads the whole chroot.
    fn read(&self, config: &KeyValueConfig, path: Option<&str>) -> Result<Value, KeyValueError>;
}

/// Build a nested table from flat `key = json text` entries.
///
/// `root` is stripped from the front of every key, the remainder is split
/// on `/`, and each parsed value is placed at that path. Tables from
/// different keys are merged; for anything else the later entry wins.
///
/// # Example
///
/// ```
/// use sensu_settings::key_value::nest_entries;
///
/// let tree = nest_entries(
///     "sensu/",
///     [("sensu/checks/disk/interval", "60"), ("sensu/checks/disk/command", "\"check-disk\"")],
/// )
/// .unwrap();
/// assert_eq!(tree.get_path("checks.disk.interval").and_then(|v| v.as_integer()), Some(60));
/// ```
pub fn nest_entries<I, K, V>(root: &str, entries: I) -> Result<Value, KeyValueError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut tree = Value::table();
    for (key, text) in entries {
        let key = key.as_ref();
        let parsed: serde_json::Value =
            serde_json::from_str(text.as_ref()).map_err(|e| KeyValueError::InvalidJson {
                path: key.to_string(),
                error: e.to_string(),
            })?;
        let relative = key.strip_prefix(root).unwrap_or(key);
        let parts: Vec<&str> = relative.split('/').filter(|p| !p.is_empty()).collect();
        let nested = parts
            .iter()
            .rev()
            .fold(Value::from(parsed), |inner, part| {
                let mut table = Table::new();
                table.insert(part.to_string(), inner);
                Value::Table(table)
            });
        tree = overlay(tree, nested);
    }
    Ok(tree)
}

fn overlay(base: Value, incoming: Value) -> Value {
    match (base, incoming) {
        (Value::Table(mut base), Value::Table(incoming)) => {
            for (key, value) in incoming {
                let merged = match base.remove(&key) {
                    Some(existing) => overlay(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Table(base)
        }
        (_, incoming) => incoming,
    }
}
