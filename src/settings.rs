//! One-call settings loading.
//!
//! [`SettingsBuilder`] runs the whole load pipeline in its fixed order:
//! environment, config file, config directories, key-value store, role
//! overrides, then the loaded files manifest.

use std::path::PathBuf;

use tracing::info;

use crate::env::{ConfigEnv, RealEnv};
use crate::error::LoadError;
use crate::key_value::{KeyValueConfig, KeyValueStore};
use crate::loader::Loader;
use crate::role::Role;

/// Builder for a fully loaded [`Loader`].
///
/// # Example
///
/// ```
/// use sensu_settings::{MockEnv, Role, SettingsBuilder};
///
/// let env = MockEnv::new()
///     .with_file("/etc/sensu/config.json", r#"{"api": {"port": 4567}}"#)
///     .with_directory("/etc/sensu/conf.d")
///     .with_file(
///         "/etc/sensu/conf.d/check_disk.json",
///         r#"{"checks": {"disk": {"command": "check-disk", "interval": 60, "standalone": true}}}"#,
///     );
///
/// let loader = SettingsBuilder::new()
///     .role(Role::Api)
///     .file("/etc/sensu/config.json")
///     .directory("/etc/sensu/conf.d")
///     .build_with_env(&env)
///     .unwrap();
///
/// assert!(loader.check_exists("disk"));
/// assert_eq!(loader.loaded_files().len(), 2);
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    role: Role,
    file: Option<PathBuf>,
    directories: Vec<PathBuf>,
    key_value: Option<(Box<dyn KeyValueStore>, KeyValueConfig)>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service role, `Role::Server` by default.
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// The primary config file. It must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Add a directory of config files. Directories load in the order added.
    pub fn directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.directories.push(path.into());
        self
    }

    /// Add several directories of config files.
    pub fn directories<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.directories.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Merge settings from a key-value store after the files.
    pub fn key_value<S: KeyValueStore + 'static>(
        mut self,
        store: S,
        config: KeyValueConfig,
    ) -> Self {
        self.key_value = Some((Box::new(store), config));
        self
    }

    /// Load using the real environment.
    pub fn build(self) -> Result<Loader, LoadError> {
        self.build_with_env(&RealEnv::new())
    }

    /// Load using a custom environment.
    ///
    /// The first load error stops the pipeline and is returned.
    pub fn build_with_env(self, env: &dyn ConfigEnv) -> Result<Loader, LoadError> {
        let mut loader = Loader::new(self.role, env);
        loader.load_env(env);
        if let Some(file) = &self.file {
            loader.load_file(env, file, true)?;
        }
        for directory in &self.directories {
            loader.load_directory(env, directory)?;
        }
        if let Some((store, config)) = &self.key_value {
            loader.load_key_value(store.as_ref(), config)?;
        }
        loader.load_overrides();
        loader.set_env(env)?;
        info!(
            role = %self.role,
            files = loader.loaded_files().len(),
            warnings = loader.warnings().len(),
            "settings loaded"
        );
        Ok(loader)
    }
}
