//! ConfigEnv trait for testable I/O.
//!
//! Every side effect the loader performs (reading files, walking config
//! directories, reading and exporting environment variables, writing the
//! loaded-files manifest, detecting the local host) goes through
//! [`ConfigEnv`], so the whole pipeline can run against [`MockEnv`] in tests.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::net::{IpAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::RwLock;

/// Environment trait for settings I/O operations.
///
/// # Example
///
/// ```
/// use sensu_settings::{MockEnv, Role, SettingsBuilder};
///
/// let env = MockEnv::new()
///     .with_file("/etc/sensu/config.json", r#"{"api": {"port": 4567}}"#)
///     .with_env("SENSU_TRANSPORT_NAME", "redis");
///
/// let loader = SettingsBuilder::new()
///     .role(Role::Api)
///     .file("/etc/sensu/config.json")
///     .build_with_env(&env)
///     .unwrap();
///
/// assert_eq!(loader.get_path("transport.name").and_then(|v| v.as_str()), Some("redis"));
/// ```
pub trait ConfigEnv: Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if the file does not exist, is not valid UTF-8,
    /// or cannot be read.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Check if a file exists.
    fn file_exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory.
    fn is_directory(&self, path: &Path) -> bool;

    /// Recursively list the `*.json` files under `dir`, de-duplicated.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if `dir` (or a directory below it) cannot be
    /// listed.
    fn json_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Get an environment variable by name.
    fn get_env(&self, name: &str) -> Option<String>;

    /// Get all environment variables matching a prefix.
    ///
    /// Returns tuples of (full_name, value).
    fn env_vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)>;

    /// Set an environment variable visible to child processes.
    fn export_env(&self, name: &str, value: &str);

    /// The directory for temporary files.
    fn temp_dir(&self) -> PathBuf;

    /// Write `content` to `path`, replacing any existing file.
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;

    /// The local host name, if it can be determined.
    fn hostname(&self) -> Option<String>;

    /// The first non-loopback IPv4 address of this host, if any.
    fn local_address(&self) -> Option<String>;
}

/// Production environment using standard library I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealEnv;

impl RealEnv {
    pub fn new() -> Self {
        Self
    }
}

fn walk_json_files(dir: &Path, found: &mut BTreeSet<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_json_files(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            let path = path.canonicalize().unwrap_or(path);
            found.insert(path);
        }
    }
    Ok(())
}

/// Ask the `hostname` utility, present on Linux, macOS and Windows.
fn hostname_command() -> Option<String> {
    let output = Command::new("hostname").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8(output.stdout).ok()?;
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

impl ConfigEnv for RealEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn json_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut found = BTreeSet::new();
        walk_json_files(dir, &mut found)?;
        Ok(found.into_iter().collect())
    }

    fn get_env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn env_vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        std::env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect()
    }

    fn export_env(&self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn hostname(&self) -> Option<String> {
        let candidates = [
            std::env::var("HOSTNAME").ok(),
            std::fs::read_to_string("/etc/hostname").ok(),
        ];
        candidates
            .into_iter()
            .flatten()
            .map(|name| name.trim().to_string())
            .find(|name| !name.is_empty())
            .or_else(hostname_command)
    }

    /// The address of the interface holding the default route. Hosts
    /// without a default route report `None`.
    fn local_address(&self) -> Option<String> {
        // Connecting a UDP socket only selects a route; nothing is sent.
        let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
        socket.connect("8.8.8.8:80").ok()?;
        match socket.local_addr().ok()?.ip() {
            IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip.to_string()),
            _ => None,
        }
    }
}

/// Mock file state for testing.
#[derive(Debug, Clone)]
enum MockFile {
    Content(String),
    NotFound,
    PermissionDenied,
    InvalidUtf8,
}

/// Mock environment for testing settings loading.
///
/// # Example
///
/// ```
/// use sensu_settings::env::MockEnv;
///
/// let env = MockEnv::new()
///     .with_file("/etc/sensu/config.json", r#"{"transport": {"name": "redis"}}"#)
///     .with_directory("/etc/sensu/conf.d")
///     .with_file("/etc/sensu/conf.d/checks.json", r#"{"checks": {}}"#)
///     .with_env("SENSU_CLIENT_NAME", "i-424242")
///     .with_hostname("i-424242")
///     .with_address("10.0.0.5");
/// ```
#[derive(Debug)]
pub struct MockEnv {
    files: RwLock<HashMap<PathBuf, MockFile>>,
    env_vars: RwLock<HashMap<String, String>>,
    directories: RwLock<Vec<PathBuf>>,
    unreadable_directories: RwLock<Vec<PathBuf>>,
    temp_dir: PathBuf,
    hostname: Option<String>,
    address: Option<String>,
}

impl Default for MockEnv {
    fn default() -> Self {
        Self {
            files: RwLock::default(),
            env_vars: RwLock::default(),
            directories: RwLock::default(),
            unreadable_directories: RwLock::default(),
            temp_dir: PathBuf::from("/tmp"),
            hostname: None,
            address: None,
        }
    }
}

impl MockEnv {
    /// Create a new empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::Content(content.into()));
        self
    }

    /// Add a file that will return "not found" error.
    pub fn with_missing_file(self, path: impl Into<PathBuf>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::NotFound);
        self
    }

    /// Add a file whose bytes are not valid UTF-8.
    pub fn with_invalid_utf8_file(self, path: impl Into<PathBuf>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::InvalidUtf8);
        self
    }

    /// Add a file that will return "permission denied" error.
    pub fn with_unreadable_file(self, path: impl Into<PathBuf>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::PermissionDenied);
        self
    }

    /// Add a directory path.
    pub fn with_directory(self, path: impl Into<PathBuf>) -> Self {
        self.directories.write().unwrap().push(path.into());
        self
    }

    /// Add a directory that exists but cannot be listed.
    pub fn with_unreadable_directory(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.directories.write().unwrap().push(path.clone());
        self.unreadable_directories.write().unwrap().push(path);
        self
    }

    /// Set an environment variable.
    pub fn with_env(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars
            .write()
            .unwrap()
            .insert(name.into(), value.into());
        self
    }

    /// Set multiple environment variables from an iterator.
    pub fn with_envs<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut env_vars = self.env_vars.write().unwrap();
        for (k, v) in vars {
            env_vars.insert(k.into(), v.into());
        }
        drop(env_vars);
        self
    }

    pub fn with_temp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_dir = path.into();
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Mutate the mock environment after creation.
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::Content(content.into()));
    }

    /// Remove a file from the mock environment.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.files.write().unwrap().remove(path.as_ref());
    }

    /// Remove an environment variable.
    pub fn remove_env(&self, name: &str) {
        self.env_vars.write().unwrap().remove(name);
    }
}

impl ConfigEnv for MockEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        let files = self.files.read().unwrap();

        match files.get(path) {
            Some(MockFile::Content(content)) => Ok(content.clone()),
            Some(MockFile::NotFound) | None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock file not found: {}", path.display()),
            )),
            Some(MockFile::PermissionDenied) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("mock permission denied: {}", path.display()),
            )),
            Some(MockFile::InvalidUtf8) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "stream did not contain valid UTF-8",
            )),
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        let files = self.files.read().unwrap();
        matches!(
            files.get(path),
            Some(MockFile::Content(_)) | Some(MockFile::InvalidUtf8)
        )
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.directories
            .read()
            .unwrap()
            .contains(&path.to_path_buf())
    }

    fn json_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let unreadable = self.unreadable_directories.read().unwrap();
        if unreadable.iter().any(|d| d.starts_with(dir) || dir.starts_with(d)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("mock permission denied: {}", dir.display()),
            ));
        }
        if !self.is_directory(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock directory not found: {}", dir.display()),
            ));
        }
        let found: BTreeSet<PathBuf> = self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|path| path.starts_with(dir))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .cloned()
            .collect();
        Ok(found.into_iter().collect())
    }

    fn get_env(&self, name: &str) -> Option<String> {
        self.env_vars.read().unwrap().get(name).cloned()
    }

    fn env_vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        self.env_vars
            .read()
            .unwrap()
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn export_env(&self, name: &str, value: &str) {
        self.env_vars
            .write()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone()
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        self.set_file(path, content);
        Ok(())
    }

    fn hostname(&self) -> Option<String> {
        self.hostname.clone()
    }

    fn local_address(&self) -> Option<String> {
        self.address.clone()
    }
}
