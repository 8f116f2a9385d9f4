//! Service roles.

use std::fmt;
use std::str::FromStr;

/// The service identity consuming the settings.
///
/// The role decides which singleton blocks are validated and whether the
/// loader fills in and overrides client identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Client,
    Agent,
    #[default]
    Server,
    Api,
    /// Validates both the client and api blocks.
    Test,
}

impl Role {
    /// Derive the role from a process name such as `sensu-client` or
    /// `/opt/sensu/bin/sensu-api`. Unknown names map to `Server`.
    pub fn from_program_name(program: &str) -> Self {
        let base = program.rsplit(['/', '\\']).next().unwrap_or(program);
        let suffix = base.rsplit('-').next().unwrap_or(base);
        suffix.parse().unwrap_or(Role::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Agent => "agent",
            Role::Server => "server",
            Role::Api => "api",
            Role::Test => "test",
        }
    }

    /// Whether the loader manages a `client` block for this role.
    pub fn has_client(&self) -> bool {
        matches!(self, Role::Client | Role::Agent | Role::Test)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown service role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "agent" => Ok(Role::Agent),
            "server" => Ok(Role::Server),
            "api" => Ok(Role::Api),
            "test" => Ok(Role::Test),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
