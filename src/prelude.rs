//! Convenient re-exports for common usage.
//!
//! ```
//! use sensu_settings::prelude::*;
//!
//! let env = MockEnv::new().with_env("SENSU_API_PORT", "4567");
//! let mut loader = SettingsBuilder::new()
//!     .role(Role::Api)
//!     .build_with_env(&env)
//!     .unwrap();
//! assert!(loader.validate().is_empty());
//! ```

pub use crate::env::{ConfigEnv, MockEnv, RealEnv};
pub use crate::error::{Diagnostic, Failure, Failures, LoadError, SettingsValidation};
pub use crate::loader::Loader;
pub use crate::report::{ReportOptions, ValidationExt};
pub use crate::role::Role;
pub use crate::settings::SettingsBuilder;
pub use crate::validator::{validate_settings, Category, Validator};
pub use crate::value::Value;

pub use stillwater::Validation;
