// Load errors carry their full context by value
#![allow(clippy::result_large_err)]

//! Sensu settings: load, merge and validate monitoring service settings.
//!
//! Settings come from environment variables, JSON config files, directories
//! of JSON files and optionally a key-value store. Every source is deep
//! merged into one tree, then the tree is checked against the rules of the
//! service role consuming it. Validation never stops at the first problem:
//! every violated rule is reported.
//!
//! # Quick Start
//!
//! ```no_run
//! use sensu_settings::prelude::*;
//!
//! fn main() -> Result<(), LoadError> {
//!     let mut settings = SettingsBuilder::new()
//!         .role(Role::from_program_name("sensu-client"))
//!         .file("/etc/sensu/config.json")
//!         .directory("/etc/sensu/conf.d")
//!         .build()?;
//!
//!     let failures = settings.validate();
//!     if let Some(failures) = Failures::from_vec(failures) {
//!         failures.report(&ReportOptions::default());
//!         std::process::exit(2);
//!     }
//!     println!("settings digest {}", settings.hexdigest());
//!     Ok(())
//! }
//! ```
//!
//! # Merging
//!
//! [`deep_merge`] merges tables key by key, concatenates arrays without
//! duplicates and lets the later scalar win. [`deep_diff`] reports what a
//! merge changed as `[before, after]` pairs; the loader records one such
//! diff per config file after the first.
//!
//! # Architecture
//!
//! - **Pure core**: merging, diffing and validation are pure functions over
//!   [`Value`] trees
//! - **Imperative shell**: all I/O goes through the [`ConfigEnv`] trait, so
//!   the loader runs against [`MockEnv`] in tests
//!
//! # Module Structure
//!
//! - [`prelude`]: Convenient re-exports for common usage
//! - [`settings`]: `SettingsBuilder`, the whole load pipeline in one call
//! - [`loader`]: `Loader`, the individual load steps and accessors
//! - [`validator`]: `Validator` and the per-category rules
//! - [`rules`]: Atomic value predicates shared by the validators
//! - [`merge`]: `deep_merge` and `deep_diff`
//! - [`error`]: `LoadError`, `Diagnostic`, `Failure`, `Failures`
//! - [`report`]: Rendering of failures and diagnostics
//! - [`key_value`]: The key-value store collaborator interface
//! - [`mod@env`]: `ConfigEnv` trait and `MockEnv` for testing
//! - [`value`]: `Value`, the settings tree
//!
//! # Stillwater Integration
//!
//! | Type | Usage |
//! |------|-------|
//! | `Validation<T, E>` | [`validate_settings`] result |
//! | `NonEmptyVec<T>` | Backing store of [`Failures`] |
//! | `Semigroup` | Combining failures from separate runs |

pub mod env;
pub mod error;
pub mod key_value;
pub mod loader;
pub mod merge;
pub mod prelude;
pub mod report;
pub mod role;
pub mod rules;
pub mod settings;
pub mod validator;
pub mod value;

pub use env::{ConfigEnv, MockEnv, RealEnv};
pub use error::{Diagnostic, Failure, Failures, LoadError, SettingsValidation};
pub use key_value::{KeyValueConfig, KeyValueError, KeyValueStore};
pub use loader::Loader;
pub use merge::{deep_diff, deep_merge};
pub use report::{ColorOption, ReportOptions, ValidationExt};
pub use role::Role;
pub use settings::SettingsBuilder;
pub use validator::{validate_settings, Category, Validator};
pub use value::{Table, Value};

pub use stillwater::{NonEmptyVec, Semigroup, Validation};
