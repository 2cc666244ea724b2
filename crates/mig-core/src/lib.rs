//! mig-core - Core library for Mig
//!
//! This crate provides configuration parsing, the migration script naming
//! rules, and script discovery shared by the runner and the CLI.

pub mod config;
pub mod discovery;
pub mod error;
pub mod script_name;
pub(crate) mod serde_helpers;

pub use config::{Config, DatabaseConfig, LockConfig};
pub use discovery::{discover_scripts, DiscoveredScript};
pub use error::{CoreError, CoreResult};
pub use script_name::{is_valid_name, ScriptName};
