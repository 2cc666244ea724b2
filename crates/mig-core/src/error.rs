//! Error types for mig-core

use thiserror::Error;

/// Core error type for Mig
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Script name does not match `scripts/<20 digits>_<name>.sql`
    #[error("[E004] Invalid migration script name '{name}': expected scripts/<20-digit timestamp>_<description>.sql")]
    InvalidScriptName { name: String },

    /// E005: Migration scripts could not be enumerated
    #[error("[E005] Failed to discover migration scripts in {path}: {message}")]
    DiscoveryError { path: String, message: String },

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
