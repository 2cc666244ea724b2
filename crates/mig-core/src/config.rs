//! Configuration types and parsing for mig.yml
//!
//! The configuration file is optional: a project without `mig.yml` runs with
//! [`Config::default`]. The resulting struct is built once at process start
//! and handed to the migrator by reference.

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured database path.
pub const DATABASE_ENV_VAR: &str = "MIG_DATABASE";

/// Config file names looked up in a project directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["mig.yml", "mig.yaml"];

/// Name of the directory under `migrations_dir` that holds the scripts.
pub const SCRIPTS_DIR: &str = "scripts";

/// Main project configuration from mig.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing the `scripts/` folder, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Run lock configuration
    #[serde(default)]
    pub lock: LockConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Run lock configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Take the `migrations_lock` row for the duration of a run
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            database: DatabaseConfig::default(),
            lock: LockConfig::default(),
        }
    }
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_db_path() -> String {
    "mig.duckdb".to_string()
}

impl Config {
    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        // An empty file is a valid "all defaults" configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Load `mig.yml` (or `mig.yaml`) from a project directory, falling back
    /// to defaults when neither exists
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No config file in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the absolute migrations directory relative to a project root
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Get the absolute scripts directory relative to a project root
    pub fn scripts_dir_absolute(&self, root: &Path) -> PathBuf {
        self.migrations_dir_absolute(root).join(SCRIPTS_DIR)
    }

    /// Resolve the database path to connect to.
    ///
    /// Precedence: CLI flag, then the `MIG_DATABASE` environment variable,
    /// then the config file. A relative file path is resolved against `root`;
    /// `:memory:` is passed through untouched.
    pub fn resolve_database(&self, cli_database: Option<&str>, root: &Path) -> String {
        let chosen = cli_database
            .map(str::to_string)
            .or_else(|| {
                std::env::var(DATABASE_ENV_VAR)
                    .ok()
                    .filter(|v| !v.is_empty())
            })
            .unwrap_or_else(|| self.database.path.clone());

        if chosen == ":memory:" || Path::new(&chosen).is_absolute() {
            chosen
        } else {
            root.join(chosen).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
