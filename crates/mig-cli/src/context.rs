//! Runtime context for CLI commands

use anyhow::{Context, Result};
use mig_core::Config;
use mig_db::DuckDbBackend;
use std::path::PathBuf;

use crate::cli::GlobalArgs;

/// Loaded configuration plus the resolved project root and database path
pub struct RuntimeContext {
    /// Project directory all relative paths are resolved against
    pub root: PathBuf,

    /// Effective configuration
    pub config: Config,

    /// Database path after applying flag, env and config precedence
    pub database: String,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let root = args.project_dir.clone();

        // Load config from custom path or project directory
        let config = match &args.config {
            Some(config_path) => {
                Config::load(config_path).context("Failed to load configuration file")?
            }
            None => Config::load_or_default(&root)
                .context("Failed to load project configuration")?,
        };

        let database = config.resolve_database(args.database.as_deref(), &root);
        log::debug!("Using database {database}");

        Ok(Self {
            root,
            config,
            database,
        })
    }

    /// Open the configured database
    pub fn connect(&self) -> Result<DuckDbBackend> {
        DuckDbBackend::new(&self.database)
            .with_context(|| format!("Failed to connect to database {}", self.database))
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
