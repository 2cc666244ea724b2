//! Discovery of migration scripts on disk.

use crate::config::SCRIPTS_DIR;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// A `.sql` file found under `<migrations_dir>/scripts/`.
///
/// The name has not been validated; a malformed name must still take its
/// place in the sorted list so the migrator can stop there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredScript {
    /// Identifier relative to the migrations directory, e.g.
    /// `scripts/00000000000000000001_init.sql`
    pub name: String,
    /// Path to the file on disk
    pub path: PathBuf,
}

impl DiscoveredScript {
    /// Read the full SQL contents of the script.
    pub fn read_sql(&self) -> CoreResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| CoreError::IoWithPath {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// Enumerate `<migrations_dir>/scripts/*.sql`, sorted by script name.
///
/// Script names are compared byte-wise, so the fixed-width timestamp prefix
/// puts them in creation order. A missing directory yields an empty list.
pub fn discover_scripts(migrations_dir: &Path) -> CoreResult<Vec<DiscoveredScript>> {
    let scripts_dir = migrations_dir.join(SCRIPTS_DIR);
    let pattern = format!(
        "{}/*.sql",
        glob::Pattern::escape(&scripts_dir.display().to_string())
    );
    log::debug!("Discovering migration scripts with pattern {pattern}");

    let entries = glob::glob(&pattern).map_err(|e| CoreError::DiscoveryError {
        path: scripts_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut scripts = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CoreError::DiscoveryError {
            path: scripts_dir.display().to_string(),
            message: e.to_string(),
        })?;
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Err(CoreError::DiscoveryError {
                path: path.display().to_string(),
                message: "file name is not valid UTF-8".to_string(),
            });
        };
        scripts.push(DiscoveredScript {
            name: format!("{SCRIPTS_DIR}/{file_name}"),
            path,
        });
    }

    scripts.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    Ok(scripts)
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
