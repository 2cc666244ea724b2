//! Migration orchestrator.
//!
//! Finds the scripts under `<migrations_dir>/scripts/`, resumes after the last
//! recorded script, and applies the rest one transaction per script. The
//! first invalid name or failing script stops the run: later scripts may
//! depend on the schema the failed one was meant to create.

use crate::error::MigrateResult;
use crate::lock::{new_holder_id, LockTable};
use crate::metadata::MetadataStore;
use crate::report::{HaltReason, MigrationPlan, MigrationReport, PlanEntry, ScriptState};
use mig_core::{discover_scripts, is_valid_name, Config};
use mig_db::Database;
use std::path::{Path, PathBuf};

/// Whether `script` comes after the resume point.
///
/// Comparison is byte-wise; with no resume point every script is eligible.
pub fn is_eligible(script: &str, last_applied: Option<&str>) -> bool {
    match last_applied {
        None => true,
        Some(last) => script > last,
    }
}

/// Applies pending migration scripts to one database.
pub struct Migrator<'a> {
    db: &'a dyn Database,
    migrations_dir: PathBuf,
    use_lock: bool,
}

impl<'a> Migrator<'a> {
    /// Build a migrator for the project rooted at `project_root`.
    pub fn new(db: &'a dyn Database, config: &Config, project_root: &Path) -> Self {
        Self {
            db,
            migrations_dir: config.migrations_dir_absolute(project_root),
            use_lock: config.lock.enabled,
        }
    }

    /// Override whether the run lock is taken.
    pub fn with_lock(mut self, enabled: bool) -> Self {
        self.use_lock = enabled;
        self
    }

    /// Directory holding `scripts/`.
    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    /// Apply every pending script.
    ///
    /// Returns `Err` only when the run cannot start: a bookkeeping table
    /// cannot be created or another run holds the lock. Everything that
    /// happens once scripts are being considered is in the report.
    pub async fn run(&self) -> MigrateResult<MigrationReport> {
        let store = MetadataStore::new(self.db);
        store
            .ensure_table()
            .await
            .inspect_err(|e| log::error!("{e}"))?;

        let lock = if self.use_lock {
            let table = LockTable::new(self.db);
            table.ensure_table().await.inspect_err(|e| log::error!("{e}"))?;
            let lock = table
                .acquire(&new_holder_id())
                .await
                .inspect_err(|e| log::error!("{e}"))?;
            Some(lock)
        } else {
            None
        };

        let report = self.apply_pending(&store).await;

        if let Some(lock) = lock {
            if let Err(e) = lock.release().await {
                log::warn!("{e}");
            }
        }

        log::info!("{}", report.summary());
        if !report.unrecorded.is_empty() {
            log::warn!(
                "{} applied migration(s) were not recorded and may be applied again: {}",
                report.unrecorded.len(),
                report.unrecorded.join(", ")
            );
        }

        Ok(report)
    }

    async fn apply_pending(&self, store: &MetadataStore<'_>) -> MigrationReport {
        let mut report = MigrationReport::default();

        let scripts = match discover_scripts(&self.migrations_dir) {
            Ok(scripts) => scripts,
            Err(e) => {
                log::error!("Error discovering migration scripts: {e}");
                report.halt = Some(HaltReason::Discovery {
                    message: e.to_string(),
                });
                return report;
            }
        };
        log::info!(
            "Found {} migration script(s) in {}",
            scripts.len(),
            self.migrations_dir.display()
        );

        log::info!("Reading from metadata table...");
        let last_applied = match store.read_last_applied().await {
            Ok(last) => last,
            Err(e) => {
                log::error!("{e}");
                report.halt = Some(HaltReason::MetadataRead {
                    message: e.to_string(),
                });
                return report;
            }
        };
        log::info!(
            "Last migrated script: {}",
            last_applied.as_deref().unwrap_or("<none>")
        );

        for script in &scripts {
            if !is_valid_name(&script.name) {
                log::error!("Invalid file name format for file: {}", script.name);
                report.halt = Some(HaltReason::InvalidName {
                    script: script.name.clone(),
                });
                break;
            }

            if !is_eligible(&script.name, last_applied.as_deref()) {
                log::debug!("Skipping already applied migration: {}", script.name);
                report.skipped += 1;
                continue;
            }

            log::info!("Running migration: {}", script.name);
            let sql = match script.read_sql() {
                Ok(sql) => sql,
                Err(e) => {
                    log::error!("{e}");
                    report.halt = Some(HaltReason::Unreadable {
                        script: script.name.clone(),
                        message: e.to_string(),
                    });
                    break;
                }
            };

            if let Err(e) = self.db.execute_in_transaction(&sql).await {
                log::error!("Migration {} failed, rolled back:\n{}", script.name, sql);
                log::error!("{e}");
                report.halt = Some(HaltReason::Execution {
                    script: script.name.clone(),
                    message: e.to_string(),
                });
                break;
            }

            log::info!("Completed migration: {}", script.name);
            report.applied.push(script.name.clone());

            // The schema change is committed; a failed write is surfaced but
            // does not stop the remaining scripts.
            if store.record_applied(&script.name).await.is_err() {
                report.unrecorded.push(script.name.clone());
            }
        }

        report
    }

    /// Describe what the next run would do without changing anything.
    ///
    /// A missing bookkeeping table is read as "nothing applied yet"; no
    /// table is created.
    pub async fn plan(&self) -> MigrateResult<MigrationPlan> {
        let store = MetadataStore::new(self.db);
        let last_applied = if store.table_exists().await? {
            store.read_last_applied().await?
        } else {
            None
        };

        let scripts = discover_scripts(&self.migrations_dir)?;

        let mut entries = Vec::with_capacity(scripts.len());
        let mut blocked = false;
        for script in scripts {
            let state = if blocked {
                ScriptState::Blocked
            } else if !is_valid_name(&script.name) {
                blocked = true;
                ScriptState::InvalidName
            } else if is_eligible(&script.name, last_applied.as_deref()) {
                ScriptState::Pending
            } else {
                ScriptState::Applied
            };
            entries.push(PlanEntry {
                script: script.name,
                state,
            });
        }

        Ok(MigrationPlan {
            last_applied,
            entries,
        })
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
