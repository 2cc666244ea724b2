//! Migration runner for Mig.
//!
//! Applies SQL scripts from `<migrations_dir>/scripts/` in lexical order,
//! one transaction per script, and records each applied script in the
//! `migrations_metadata` bookkeeping table of the target database.

pub mod error;
pub mod lock;
pub mod metadata;
pub mod migrator;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{MigrateError, MigrateResult};
pub use lock::{LockInfo, LockTable, RunLock};
pub use metadata::{MetadataRecord, MetadataStore};
pub use migrator::{is_eligible, Migrator};
pub use report::{HaltReason, MigrationPlan, MigrationReport, PlanEntry, ScriptState};
