//! Error types for the migration runner.

use mig_core::CoreError;
use mig_db::DbError;
use thiserror::Error;

/// Migration runner errors.
///
/// Only conditions that stop a run before it can start are returned as
/// errors from [`crate::Migrator::run`]; per-script failures are reported in
/// [`crate::MigrationReport`].
#[derive(Error, Debug)]
pub enum MigrateError {
    /// A bookkeeping table could not be created (M001).
    #[error("[M001] Failed to create bookkeeping table {table}: {source}")]
    BookkeepingSetup {
        table: &'static str,
        #[source]
        source: DbError,
    },

    /// The last applied script could not be read (M002).
    #[error("[M002] Failed to read migration metadata: {0}")]
    MetadataRead(#[source] DbError),

    /// A successfully applied script could not be recorded (M003).
    #[error("[M003] Failed to record migration {script}: {source}")]
    MetadataWrite {
        script: String,
        #[source]
        source: DbError,
    },

    /// A stored metadata row could not be interpreted (M004).
    #[error("[M004] Invalid migration metadata record: {0}")]
    InvalidRecord(String),

    /// Another run holds the run lock (M005).
    #[error("[M005] Another migration run holds the lock (holder: {holder}, acquired at {acquired_at}). Run `mig unlock` if that run is gone.")]
    LockHeld {
        holder: String,
        acquired_at: String,
    },

    /// Acquiring, inspecting, or releasing the run lock failed (M006).
    #[error("[M006] Run lock operation failed: {0}")]
    Lock(#[source] DbError),

    /// Discovery or configuration error from mig-core (M007).
    #[error("[M007] {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
