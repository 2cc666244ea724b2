//! Accessor for the `migrations_metadata` bookkeeping table.
//!
//! The table is append-only: one row per successfully applied script, with
//! the insert time assigned by the database. The newest row marks the resume
//! point for the next run.

use crate::error::{MigrateError, MigrateResult};
use chrono::NaiveDateTime;
use mig_db::Database;
use serde::Serialize;

/// Name of the bookkeeping table.
pub const METADATA_TABLE: &str = "migrations_metadata";

const CREATE_METADATA_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS migrations_metadata (migrated_at TIMESTAMP, script_name TEXT)";

// Rows recorded in the same clock tick fall back to name order, which is
// application order.
const SELECT_LAST_APPLIED: &str = "SELECT script_name FROM migrations_metadata \
     ORDER BY migrated_at DESC, script_name DESC LIMIT 1";

const INSERT_APPLIED: &str = "INSERT INTO migrations_metadata VALUES (now(), ?)";

const SELECT_HISTORY: &str = "SELECT CAST(migrated_at AS VARCHAR), script_name \
     FROM migrations_metadata ORDER BY migrated_at DESC, script_name DESC";

/// One row of the bookkeeping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// When the script was recorded
    pub migrated_at: NaiveDateTime,
    /// Identifier of the applied script
    pub script_name: String,
}

/// Reads and appends bookkeeping rows through a caller-supplied connection.
pub struct MetadataStore<'a> {
    db: &'a dyn Database,
}

impl<'a> MetadataStore<'a> {
    /// Wrap a database connection.
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Create the bookkeeping table if it does not exist.
    ///
    /// A failure here means no run can proceed.
    pub async fn ensure_table(&self) -> MigrateResult<()> {
        self.db
            .execute_batch(CREATE_METADATA_TABLE)
            .await
            .map_err(|e| MigrateError::BookkeepingSetup {
                table: METADATA_TABLE,
                source: e,
            })
    }

    /// Whether the bookkeeping table exists yet.
    pub async fn table_exists(&self) -> MigrateResult<bool> {
        self.db
            .relation_exists(METADATA_TABLE)
            .await
            .map_err(MigrateError::MetadataRead)
    }

    /// Name of the most recently recorded script.
    ///
    /// `Ok(None)` means nothing has been applied yet; a failed query is an
    /// error, never an empty marker.
    pub async fn read_last_applied(&self) -> MigrateResult<Option<String>> {
        self.db
            .query_one(SELECT_LAST_APPLIED)
            .await
            .map_err(MigrateError::MetadataRead)
    }

    /// Append a row for `script_name` stamped with the database's `now()`.
    pub async fn record_applied(&self, script_name: &str) -> MigrateResult<()> {
        match self.db.execute_params(INSERT_APPLIED, &[script_name]).await {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("Failed to record migration {script_name}: {e}");
                Err(MigrateError::MetadataWrite {
                    script: script_name.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Recorded rows, newest first, at most `limit` of them.
    pub async fn history(&self, limit: Option<usize>) -> MigrateResult<Vec<MetadataRecord>> {
        let sql = match limit {
            Some(n) => format!("{SELECT_HISTORY} LIMIT {n}"),
            None => SELECT_HISTORY.to_string(),
        };
        let rows = self
            .db
            .query_rows(&sql)
            .await
            .map_err(MigrateError::MetadataRead)?;

        rows.into_iter().map(parse_record).collect()
    }
}

fn parse_record(row: Vec<Option<String>>) -> MigrateResult<MetadataRecord> {
    let mut cols = row.into_iter();
    let (Some(Some(migrated_at)), Some(Some(script_name))) = (cols.next(), cols.next()) else {
        return Err(MigrateError::InvalidRecord(
            "row has a NULL migrated_at or script_name".to_string(),
        ));
    };

    let migrated_at = NaiveDateTime::parse_from_str(&migrated_at, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| {
            MigrateError::InvalidRecord(format!(
                "cannot parse migrated_at '{migrated_at}' for {script_name}: {e}"
            ))
        })?;

    Ok(MetadataRecord {
        migrated_at,
        script_name,
    })
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
