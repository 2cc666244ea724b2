//! Run-level mutual exclusion.
//!
//! At most one migration run may be active against a database. A run claims
//! the single row (`lock_id = 1`) of `migrations_lock`; the primary key makes
//! a second claim fail until the first run deletes its row. A crashed run
//! leaves its row behind, which `mig unlock` removes.

use crate::error::{MigrateError, MigrateResult};
use mig_db::{Database, DbError};
use uuid::Uuid;

/// Name of the lock table.
pub const LOCK_TABLE: &str = "migrations_lock";

const CREATE_LOCK_TABLE: &str = "CREATE TABLE IF NOT EXISTS migrations_lock (
    lock_id INTEGER PRIMARY KEY,
    holder TEXT NOT NULL,
    acquired_at TIMESTAMP NOT NULL
)";

const INSERT_LOCK: &str = "INSERT INTO migrations_lock VALUES (1, ?, now())";

const DELETE_OWN_LOCK: &str = "DELETE FROM migrations_lock WHERE lock_id = 1 AND holder = ?";

const SELECT_HOLDER: &str =
    "SELECT holder, CAST(acquired_at AS VARCHAR) FROM migrations_lock WHERE lock_id = 1";

/// Identity recorded in the lock row: process id plus a random suffix.
pub fn new_holder_id() -> String {
    format!("pid-{}-{}", std::process::id(), Uuid::new_v4())
}

/// The current owner of the lock row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockInfo {
    pub holder: String,
    pub acquired_at: String,
}

/// Access to the `migrations_lock` table.
pub struct LockTable<'a> {
    db: &'a dyn Database,
}

impl<'a> LockTable<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Create the lock table if it does not exist.
    pub async fn ensure_table(&self) -> MigrateResult<()> {
        self.db
            .execute_batch(CREATE_LOCK_TABLE)
            .await
            .map_err(|e| MigrateError::BookkeepingSetup {
                table: LOCK_TABLE,
                source: e,
            })
    }

    /// Claim the lock for `holder`.
    ///
    /// Fails with [`MigrateError::LockHeld`] while another holder owns it.
    pub async fn acquire(&self, holder: &str) -> MigrateResult<RunLock<'a>> {
        match self.db.execute_params(INSERT_LOCK, &[holder]).await {
            Ok(_) => {
                log::debug!("Acquired migration lock as {holder}");
                Ok(RunLock {
                    db: self.db,
                    holder: holder.to_string(),
                    released: false,
                })
            }
            Err(DbError::ConstraintViolation(_)) => {
                let current = self.current_holder().await?;
                let (holder, acquired_at) = match current {
                    Some(info) => (info.holder, info.acquired_at),
                    // Released between our insert and the lookup
                    None => ("<released>".to_string(), "<unknown>".to_string()),
                };
                Err(MigrateError::LockHeld {
                    holder,
                    acquired_at,
                })
            }
            Err(e) => Err(MigrateError::Lock(e)),
        }
    }

    /// The active holder, if any. A missing table means nobody holds it.
    pub async fn current_holder(&self) -> MigrateResult<Option<LockInfo>> {
        if !self
            .db
            .relation_exists(LOCK_TABLE)
            .await
            .map_err(MigrateError::Lock)?
        {
            return Ok(None);
        }

        let rows = self
            .db
            .query_rows(SELECT_HOLDER)
            .await
            .map_err(MigrateError::Lock)?;

        Ok(rows.into_iter().next().map(|row| {
            let mut cols = row.into_iter();
            LockInfo {
                holder: cols.next().flatten().unwrap_or_default(),
                acquired_at: cols.next().flatten().unwrap_or_default(),
            }
        }))
    }

    /// Delete the lock row regardless of who holds it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn force_release(&self) -> MigrateResult<bool> {
        if !self
            .db
            .relation_exists(LOCK_TABLE)
            .await
            .map_err(MigrateError::Lock)?
        {
            return Ok(false);
        }

        let removed = self
            .db
            .execute("DELETE FROM migrations_lock")
            .await
            .map_err(MigrateError::Lock)?;
        Ok(removed > 0)
    }
}

/// A held run lock. Call [`RunLock::release`] when the run ends.
pub struct RunLock<'a> {
    db: &'a dyn Database,
    holder: String,
    released: bool,
}

impl RunLock<'_> {
    /// Identity this lock was acquired with.
    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Delete this holder's lock row.
    pub async fn release(mut self) -> MigrateResult<()> {
        self.released = true;
        let removed = self
            .db
            .execute_params(DELETE_OWN_LOCK, &[self.holder.as_str()])
            .await
            .map_err(MigrateError::Lock)?;
        if removed == 0 {
            log::warn!(
                "Migration lock for {} was already gone at release",
                self.holder
            );
        } else {
            log::debug!("Released migration lock held by {}", self.holder);
        }
        Ok(())
    }
}

impl Drop for RunLock<'_> {
    fn drop(&mut self) {
        if !self.released {
            log::warn!(
                "Migration lock held by {} dropped without release; run `mig unlock` to clear it",
                self.holder
            );
        }
    }
}

#[cfg(test)]
#[path = "lock_test.rs"]
mod tests;
