//! Shared test utilities for mig-runner

use async_trait::async_trait;
use mig_db::{Database, DbError, DbResult, DuckDbBackend};
use std::path::Path;
use std::sync::Mutex;

/// Database call kinds a [`FaultyDb`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Execute,
    ExecuteParams,
    ExecuteBatch,
    Transaction,
    QueryOne,
    QueryRows,
    RelationExists,
}

struct Fault {
    op: Operation,
    sql_contains: String,
}

/// In-memory DuckDB wrapper that fails selected calls and records every
/// script passed to [`Database::execute_in_transaction`].
pub struct FaultyDb {
    inner: DuckDbBackend,
    faults: Mutex<Vec<Fault>>,
    transactions: Mutex<Vec<String>>,
}

impl FaultyDb {
    /// Wrap a fresh in-memory database with no faults.
    pub fn new() -> Self {
        Self {
            inner: DuckDbBackend::in_memory().expect("in-memory duckdb"),
            faults: Mutex::new(Vec::new()),
            transactions: Mutex::new(Vec::new()),
        }
    }

    /// Make calls of kind `op` whose SQL contains `sql_contains` fail.
    pub fn fail_when(&self, op: Operation, sql_contains: &str) {
        self.faults.lock().unwrap().push(Fault {
            op,
            sql_contains: sql_contains.to_string(),
        });
    }

    /// Remove every configured fault.
    pub fn clear_faults(&self) {
        self.faults.lock().unwrap().clear();
    }

    /// Every script passed to `execute_in_transaction`, in call order.
    pub fn transactions(&self) -> Vec<String> {
        self.transactions.lock().unwrap().clone()
    }

    /// The wrapped backend, bypassing faults.
    pub fn inner(&self) -> &DuckDbBackend {
        &self.inner
    }

    fn check(&self, op: Operation, sql: &str) -> DbResult<()> {
        let faults = self.faults.lock().unwrap();
        if faults
            .iter()
            .any(|f| f.op == op && sql.contains(&f.sql_contains))
        {
            return Err(DbError::ExecutionError(format!(
                "injected {op:?} failure: {sql}"
            )));
        }
        Ok(())
    }
}

impl Default for FaultyDb {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Database for FaultyDb {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.check(Operation::Execute, sql)?;
        self.inner.execute(sql).await
    }

    async fn execute_params(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.check(Operation::ExecuteParams, sql)?;
        self.inner.execute_params(sql, params).await
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.check(Operation::ExecuteBatch, sql)?;
        self.inner.execute_batch(sql).await
    }

    async fn execute_in_transaction(&self, sql: &str) -> DbResult<()> {
        self.transactions.lock().unwrap().push(sql.to_string());
        self.check(Operation::Transaction, sql)?;
        self.inner.execute_in_transaction(sql).await
    }

    async fn query_one(&self, sql: &str) -> DbResult<Option<String>> {
        self.check(Operation::QueryOne, sql)?;
        self.inner.query_one(sql).await
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        self.check(Operation::QueryRows, sql)?;
        self.inner.query_rows(sql).await
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.check(Operation::RelationExists, name)?;
        self.inner.relation_exists(name).await
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Write `sql` to `<migrations_dir>/scripts/<file_name>`.
pub fn write_script(migrations_dir: &Path, file_name: &str, sql: &str) {
    let dir = migrations_dir.join(mig_core::config::SCRIPTS_DIR);
    std::fs::create_dir_all(&dir).expect("create scripts dir");
    std::fs::write(dir.join(file_name), sql).expect("write script");
}
