//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database abstraction trait for Mig
///
/// The migrator only ever talks to the target database through this trait;
/// connection setup and lifetime belong to the caller.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single SQL statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a single SQL statement with positional text parameters
    /// (`?` placeholders), returns affected rows
    async fn execute_params(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute multiple SQL statements inside one transaction.
    ///
    /// Commits when every statement succeeds. On the first failure the
    /// transaction is rolled back and the statement error is returned.
    async fn execute_in_transaction(&self, sql: &str) -> DbResult<()>;

    /// Return the first column of the first row as text, or `None` when the
    /// query yields no rows (or a NULL)
    async fn query_one(&self, sql: &str) -> DbResult<Option<String>>;

    /// Return every row, each column rendered as text (`None` for NULL)
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Get the database type identifier
    fn db_type(&self) -> &'static str;
}
