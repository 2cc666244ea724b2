//! mig-db - Database abstraction layer for Mig
//!
//! This crate provides the `Database` trait the migrator runs against and
//! its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use self::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
