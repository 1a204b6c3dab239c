//! Database trait definitions

use crate::error::DbResult;
use crate::value::Row;

/// Query interface the assertion engine runs against
///
/// Implementations must be Send + Sync so independent suites can be
/// driven from separate threads.
pub trait Database: Send + Sync {
    /// Execute a query returning a single integer (first column of the first row)
    fn query_scalar(&self, sql: &str) -> DbResult<i64>;

    /// Execute a query and fetch every row
    fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Identifier of the database instance, used in diagnostics
    fn identifier(&self) -> String;
}

/// Anything that is, or exposes, a [`Database`]
///
/// Every `Database` resolves to itself; wrappers such as
/// [`Target`](crate::Target) hand out the connection they own.
pub trait AsDatabase {
    /// The underlying connection
    fn database(&self) -> &dyn Database;

    /// Label used in diagnostics; defaults to the connection identifier
    fn label(&self) -> String {
        self.database().identifier()
    }
}

impl<T: Database> AsDatabase for T {
    fn database(&self) -> &dyn Database {
        self
    }
}
