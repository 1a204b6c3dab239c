//! Error types for qc-db

use thiserror::Error;

/// Errors raised while opening or querying a database
#[derive(Error, Debug)]
pub enum DbError {
    /// The backend refused the connection (D001)
    #[error("[D001] Could not open database: {0}")]
    ConnectionError(String),

    /// A statement failed to prepare or run (D002)
    #[error("[D002] Query failed: {0}")]
    ExecutionError(String),

    /// A query named a relation the catalog does not have (D003)
    #[error("[D003] Relation does not exist: {0}")]
    TableNotFound(String),

    /// Another thread panicked while holding the connection (D004)
    #[error("[D004] Connection lock poisoned: {0}")]
    MutexPoisoned(String),

    /// A file-backed database path that does not exist (D005)
    #[error("[D005] Database file not found: {0}")]
    DatabaseNotFound(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

/// Whether a DuckDB error message is a catalog miss on a table or view
fn names_missing_relation(msg: &str) -> bool {
    const MARKERS: [&str; 3] = ["Table with name", "View with name", "Table or view with name"];
    if MARKERS.iter().any(|m| msg.contains(m)) {
        return true;
    }
    msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found")
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // Only the rendered message carries the catalog detail
        let msg = err.to_string();
        if names_missing_relation(&msg) {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
