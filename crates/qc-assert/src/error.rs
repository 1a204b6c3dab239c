//! Error types for qc-assert
//!
//! A failed assertion is not an error: it is reported as a failed outcome
//! and the caller moves on. These errors halt the current check.

use qc_db::DbError;
use thiserror::Error;

/// Errors that stop an assertion before it can produce an outcome
#[derive(Error, Debug)]
pub enum AssertError {
    /// Subtotal query does not have the two-column grouped shape (A001)
    #[error("[A001] Invalid SQL statement for subtotals: must select a single column, then a count expression, then GROUP BY: {sql}")]
    MalformedSubtotalQuery { sql: String },

    /// Subtotal query returned a row without a usable count (A002)
    #[error("[A002] Subtotal row ({row}) from {database} does not hold a category and an integer count")]
    InvalidSubtotalRow { database: String, row: String },

    /// Comparative check run without a secondary database (A003)
    #[error("[A003] Comparative check requires a secondary database")]
    MissingSecondary,

    /// Query execution failed
    #[error(transparent)]
    Database(#[from] DbError),
}

impl AssertError {
    /// Whether the error comes from the check definition rather than the database
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AssertError::MalformedSubtotalQuery { .. } | AssertError::MissingSecondary
        )
    }
}

/// Result type alias for AssertError
pub type AssertResult<T> = Result<T, AssertError>;
