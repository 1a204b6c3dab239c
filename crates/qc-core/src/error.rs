//! Error types for qc-core

use thiserror::Error;

/// Core error type for dbqc
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Suite file not found
    #[error("[C001] Suite file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid suite configuration value
    #[error("[C002] Invalid suite config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Unknown comparison operator
    #[error("[C003] Unknown comparison operator '{op}': expected one of ==, !=, <, <=, >, >=")]
    UnknownComparator { op: String },

    /// C004: Tolerance outside the accepted range
    #[error("[C004] Invalid tolerance {value}: must be a finite number greater than 0")]
    InvalidTolerance { value: f64 },

    /// C005: Failed to read a file
    #[error("[C005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C006: YAML parse error
    #[error("[C006] Suite parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
