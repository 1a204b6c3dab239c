//! qc-core - Core library for dbqc
//!
//! This crate provides the shared types used across dbqc components:
//! comparison operators, tolerance ratios, suite configuration parsing,
//! and SQL text helpers.

pub mod comparator;
pub mod config;
pub mod error;
pub mod sql_utils;
pub mod tolerance;

pub use comparator::Comparator;
pub use config::{CheckDef, DatabaseConfig, DatabasesConfig, DiagnosticConfig, SuiteConfig};
pub use error::{CoreError, CoreResult};
pub use sql_utils::QueryMode;
pub use tolerance::Tolerance;
