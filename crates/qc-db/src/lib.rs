//! qc-db - Database abstraction layer for dbqc
//!
//! This crate provides the `Database` trait the assertion engine queries
//! through, the `AsDatabase` accessor trait, named `Target` connections,
//! and the DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod target;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use target::Target;
pub use traits::{AsDatabase, Database};
pub use value::{Row, Value};
