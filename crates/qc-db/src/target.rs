//! Named database connections

use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use crate::traits::{AsDatabase, Database};
use qc_core::DatabaseConfig;
use std::path::Path;

/// A labelled connection, e.g. the primary or secondary database of a suite
pub struct Target {
    label: String,
    db: Box<dyn Database>,
}

impl Target {
    /// Wrap an existing connection under a label
    pub fn new(label: impl Into<String>, db: Box<dyn Database>) -> Self {
        Self {
            label: label.into(),
            db,
        }
    }

    /// Open a DuckDB connection from suite configuration.
    ///
    /// Relative paths are resolved against `root`. A file path must already
    /// exist; only `:memory:` opens a fresh database. The label defaults to
    /// the configured path.
    pub fn open(config: &DatabaseConfig, root: &Path) -> DbResult<Self> {
        let path = config.path_absolute(root);
        if path != ":memory:" && !Path::new(&path).exists() {
            return Err(DbError::DatabaseNotFound(path));
        }
        let backend = DuckDbBackend::new(&path)?;
        let label = config.label.clone().unwrap_or_else(|| config.path.clone());
        log::debug!("Opened {} target '{}' at {}", backend.db_type(), label, path);
        Ok(Self::new(label, Box::new(backend)))
    }
}

impl AsDatabase for Target {
    fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("label", &self.label)
            .field("db_type", &self.db.db_type())
            .finish()
    }
}
