//! Suite configuration types and parsing for qc.yml

use crate::comparator::Comparator;
use crate::error::{CoreError, CoreResult};
use crate::sql_utils::{is_subtotal_query, QueryMode};
use crate::tolerance::Tolerance;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A QC suite loaded from qc.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Suite name
    pub name: String,

    /// Databases the checks run against
    #[serde(default)]
    pub databases: DatabasesConfig,

    /// Diagnostic output limits
    #[serde(default)]
    pub diagnostics: DiagnosticConfig,

    /// Checks, executed in order
    #[serde(default)]
    pub checks: Vec<CheckDef>,
}

/// Primary (new) and secondary (reference) database locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabasesConfig {
    /// Database under test
    #[serde(default)]
    pub primary: Option<DatabaseConfig>,

    /// Reference database for comparative checks
    #[serde(default)]
    pub secondary: Option<DatabaseConfig>,
}

/// A single database connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Label used in diagnostics (defaults to the path)
    #[serde(default)]
    pub label: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            label: None,
        }
    }
}

impl DatabaseConfig {
    /// Resolve a relative path against `root`; `:memory:` is left untouched
    pub fn path_absolute(&self, root: &Path) -> String {
        if self.path == ":memory:" || Path::new(&self.path).is_absolute() {
            self.path.clone()
        } else {
            root.join(&self.path).display().to_string()
        }
    }
}

/// Limits on the diagnostics attached to failed assertions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticConfig {
    /// Maximum offending rows rendered per failure
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Separator between column values of a rendered row
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Default prefix for rendered rows
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            delimiter: default_delimiter(),
            prefix: default_prefix(),
        }
    }
}

/// One check in a suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum CheckDef {
    /// Count equals an expected value
    IsRows {
        #[serde(default)]
        name: Option<String>,
        sql: String,
        expected: i64,
        #[serde(default)]
        mode: QueryMode,
    },

    /// Count compared to an expected value with an operator
    CmpRows {
        #[serde(default)]
        name: Option<String>,
        sql: String,
        op: Comparator,
        expected: i64,
        #[serde(default)]
        mode: QueryMode,
    },

    /// Query returns no rows
    IsRowsZero {
        #[serde(default)]
        name: Option<String>,
        sql: String,
        #[serde(default)]
        diag: Option<String>,
        #[serde(default)]
        mode: QueryMode,
    },

    /// Query returns at least one row
    IsRowsNonzero {
        #[serde(default)]
        name: Option<String>,
        sql: String,
        #[serde(default)]
        mode: QueryMode,
    },

    /// Primary total reaches a fraction of the secondary total
    RowTotals {
        #[serde(default)]
        name: Option<String>,
        sql: String,
        #[serde(default)]
        tolerance: Tolerance,
        #[serde(default)]
        mode: QueryMode,
    },

    /// Per-category primary counts reach a fraction of the secondary counts
    RowSubtotals {
        #[serde(default)]
        name: Option<String>,
        sql: String,
        #[serde(default)]
        tolerance: Tolerance,
    },

    /// No orphaned foreign keys
    Fk {
        #[serde(default)]
        name: Option<String>,
        table1: String,
        col1: String,
        table2: String,
        #[serde(default)]
        col2: Option<String>,
        #[serde(default)]
        both_ways: bool,
        #[serde(default)]
        constraint: Option<String>,
        #[serde(default)]
        ignore_null_keys: bool,
        #[serde(default)]
        quote_identifiers: bool,
    },
}

impl CheckDef {
    /// The `kind` tag as written in qc.yml
    pub fn kind(&self) -> &'static str {
        match self {
            CheckDef::IsRows { .. } => "is_rows",
            CheckDef::CmpRows { .. } => "cmp_rows",
            CheckDef::IsRowsZero { .. } => "is_rows_zero",
            CheckDef::IsRowsNonzero { .. } => "is_rows_nonzero",
            CheckDef::RowTotals { .. } => "row_totals",
            CheckDef::RowSubtotals { .. } => "row_subtotals",
            CheckDef::Fk { .. } => "fk",
        }
    }

    /// User-supplied name, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            CheckDef::IsRows { name, .. }
            | CheckDef::CmpRows { name, .. }
            | CheckDef::IsRowsZero { name, .. }
            | CheckDef::IsRowsNonzero { name, .. }
            | CheckDef::RowTotals { name, .. }
            | CheckDef::RowSubtotals { name, .. }
            | CheckDef::Fk { name, .. } => name.as_deref(),
        }
    }

    /// Whether the check compares two databases
    pub fn needs_secondary(&self) -> bool {
        matches!(
            self,
            CheckDef::RowTotals { .. } | CheckDef::RowSubtotals { .. }
        )
    }

    /// A label for progress output: the name, or `<kind> #<index>`
    pub fn label(&self, index: usize) -> String {
        match self.name() {
            Some(n) => n.to_string(),
            None => format!("{} #{}", self.kind(), index + 1),
        }
    }

    fn validate(&self, index: usize) -> CoreResult<()> {
        let invalid = |message: String| CoreError::ConfigInvalid {
            message: format!("check '{}': {}", self.label(index), message),
        };
        match self {
            CheckDef::IsRows { sql, .. }
            | CheckDef::CmpRows { sql, .. }
            | CheckDef::IsRowsZero { sql, .. }
            | CheckDef::IsRowsNonzero { sql, .. }
            | CheckDef::RowTotals { sql, .. } => {
                if sql.trim().is_empty() {
                    return Err(invalid("sql cannot be empty".to_string()));
                }
            }
            CheckDef::RowSubtotals { sql, .. } => {
                if !is_subtotal_query(sql) {
                    return Err(invalid(
                        "subtotal sql must select one category column, then a count expression, then GROUP BY"
                            .to_string(),
                    ));
                }
            }
            CheckDef::Fk {
                table1,
                col1,
                table2,
                col2,
                ..
            } => {
                let parts = [
                    ("table1", Some(table1)),
                    ("col1", Some(col1)),
                    ("table2", Some(table2)),
                    ("col2", col2.as_ref()),
                ];
                for (field, value) in parts {
                    if value.is_some_and(|v| v.trim().is_empty()) {
                        return Err(invalid(format!("{} cannot be empty", field)));
                    }
                }
            }
        }
        Ok(())
    }
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_max_rows() -> usize {
    10
}

fn default_delimiter() -> String {
    ", ".to_string()
}

fn default_prefix() -> String {
    "Unexpected data".to_string()
}

impl SuiteConfig {
    /// Load a suite from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Load a suite from a directory
    /// Looks for qc.yml or qc.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        Self::locate(dir).map_or_else(
            || {
                Err(CoreError::ConfigNotFound {
                    path: dir.join("qc.yml").display().to_string(),
                })
            },
            |p| Self::load(&p),
        )
    }

    /// Find the suite file inside `dir`
    pub fn locate(dir: &Path) -> Option<PathBuf> {
        ["qc.yml", "qc.yaml"]
            .iter()
            .map(|f| dir.join(f))
            .find(|p| p.exists())
    }

    /// Parse and validate a suite from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: SuiteConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the suite
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Suite name cannot be empty".to_string(),
            });
        }

        if self.checks.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: format!("Suite '{}' defines no checks", self.name),
            });
        }

        if self.diagnostics.max_rows == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "diagnostics.max_rows must be at least 1".to_string(),
            });
        }

        for (i, check) in self.checks.iter().enumerate() {
            check.validate(i)?;
        }

        Ok(())
    }

    /// Whether any check compares against the secondary database
    pub fn needs_secondary(&self) -> bool {
        self.checks.iter().any(CheckDef::needs_secondary)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
