//! Shared fixtures for unit tests

use qc_db::{Database, DbError, DbResult, DuckDbBackend, Row, Value};
use std::sync::Mutex;

/// In-memory DuckDB with a small gene/transcript schema.
///
/// - `gene`: 4 rows, biotypes protein_coding x3 and lncRNA x1
/// - gene 4 points at transcript 99, which does not exist
/// - transcript 30 is not referenced by any gene
pub(crate) fn gene_fixture() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE gene (gene_id INT, biotype VARCHAR, canonical_transcript_id INT);
         INSERT INTO gene VALUES
           (1, 'protein_coding', 10),
           (2, 'protein_coding', 20),
           (3, 'lncRNA', 10),
           (4, 'protein_coding', 99);
         CREATE TABLE transcript (transcript_id INT, biotype VARCHAR);
         INSERT INTO transcript VALUES
           (10, 'protein_coding'),
           (20, 'protein_coding'),
           (30, 'lncRNA');",
    )
    .unwrap();
    db
}

/// Database returning canned results and recording every query it receives
pub(crate) struct FakeDatabase {
    label: String,
    scalar: i64,
    rows: Vec<Row>,
    error: Option<String>,
    executed: Mutex<Vec<String>>,
}

impl FakeDatabase {
    pub(crate) fn with_scalar(label: &str, scalar: i64) -> Self {
        Self {
            label: label.to_string(),
            scalar,
            rows: Vec::new(),
            error: None,
            executed: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_rows(label: &str, rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::with_scalar(label, 0)
        }
    }

    /// Subtotal rows from `(category, count)` pairs
    pub(crate) fn with_subtotals(label: &str, subtotals: &[(&str, i64)]) -> Self {
        let rows = subtotals
            .iter()
            .map(|(category, count)| vec![Value::from(*category), Value::Integer(*count)])
            .collect();
        Self::with_rows(label, rows)
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::with_scalar("failing", 0)
        }
    }

    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    fn log(&self, sql: &str) -> DbResult<()> {
        self.executed.lock().unwrap().push(sql.to_string());
        match &self.error {
            Some(message) => Err(DbError::ExecutionError(message.clone())),
            None => Ok(()),
        }
    }
}

impl Database for FakeDatabase {
    fn query_scalar(&self, sql: &str) -> DbResult<i64> {
        self.log(sql)?;
        Ok(self.scalar)
    }

    fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.log(sql)?;
        Ok(self.rows.clone())
    }

    fn db_type(&self) -> &'static str {
        "fake"
    }

    fn identifier(&self) -> String {
        self.label.clone()
    }
}
