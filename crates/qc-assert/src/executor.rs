//! Query execution: scalar counts or fetched rows

use qc_core::QueryMode;
use qc_db::{AsDatabase, DbResult, Row};

/// SQL text plus how it should be executed
///
/// Plain strings convert with [`QueryMode::Auto`], so most callers pass
/// `&str` directly; use [`Query::scalar`] or [`Query::rows`] when the
/// text heuristic would misclassify the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query<'a> {
    pub sql: &'a str,
    pub mode: QueryMode,
}

impl<'a> Query<'a> {
    pub fn new(sql: &'a str, mode: QueryMode) -> Self {
        Self { sql, mode }
    }

    /// Force execution as a single-value count query
    pub fn scalar(sql: &'a str) -> Self {
        Self::new(sql, QueryMode::Scalar)
    }

    /// Force execution as a row-fetching query
    pub fn rows(sql: &'a str) -> Self {
        Self::new(sql, QueryMode::Rows)
    }

    /// Whether this query runs as a scalar count
    pub fn is_scalar(&self) -> bool {
        self.mode.is_scalar(self.sql)
    }
}

impl<'a> From<&'a str> for Query<'a> {
    fn from(sql: &'a str) -> Self {
        Self::new(sql, QueryMode::Auto)
    }
}

impl<'a> From<&'a String> for Query<'a> {
    fn from(sql: &'a String) -> Self {
        Self::new(sql, QueryMode::Auto)
    }
}

/// Count produced by a query, plus the rows when they were fetched
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub count: i64,
    pub rows: Option<Vec<Row>>,
}

/// Execute a query against any connection or connection holder.
///
/// Scalar queries return the first column of the first row as the count;
/// row queries return the number of rows and keep the rows for
/// diagnostics. Database errors are returned unchanged.
pub fn execute<'q, D>(db: &D, query: impl Into<Query<'q>>) -> DbResult<QueryResult>
where
    D: AsDatabase + ?Sized,
{
    let query = query.into();
    let conn = db.database();
    if query.is_scalar() {
        log::debug!("[{}] scalar: {}", db.label(), query.sql);
        let count = conn.query_scalar(query.sql)?;
        Ok(QueryResult { count, rows: None })
    } else {
        log::debug!("[{}] rows: {}", db.label(), query.sql);
        let rows = conn.query_rows(query.sql)?;
        Ok(QueryResult {
            count: rows.len() as i64,
            rows: Some(rows),
        })
    }
}
