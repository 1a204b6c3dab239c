//! Single-database row count assertions

use crate::checker::{name_or, one_line, Checker};
use crate::error::AssertResult;
use crate::executor::{execute, Query};
use qc_core::Comparator;
use qc_db::value::render_row;
use qc_db::AsDatabase;

impl Checker<'_> {
    /// Pass iff the query's count equals `expected`.
    pub fn is_rows<'q, D>(
        &mut self,
        db: &D,
        query: impl Into<Query<'q>>,
        expected: i64,
        name: Option<&str>,
    ) -> AssertResult<bool>
    where
        D: AsDatabase + ?Sized,
    {
        let query = query.into();
        let result = execute(db, query)?;
        let name = name_or(name, || {
            format!("Row count is {}: {}", expected, one_line(query.sql))
        });
        let diagnostics = vec![format!("got {} rows, expected {}", result.count, expected)];
        Ok(self.report(name, result.count == expected, diagnostics))
    }

    /// Pass iff `count <comparator> expected` holds.
    pub fn cmp_rows<'q, D>(
        &mut self,
        db: &D,
        query: impl Into<Query<'q>>,
        comparator: Comparator,
        expected: i64,
        name: Option<&str>,
    ) -> AssertResult<bool>
    where
        D: AsDatabase + ?Sized,
    {
        let query = query.into();
        let result = execute(db, query)?;
        let name = name_or(name, || {
            format!(
                "Row count {} {}: {}",
                comparator,
                expected,
                one_line(query.sql)
            )
        });
        let diagnostics = vec![format!(
            "got {} rows, expected {} {}",
            result.count, comparator, expected
        )];
        Ok(self.report(
            name,
            comparator.compare(result.count, expected),
            diagnostics,
        ))
    }

    /// Pass iff the query finds nothing.
    ///
    /// When rows were fetched, up to `max_rows` of them are rendered as
    /// `"<diag_prefix> (v1, v2, ...)"`. Beyond that a single extra line gives
    /// the total and where to run the query to see everything.
    pub fn is_rows_zero<'q, D>(
        &mut self,
        db: &D,
        query: impl Into<Query<'q>>,
        name: Option<&str>,
        diag_prefix: Option<&str>,
    ) -> AssertResult<bool>
    where
        D: AsDatabase + ?Sized,
    {
        let query = query.into();
        let result = execute(db, query)?;
        let name = name_or(name, || format!("No rows: {}", one_line(query.sql)));
        if result.count == 0 {
            return Ok(self.report(name, true, Vec::new()));
        }

        let diagnostics = match &result.rows {
            Some(rows) => {
                let max_rows = self.options().max_rows;
                let prefix = diag_prefix.unwrap_or(self.options().prefix.as_str());
                let delimiter = &self.options().delimiter;
                let mut diagnostics: Vec<String> = rows
                    .iter()
                    .take(max_rows)
                    .map(|row| format!("{} ({})", prefix, render_row(row, delimiter)))
                    .collect();
                if rows.len() > max_rows {
                    diagnostics.push(format!(
                        "Reached limit for number of diagnostic messages ({} of {} rows shown); \
                         execute the query against {} to see all results: {}",
                        max_rows,
                        rows.len(),
                        db.label(),
                        one_line(query.sql)
                    ));
                }
                diagnostics
            }
            None => vec![format!("got {} rows, expected 0", result.count)],
        };
        Ok(self.report(name, false, diagnostics))
    }

    /// Pass iff the query finds at least one row.
    pub fn is_rows_nonzero<'q, D>(
        &mut self,
        db: &D,
        query: impl Into<Query<'q>>,
        name: Option<&str>,
    ) -> AssertResult<bool>
    where
        D: AsDatabase + ?Sized,
    {
        let query = query.into();
        let result = execute(db, query)?;
        let name = name_or(name, || format!("Has rows: {}", one_line(query.sql)));
        let diagnostics = vec!["got 0 rows, expected at least 1".to_string()];
        Ok(self.report(name, result.count > 0, diagnostics))
    }
}

#[cfg(test)]
#[path = "count_test.rs"]
mod tests;
