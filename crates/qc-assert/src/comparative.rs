//! Primary-versus-secondary database comparisons
//!
//! The primary database is the new or current one; the secondary is the
//! reference it is compared against. Both checks fail when the primary
//! count drops below `tolerance` times the secondary count. Growth in the
//! primary, including categories that only exist there, never fails.

use crate::checker::{name_or, one_line, Checker};
use crate::error::{AssertError, AssertResult};
use crate::executor::{execute, Query};
use qc_core::sql_utils::is_subtotal_query;
use qc_core::Tolerance;
use qc_db::value::render_row;
use qc_db::{AsDatabase, Row, Value};
use std::collections::BTreeMap;

/// Category -> count, from a two-column grouped query
///
/// A NULL category is keyed as `None`, apart from any text category that
/// happens to read `NULL`.
pub type SubtotalMap = BTreeMap<Option<String>, i64>;

/// Build a subtotal map from `(category, count)` rows.
///
/// The category is the first column rendered as text. Rows whose second
/// column is not an integer are rejected.
pub fn subtotal_map(rows: &[Row], database: &str) -> AssertResult<SubtotalMap> {
    let mut map = SubtotalMap::new();
    for row in rows {
        let count = match row.as_slice() {
            [_, count, ..] => count.as_count(),
            _ => None,
        }
        .ok_or_else(|| AssertError::InvalidSubtotalRow {
            database: database.to_string(),
            row: render_row(row, ", "),
        })?;
        let category = match &row[0] {
            Value::Null => None,
            value => Some(value.to_string()),
        };
        *map.entry(category).or_insert(0) += count;
    }
    Ok(map)
}

/// Compare subtotals, returning one diagnostic per failing category.
///
/// Only categories present in `secondary` are examined; a category missing
/// from `primary` counts as 0. An empty result means the comparison passed.
pub fn compare_subtotals(
    primary: &SubtotalMap,
    secondary: &SubtotalMap,
    tolerance: Tolerance,
) -> Vec<String> {
    secondary
        .iter()
        .filter_map(|(category, &secondary_count)| {
            let primary_count = primary.get(category).copied().unwrap_or(0);
            if tolerance.accepts(primary_count, secondary_count) {
                None
            } else {
                Some(format!(
                    "Lower count than expected for {}: primary {} < secondary {} (at {} tolerance)",
                    category.as_deref().unwrap_or("NULL"),
                    primary_count,
                    secondary_count,
                    tolerance
                ))
            }
        })
        .collect()
}

impl Checker<'_> {
    /// Pass iff `secondary_count * tolerance <= primary_count`.
    ///
    /// The primary database is queried first.
    pub fn row_totals<'q, P, S>(
        &mut self,
        primary: &P,
        secondary: &S,
        query: impl Into<Query<'q>>,
        tolerance: Tolerance,
        name: Option<&str>,
    ) -> AssertResult<bool>
    where
        P: AsDatabase + ?Sized,
        S: AsDatabase + ?Sized,
    {
        let query = query.into();
        let primary_count = execute(primary, query)?.count;
        let secondary_count = execute(secondary, query)?.count;
        let name = name_or(name, || {
            format!(
                "Row totals within {} tolerance: {}",
                tolerance,
                one_line(query.sql)
            )
        });
        let diagnostics = vec![format!(
            "Primary count {} ({}) is lower than {} of secondary count {} ({})",
            primary_count,
            primary.label(),
            tolerance,
            secondary_count,
            secondary.label()
        )];
        Ok(self.report(
            name,
            tolerance.accepts(primary_count, secondary_count),
            diagnostics,
        ))
    }

    /// Compare per-category counts of a grouped query.
    ///
    /// `sql` must select a single category column, then a count expression,
    /// then `GROUP BY`; anything else is a configuration error returned
    /// before either database is queried. A single outcome is reported,
    /// carrying one diagnostic per failing category.
    pub fn row_subtotals<P, S>(
        &mut self,
        primary: &P,
        secondary: &S,
        sql: &str,
        tolerance: Tolerance,
        name: Option<&str>,
    ) -> AssertResult<bool>
    where
        P: AsDatabase + ?Sized,
        S: AsDatabase + ?Sized,
    {
        if !is_subtotal_query(sql) {
            return Err(AssertError::MalformedSubtotalQuery {
                sql: one_line(sql),
            });
        }

        let primary_map = fetch_subtotals(primary, sql)?;
        let secondary_map = fetch_subtotals(secondary, sql)?;
        let diagnostics = compare_subtotals(&primary_map, &secondary_map, tolerance);

        let name = name_or(name, || {
            format!(
                "Row subtotals within {} tolerance: {}",
                tolerance,
                one_line(sql)
            )
        });
        let passed = diagnostics.is_empty();
        Ok(self.report(name, passed, diagnostics))
    }
}

fn fetch_subtotals<D: AsDatabase + ?Sized>(db: &D, sql: &str) -> AssertResult<SubtotalMap> {
    let rows = execute(db, Query::rows(sql))?.rows.unwrap_or_default();
    subtotal_map(&rows, &db.label())
}

#[cfg(test)]
#[path = "comparative_test.rs"]
mod tests;
