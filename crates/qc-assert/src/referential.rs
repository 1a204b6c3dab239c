//! Foreign key orphan checks

use crate::checker::Checker;
use crate::error::AssertResult;
use crate::executor::Query;
use qc_core::sql_utils::{append_constraint, quote_ident, quote_qualified};
use qc_db::AsDatabase;

/// A foreign key relationship from `table1.col1` to `table2.col2`
///
/// Table and column names are spliced into SQL as given unless
/// [`quote_identifiers`](ForeignKey::quote_identifiers) is set, so they must
/// come from a trusted source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    table1: String,
    col1: String,
    table2: String,
    col2: Option<String>,
    both_ways: bool,
    constraint: Option<String>,
    name: Option<String>,
    ignore_null_keys: bool,
    quote_identifiers: bool,
}

impl ForeignKey {
    /// `table1.col1` must reference `table2.col1` unless [`column2`](Self::column2) is set
    pub fn new(
        table1: impl Into<String>,
        col1: impl Into<String>,
        table2: impl Into<String>,
    ) -> Self {
        Self {
            table1: table1.into(),
            col1: col1.into(),
            table2: table2.into(),
            col2: None,
            both_ways: false,
            constraint: None,
            name: None,
            ignore_null_keys: false,
            quote_identifiers: false,
        }
    }

    pub fn column2(mut self, col2: impl Into<String>) -> Self {
        self.col2 = Some(col2.into());
        self
    }

    /// Also require every `table2` row to be referenced from `table1`
    pub fn both_ways(mut self, both_ways: bool) -> Self {
        self.both_ways = both_ways;
        self
    }

    /// Extra SQL condition appended to the orphan filter of each direction
    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Skip rows whose own key is NULL instead of counting them as orphans
    pub fn ignore_null_keys(mut self, ignore: bool) -> Self {
        self.ignore_null_keys = ignore;
        self
    }

    /// Quote table and column names as SQL identifiers
    pub fn quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    pub fn col2(&self) -> &str {
        self.col2.as_deref().unwrap_or(&self.col1)
    }

    pub fn is_both_ways(&self) -> bool {
        self.both_ways
    }

    /// Orphans in `table1`: rows whose key has no match in `table2`
    pub fn left(&self) -> OrphanQuery<'_> {
        OrphanQuery {
            child_table: &self.table1,
            child_column: &self.col1,
            parent_table: &self.table2,
            parent_column: self.col2(),
            constraint: self.constraint.as_deref(),
            ignore_null_keys: self.ignore_null_keys,
            quote_identifiers: self.quote_identifiers,
        }
    }

    /// Orphans in `table2`: rows never referenced from `table1`
    pub fn right(&self) -> OrphanQuery<'_> {
        OrphanQuery {
            child_table: &self.table2,
            child_column: self.col2(),
            parent_table: &self.table1,
            parent_column: &self.col1,
            ..self.left()
        }
    }

    fn left_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.left().default_name(),
        }
    }

    fn right_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} (reverse)", name),
            None => self.right().default_name(),
        }
    }
}

/// Counts rows of a child table whose key has no match in a parent table
///
/// ```text
/// SELECT COUNT(*) FROM child LEFT JOIN parent ON child.key = parent.key
/// WHERE parent.key IS NULL [AND child.key IS NOT NULL] [AND <constraint>]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrphanQuery<'a> {
    pub child_table: &'a str,
    pub child_column: &'a str,
    pub parent_table: &'a str,
    pub parent_column: &'a str,
    pub constraint: Option<&'a str>,
    pub ignore_null_keys: bool,
    pub quote_identifiers: bool,
}

impl OrphanQuery<'_> {
    /// Render the counting SQL
    pub fn to_sql(&self) -> String {
        let (ct, cc, pt, pc) = if self.quote_identifiers {
            (
                quote_qualified(self.child_table),
                quote_ident(self.child_column),
                quote_qualified(self.parent_table),
                quote_ident(self.parent_column),
            )
        } else {
            (
                self.child_table.to_string(),
                self.child_column.to_string(),
                self.parent_table.to_string(),
                self.parent_column.to_string(),
            )
        };

        let mut sql = format!(
            "SELECT COUNT(*) FROM {ct} LEFT JOIN {pt} ON {ct}.{cc} = {pt}.{pc} WHERE {pt}.{pc} IS NULL"
        );
        if self.ignore_null_keys {
            sql.push_str(&format!(" AND {ct}.{cc} IS NOT NULL"));
        }
        append_constraint(&sql, self.constraint)
    }

    fn default_name(&self) -> String {
        format!(
            "No orphaned {}.{} rows (missing {}.{})",
            self.child_table, self.child_column, self.parent_table, self.parent_column
        )
    }
}

impl Checker<'_> {
    /// Check that no `table1` row has a dangling key, and with `both_ways`
    /// that no `table2` row is unreferenced.
    ///
    /// Each direction reports its own outcome; a failure in the first
    /// direction does not skip the second. Database errors stop the check.
    pub fn fk<D>(&mut self, db: &D, fk: &ForeignKey) -> AssertResult<()>
    where
        D: AsDatabase + ?Sized,
    {
        let sql = fk.left().to_sql();
        self.is_rows_zero(db, Query::scalar(&sql), Some(fk.left_name().as_str()), None)?;

        if fk.both_ways {
            let sql = fk.right().to_sql();
            self.is_rows_zero(db, Query::scalar(&sql), Some(fk.right_name().as_str()), None)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "referential_test.rs"]
mod tests;
