//! SQL text utilities
//!
//! Identifier quoting for dynamically built queries, plus the lightweight
//! text heuristics used to classify caller-supplied SQL. None of these
//! functions parse SQL; they inspect the text only.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// How a counting query should be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Classify from the SQL text (see [`is_scalar_count_query`])
    #[default]
    Auto,
    /// The query returns a single count value
    Scalar,
    /// Fetch all rows and count them
    Rows,
}

impl QueryMode {
    /// Resolve to `true` when `sql` should run as a scalar-count query
    pub fn is_scalar(&self, sql: &str) -> bool {
        match self {
            QueryMode::Auto => is_scalar_count_query(sql),
            QueryMode::Scalar => true,
            QueryMode::Rows => false,
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMode::Auto => write!(f, "auto"),
            QueryMode::Scalar => write!(f, "scalar"),
            QueryMode::Rows => write!(f, "rows"),
        }
    }
}

static COUNT_EXPR_RE: OnceLock<Regex> = OnceLock::new();
static GROUP_BY_RE: OnceLock<Regex> = OnceLock::new();
static SUBTOTAL_SHAPE_RE: OnceLock<Regex> = OnceLock::new();

fn count_expr_re() -> &'static Regex {
    COUNT_EXPR_RE.get_or_init(|| Regex::new(r"(?i)\bCOUNT\s*\(").expect("valid regex"))
}

fn group_by_re() -> &'static Regex {
    GROUP_BY_RE.get_or_init(|| Regex::new(r"(?i)\bGROUP\s+BY\b").expect("valid regex"))
}

fn subtotal_shape_re() -> &'static Regex {
    SUBTOTAL_SHAPE_RE.get_or_init(|| {
        Regex::new(r"(?is)^\s*SELECT\s+[^,\s]+\s*,\s*COUNT[^,]+\s+FROM\s.+\sGROUP\s+BY\s+[^,\s]+\s*$")
            .expect("valid regex")
    })
}

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use qc_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("gene"), r#""gene""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `schema.table`).
///
/// Splits on `.` and individually quotes each component.
///
/// # Examples
/// ```
/// use qc_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("gene"), r#""gene""#);
/// assert_eq!(quote_qualified("core.gene"), r#""core"."gene""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Heuristic: does this SQL produce a single scalar count?
///
/// True when the text contains a `COUNT(` expression and no `GROUP BY`,
/// compared case-insensitively. This is a text inspection, not a parse: a
/// `COUNT` inside a subquery of a row-returning statement is misclassified,
/// which is why callers can override the classification explicitly.
///
/// # Examples
/// ```
/// use qc_core::sql_utils::is_scalar_count_query;
/// assert!(is_scalar_count_query("select count(*) from gene"));
/// assert!(!is_scalar_count_query("SELECT biotype, COUNT(*) FROM gene GROUP BY biotype"));
/// assert!(!is_scalar_count_query("SELECT gene_id FROM gene"));
/// ```
pub fn is_scalar_count_query(sql: &str) -> bool {
    count_expr_re().is_match(sql) && !group_by_re().is_match(sql)
}

/// Does this SQL have the two-column grouped shape required for subtotals?
///
/// The accepted shape is a single category column, then a count
/// expression, then `FROM`, then `GROUP BY` on a single column:
///
/// ```text
/// SELECT <category>, COUNT(...) [AS alias] FROM ... GROUP BY <category>
/// ```
///
/// # Examples
/// ```
/// use qc_core::sql_utils::is_subtotal_query;
/// assert!(is_subtotal_query("SELECT biotype, COUNT(*) FROM gene GROUP BY biotype"));
/// assert!(!is_subtotal_query("SELECT COUNT(*) FROM gene"));
/// ```
pub fn is_subtotal_query(sql: &str) -> bool {
    subtotal_shape_re().is_match(sql)
}

/// Append a supplemental filter to a query that already has a `WHERE` clause.
///
/// Returns the query unchanged when the constraint is `None` or blank.
pub fn append_constraint(sql: &str, constraint: Option<&str>) -> String {
    match constraint.map(str::trim) {
        Some(c) if !c.is_empty() => format!("{sql} AND {c}"),
        _ => sql.to_string(),
    }
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
