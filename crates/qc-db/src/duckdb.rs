//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::value::{Row, Value};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    path: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: ":memory:".to_string(),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: path.display().to_string(),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Execute multiple SQL statements (fixtures, setup scripts)
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }
}

/// Read a column as a [`Value`].
///
/// Integers that fit collapse to `i64` and floats to `f64`. Decimals keep
/// their scale as text; dates, times and timestamps render in ISO form.
/// Nested and other exotic types fall back to their debug rendering.
fn read_value(row: &duckdb::Row<'_>, idx: usize) -> Value {
    let value = match row.get_ref(idx) {
        Ok(v) => v,
        Err(_) => return Value::Null,
    };
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Boolean(b),
        ValueRef::TinyInt(n) => Value::Integer(n.into()),
        ValueRef::SmallInt(n) => Value::Integer(n.into()),
        ValueRef::Int(n) => Value::Integer(n.into()),
        ValueRef::BigInt(n) => Value::Integer(n),
        ValueRef::HugeInt(n) => wide_integer(n),
        ValueRef::UTinyInt(n) => Value::Integer(n.into()),
        ValueRef::USmallInt(n) => Value::Integer(n.into()),
        ValueRef::UInt(n) => Value::Integer(n.into()),
        ValueRef::UBigInt(n) => wide_integer(n),
        ValueRef::Float(f) => Value::Real(f.into()),
        ValueRef::Double(f) => Value::Real(f),
        ValueRef::Decimal(d) => Value::Text(d.to_string()),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Date32(days) => temporal(render_date(days), value),
        ValueRef::Time64(unit, t) => temporal(render_time(to_micros(unit, t)), value),
        ValueRef::Timestamp(unit, t) => temporal(render_timestamp(to_micros(unit, t)), value),
        other => Value::Text(format!("{:?}", other)),
    }
}

/// `i64` when the value fits, its decimal text otherwise
fn wide_integer<T>(n: T) -> Value
where
    T: Copy + ToString + TryInto<i64>,
{
    match n.try_into() {
        Ok(n) => Value::Integer(n),
        Err(_) => Value::Text(n.to_string()),
    }
}

fn temporal(rendered: Option<String>, raw: ValueRef<'_>) -> Value {
    Value::Text(rendered.unwrap_or_else(|| format!("{:?}", raw)))
}

fn to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

/// Days since 1970-01-01 as `YYYY-MM-DD`
fn render_date(days: i32) -> Option<String> {
    let days_from_ce = days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?;
    NaiveDate::from_num_days_from_ce_opt(days_from_ce).map(|d| d.to_string())
}

/// Microseconds since midnight as `HH:MM:SS[.ffffff]`
fn render_time(micros: i64) -> Option<String> {
    let secs = u32::try_from(micros.div_euclid(1_000_000)).ok()?;
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).map(|t| t.to_string())
}

/// Microseconds since the epoch as `YYYY-MM-DD HH:MM:SS[.ffffff]`
fn render_timestamp(micros: i64) -> Option<String> {
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos).map(|dt| dt.naive_utc().to_string())
}

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

impl Database for DuckDbBackend {
    fn query_scalar(&self, sql: &str) -> DbResult<i64> {
        let conn = self.lock()?;
        let count: Option<i64> = conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
        // SUM over an empty set and friends
        Ok(count.unwrap_or(0))
    }

    fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(DbError::from)?;

        // DuckDB 1.4 panics on `stmt.column_count()` before execution, so the
        // column count is read from each row.
        let rows = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count).map(|i| read_value(row, i)).collect::<Row>())
            })
            .map_err(DbError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::ExecutionError(format!("row error: {}", e)))?;
        Ok(rows)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }

    fn identifier(&self) -> String {
        self.path.clone()
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
