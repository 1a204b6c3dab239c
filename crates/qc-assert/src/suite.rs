//! Suite execution: run every check of a [`SuiteConfig`]

use crate::checker::Checker;
use crate::error::{AssertError, AssertResult};
use crate::executor::Query;
use crate::referential::ForeignKey;
use crate::reporter::{AssertionOutcome, Reporter, Summary};
use qc_core::{CheckDef, SuiteConfig};
use qc_db::AsDatabase;
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};

/// A check that could not produce an outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckError {
    /// Check label (name or `<kind> #<n>`)
    pub check: String,

    /// Error message
    pub message: String,
}

/// Result of running a suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Number of checks started
    pub checks_run: usize,

    /// Outcome counts across all checks
    pub summary: Summary,

    /// Checks that stopped with an error
    pub errors: Vec<CheckError>,

    /// Total execution time
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl SuiteReport {
    /// Every outcome passed and no check errored
    pub fn all_passed(&self) -> bool {
        self.summary.all_passed() && self.errors.is_empty()
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Runs suite checks against a primary and an optional secondary database
pub struct SuiteRunner<'a> {
    primary: &'a dyn AsDatabase,
    secondary: Option<&'a dyn AsDatabase>,
    fail_fast: bool,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(primary: &'a dyn AsDatabase) -> Self {
        Self {
            primary,
            secondary: None,
            fail_fast: false,
        }
    }

    /// Reference database for `row_totals` and `row_subtotals`
    pub fn with_secondary(mut self, secondary: &'a dyn AsDatabase) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Stop after the first failed or errored check
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Run the suite's checks in order, reporting every outcome.
    ///
    /// Errors are captured per check and the run moves on to the next one.
    pub fn run(&self, suite: &SuiteConfig, reporter: &mut dyn Reporter) -> SuiteReport {
        let start = Instant::now();
        let mut tally = Tally::new(reporter);
        let mut errors = Vec::new();
        let mut checks_run = 0;

        for (index, check) in suite.checks.iter().enumerate() {
            let label = check.label(index);
            checks_run += 1;
            log::debug!("Running check {}: {}", checks_run, label);

            let failed_before = tally.summary.failed;
            let mut checker = Checker::with_options(&mut tally, suite.diagnostics.clone());
            let errored = match self.dispatch(&mut checker, check) {
                Ok(()) => false,
                Err(e) => {
                    log::debug!("Check '{}' errored: {}", label, e);
                    errors.push(CheckError {
                        check: label,
                        message: e.to_string(),
                    });
                    true
                }
            };

            if self.fail_fast && (errored || tally.summary.failed > failed_before) {
                log::debug!("Stopping after first failure");
                break;
            }
        }

        SuiteReport {
            checks_run,
            summary: tally.summary,
            errors,
            duration: start.elapsed(),
        }
    }

    fn dispatch(&self, checker: &mut Checker<'_>, check: &CheckDef) -> AssertResult<()> {
        let db = self.primary;
        match check {
            CheckDef::IsRows {
                name,
                sql,
                expected,
                mode,
            } => {
                checker.is_rows(db, Query::new(sql, *mode), *expected, name.as_deref())?;
            }
            CheckDef::CmpRows {
                name,
                sql,
                op,
                expected,
                mode,
            } => {
                checker.cmp_rows(db, Query::new(sql, *mode), *op, *expected, name.as_deref())?;
            }
            CheckDef::IsRowsZero {
                name,
                sql,
                diag,
                mode,
            } => {
                checker.is_rows_zero(
                    db,
                    Query::new(sql, *mode),
                    name.as_deref(),
                    diag.as_deref(),
                )?;
            }
            CheckDef::IsRowsNonzero { name, sql, mode } => {
                checker.is_rows_nonzero(db, Query::new(sql, *mode), name.as_deref())?;
            }
            CheckDef::RowTotals {
                name,
                sql,
                tolerance,
                mode,
            } => {
                let Some(secondary) = self.secondary else {
                    return Err(AssertError::MissingSecondary);
                };
                checker.row_totals(
                    db,
                    secondary,
                    Query::new(sql, *mode),
                    *tolerance,
                    name.as_deref(),
                )?;
            }
            CheckDef::RowSubtotals {
                name,
                sql,
                tolerance,
            } => {
                let Some(secondary) = self.secondary else {
                    return Err(AssertError::MissingSecondary);
                };
                checker.row_subtotals(db, secondary, sql, *tolerance, name.as_deref())?;
            }
            CheckDef::Fk {
                name,
                table1,
                col1,
                table2,
                col2,
                both_ways,
                constraint,
                ignore_null_keys,
                quote_identifiers,
            } => {
                let mut fk = ForeignKey::new(table1, col1, table2)
                    .both_ways(*both_ways)
                    .ignore_null_keys(*ignore_null_keys)
                    .quote_identifiers(*quote_identifiers);
                if let Some(col2) = col2 {
                    fk = fk.column2(col2);
                }
                if let Some(constraint) = constraint {
                    fk = fk.constraint(constraint);
                }
                if let Some(name) = name {
                    fk = fk.name(name);
                }
                checker.fk(db, &fk)?;
            }
        }
        Ok(())
    }
}

/// Forwards outcomes while counting them
struct Tally<'r> {
    inner: &'r mut dyn Reporter,
    summary: Summary,
}

impl<'r> Tally<'r> {
    fn new(inner: &'r mut dyn Reporter) -> Self {
        Self {
            inner,
            summary: Summary::default(),
        }
    }
}

impl Reporter for Tally<'_> {
    fn record(&mut self, outcome: AssertionOutcome) {
        self.summary.total += 1;
        if outcome.passed {
            self.summary.passed += 1;
        } else {
            self.summary.failed += 1;
        }
        self.inner.record(outcome);
    }
}

#[cfg(test)]
#[path = "suite_test.rs"]
mod tests;
