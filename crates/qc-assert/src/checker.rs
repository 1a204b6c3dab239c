//! The assertion front end shared by every check family

use crate::reporter::{AssertionOutcome, Reporter};
use qc_core::DiagnosticConfig;

/// Runs assertions and reports each outcome to a [`Reporter`].
///
/// The row-count checks live in [`count`](crate::count), the
/// primary-versus-secondary checks in [`comparative`](crate::comparative)
/// and the foreign key checks in [`referential`](crate::referential).
/// The checker holds no state between calls beyond the borrowed reporter.
pub struct Checker<'r> {
    reporter: &'r mut dyn Reporter,
    options: DiagnosticConfig,
}

impl<'r> Checker<'r> {
    /// Create a checker with default diagnostic limits (10 rows)
    pub fn new(reporter: &'r mut dyn Reporter) -> Self {
        Self::with_options(reporter, DiagnosticConfig::default())
    }

    /// Create a checker with explicit diagnostic limits
    pub fn with_options(reporter: &'r mut dyn Reporter, options: DiagnosticConfig) -> Self {
        Self { reporter, options }
    }

    pub fn options(&self) -> &DiagnosticConfig {
        &self.options
    }

    /// Record one outcome; diagnostics are dropped when the assertion passed.
    pub(crate) fn report(&mut self, name: String, passed: bool, diagnostics: Vec<String>) -> bool {
        let outcome = if passed {
            AssertionOutcome::pass(name)
        } else {
            AssertionOutcome::fail(name, diagnostics)
        };
        log::debug!(
            "{} {}",
            if outcome.passed { "PASS" } else { "FAIL" },
            outcome.name
        );
        self.reporter.record(outcome);
        passed
    }
}

/// Collapse SQL whitespace onto one line for names and diagnostics
pub(crate) fn one_line(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The caller's name, or a default built lazily
pub(crate) fn name_or(name: Option<&str>, default: impl FnOnce() -> String) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => default(),
    }
}
