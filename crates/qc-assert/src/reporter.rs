//! Assertion outcomes and the reporters that record them

use serde::Serialize;
use std::io::Write;

/// Result of a single assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionOutcome {
    /// Assertion name
    pub name: String,

    /// Whether the assertion held
    pub passed: bool,

    /// Diagnostic lines (only ever present on failures)
    pub diagnostics: Vec<String>,
}

impl AssertionOutcome {
    /// Create a passed outcome
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            diagnostics: Vec::new(),
        }
    }

    /// Create a failed outcome
    pub fn fail(name: impl Into<String>, diagnostics: Vec<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            diagnostics,
        }
    }
}

/// Receives the outcome of every assertion
pub trait Reporter {
    /// Record one outcome
    fn record(&mut self, outcome: AssertionOutcome);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn record(&mut self, outcome: AssertionOutcome) {
        (**self).record(outcome)
    }
}

/// Summary of recorded outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    /// Total assertions
    pub total: usize,

    /// Assertions passed
    pub passed: usize,

    /// Assertions failed
    pub failed: usize,
}

impl Summary {
    /// Create a summary from outcomes
    pub fn from_outcomes(outcomes: &[AssertionOutcome]) -> Self {
        let passed = outcomes.iter().filter(|o| o.passed).count();
        Self {
            total: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
        }
    }

    /// Check if every assertion passed
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// In-memory reporter keeping every outcome in order
#[derive(Debug, Default)]
pub struct Recorder {
    outcomes: Vec<AssertionOutcome>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> &[AssertionOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<AssertionOutcome> {
        self.outcomes
    }

    /// The most recent outcome
    pub fn last(&self) -> Option<&AssertionOutcome> {
        self.outcomes.last()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_outcomes(&self.outcomes)
    }
}

impl Reporter for Recorder {
    fn record(&mut self, outcome: AssertionOutcome) {
        self.outcomes.push(outcome);
    }
}

/// Streams outcomes in TAP format (`ok 1 - name`, `# diagnostic`)
///
/// The `1..N` plan is written by [`TapReporter::finish`].
pub struct TapReporter<W: Write> {
    out: W,
    count: usize,
    summary: Summary,
}

impl<W: Write> TapReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            count: 0,
            summary: Summary::default(),
        }
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Write the plan line and hand back the writer
    pub fn finish(mut self) -> std::io::Result<W> {
        writeln!(self.out, "1..{}", self.count)?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_outcome(&mut self, outcome: &AssertionOutcome) -> std::io::Result<()> {
        let status = if outcome.passed { "ok" } else { "not ok" };
        writeln!(self.out, "{} {} - {}", status, self.count, outcome.name)?;
        for line in outcome.diagnostics.iter().flat_map(|d| d.lines()) {
            writeln!(self.out, "# {}", line)?;
        }
        Ok(())
    }
}

impl<W: Write> Reporter for TapReporter<W> {
    fn record(&mut self, outcome: AssertionOutcome) {
        self.count += 1;
        self.summary.total += 1;
        if outcome.passed {
            self.summary.passed += 1;
        } else {
            self.summary.failed += 1;
        }
        if let Err(e) = self.write_outcome(&outcome) {
            log::warn!("Failed to write TAP line for '{}': {}", outcome.name, e);
        }
    }
}

#[cfg(test)]
#[path = "reporter_test.rs"]
mod tests;
