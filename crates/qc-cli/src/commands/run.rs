//! Run command implementation

use anyhow::{Context, Result};
use qc_assert::{AssertionOutcome, Recorder, Reporter, SuiteReport, SuiteRunner, TapReporter};
use qc_core::{DatabaseConfig, SuiteConfig};
use qc_db::Target;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::{GlobalArgs, OutputFormat, RunArgs};
use crate::commands::common::load_suite;

/// Execute the run command
pub(crate) fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run_suite(args, global, &mut out)?;
    out.flush()?;

    if !report.all_passed() {
        // Exit code 2 = check failures or check errors
        std::process::exit(2);
    }
    Ok(())
}

/// Load the suite, open its databases, run every check and write the results
pub(crate) fn run_suite(
    args: &RunArgs,
    global: &GlobalArgs,
    out: &mut dyn Write,
) -> Result<SuiteReport> {
    let suite = load_suite(global)?;
    let config = &suite.config;

    let primary_config = args
        .primary
        .as_deref()
        .map(path_config)
        .or_else(|| config.databases.primary.clone())
        .context("No primary database: set databases.primary in the suite or pass --primary")?;
    let primary = open_target(&primary_config, &suite.root, global)?;

    let secondary_config = args
        .secondary
        .as_deref()
        .map(path_config)
        .or_else(|| config.databases.secondary.clone());
    let secondary = secondary_config
        .map(|c| open_target(&c, &suite.root, global))
        .transpose()?;

    if secondary.is_none() && config.needs_secondary() && global.verbose {
        eprintln!("[verbose] No secondary database; comparative checks will error");
    }

    let mut runner = SuiteRunner::new(&primary).fail_fast(args.fail_fast);
    if let Some(secondary) = &secondary {
        runner = runner.with_secondary(secondary);
    }

    match args.format {
        OutputFormat::Text => write_text(&runner, config, out),
        OutputFormat::Tap => write_tap(&runner, config, out),
        OutputFormat::Json => write_json(&runner, config, out),
    }
}

fn path_config(path: &str) -> DatabaseConfig {
    DatabaseConfig {
        path: path.to_string(),
        label: None,
    }
}

fn open_target(config: &DatabaseConfig, root: &Path, global: &GlobalArgs) -> Result<Target> {
    let target = Target::open(config, root)
        .with_context(|| format!("Failed to open database {}", config.path))?;
    if global.verbose {
        eprintln!("[verbose] Opened database {:?}", target);
    }
    Ok(target)
}

/// Prints one line per outcome with diagnostics indented below failures
struct TextReporter<'w> {
    out: &'w mut dyn Write,
}

impl TextReporter<'_> {
    fn write_outcome(&mut self, outcome: &AssertionOutcome) -> io::Result<()> {
        let mark = if outcome.passed { "✓" } else { "✗" };
        writeln!(self.out, "  {} {}", mark, outcome.name)?;
        for line in &outcome.diagnostics {
            writeln!(self.out, "      {}", line)?;
        }
        Ok(())
    }
}

impl Reporter for TextReporter<'_> {
    fn record(&mut self, outcome: AssertionOutcome) {
        if let Err(e) = self.write_outcome(&outcome) {
            log::warn!("Failed to write result for '{}': {}", outcome.name, e);
        }
    }
}

fn write_text(
    runner: &SuiteRunner<'_>,
    config: &SuiteConfig,
    out: &mut dyn Write,
) -> Result<SuiteReport> {
    writeln!(
        out,
        "Running {} checks from suite '{}'...\n",
        config.checks.len(),
        config.name
    )?;

    let report = runner.run(config, &mut TextReporter { out: &mut *out });

    if !report.errors.is_empty() {
        writeln!(out, "\nErrors:")?;
        for error in &report.errors {
            writeln!(out, "  ✗ {} - {}", error.check, error.message)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Passed: {}, Failed: {}, Errors: {} [{}ms]",
        report.summary.passed,
        report.summary.failed,
        report.errors.len(),
        report.duration.as_millis()
    )?;
    Ok(report)
}

fn write_tap(
    runner: &SuiteRunner<'_>,
    config: &SuiteConfig,
    out: &mut dyn Write,
) -> Result<SuiteReport> {
    let mut tap = TapReporter::new(&mut *out);
    let report = runner.run(config, &mut tap);
    let out = tap.finish().context("Failed to write TAP output")?;
    for error in &report.errors {
        writeln!(out, "# ERROR {}: {}", error.check, error.message)?;
    }
    Ok(report)
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    suite: &'a str,
    outcomes: &'a [AssertionOutcome],
    report: &'a SuiteReport,
}

fn write_json(
    runner: &SuiteRunner<'_>,
    config: &SuiteConfig,
    out: &mut dyn Write,
) -> Result<SuiteReport> {
    let mut recorder = Recorder::new();
    let report = runner.run(config, &mut recorder);
    let output = JsonOutput {
        suite: &config.name,
        outcomes: recorder.outcomes(),
        report: &report,
    };
    serde_json::to_writer_pretty(&mut *out, &output).context("Failed to serialize results")?;
    writeln!(out)?;
    Ok(report)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
