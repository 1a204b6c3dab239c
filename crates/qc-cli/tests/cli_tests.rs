//! CLI integration tests for `qc run` and `qc validate`
//!
//! Exit codes: 0 when every check passes, 2 on check failures or check
//! errors, 1 when the suite cannot be loaded or a database cannot be opened.

use qc_db::DuckDbBackend;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the compiled qc binary (resolved at compile time)
fn qc_bin() -> String {
    env!("CARGO_BIN_EXE_qc").to_string()
}

fn qc(dir: &Path, args: &[&str]) -> Output {
    Command::new(qc_bin())
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run qc")
}

fn combined(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn project(checks: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    {
        let db = DuckDbBackend::from_path(&temp.path().join("core.duckdb")).unwrap();
        db.execute_batch(
            "CREATE TABLE gene (gene_id INT, transcript_id INT);
             CREATE TABLE transcript (transcript_id INT);
             INSERT INTO gene VALUES (1, 10), (2, 20);
             INSERT INTO transcript VALUES (10), (20);",
        )
        .unwrap();
    }
    let suite = format!(
        "name: core\ndatabases:\n  primary: {{ path: core.duckdb }}\nchecks:\n{}",
        checks
    );
    fs::write(temp.path().join("qc.yml"), suite).unwrap();
    temp
}

// ── qc run ──────────────────────────────────────────────────────────────

#[test]
fn test_run_passing_suite_exits_zero() {
    let temp = project(
        "  - kind: is_rows\n    sql: \"SELECT COUNT(*) FROM gene\"\n    expected: 2\n\
         \x20 - kind: fk\n    table1: gene\n    col1: transcript_id\n    table2: transcript\n    both_ways: true\n",
    );
    let output = qc(temp.path(), &["run"]);

    assert_eq!(output.status.code(), Some(0), "{}", combined(&output));
    assert!(combined(&output).contains("Passed: 3, Failed: 0, Errors: 0"));
}

#[test]
fn test_run_failing_suite_exits_two() {
    let temp = project("  - kind: is_rows_zero\n    sql: \"SELECT * FROM gene\"\n    diag: Gene\n");
    let output = qc(temp.path(), &["run", "--format", "tap"]);

    assert_eq!(output.status.code(), Some(2), "{}", combined(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("not ok 1 -"), "{}", stdout);
    assert!(stdout.contains("# Gene (1, 10)"), "{}", stdout);
}

#[test]
fn test_run_check_error_exits_two() {
    let temp = project("  - kind: is_rows\n    sql: \"SELECT COUNT(*) FROM exon\"\n    expected: 0\n");
    let output = qc(temp.path(), &["run"]);

    assert_eq!(output.status.code(), Some(2), "{}", combined(&output));
    assert!(combined(&output).contains("Errors: 1"));
}

#[test]
fn test_run_missing_suite_exits_one() {
    let temp = TempDir::new().unwrap();
    let output = qc(temp.path(), &["run"]);

    assert_eq!(output.status.code(), Some(1), "{}", combined(&output));
    assert!(combined(&output).contains("Failed to load suite"));
}

#[test]
fn test_run_missing_database_exits_one() {
    let temp = project("  - kind: is_rows_nonzero\n    sql: \"SELECT * FROM gene\"\n");
    fs::remove_file(temp.path().join("core.duckdb")).unwrap();
    let output = qc(temp.path(), &["run"]);

    assert_eq!(output.status.code(), Some(1), "{}", combined(&output));
    assert!(combined(&output).contains("[D005] Database file not found"));
    assert!(!temp.path().join("core.duckdb").exists());
}

// ── qc validate ─────────────────────────────────────────────────────────

#[test]
fn test_validate_lists_checks() {
    let temp = project(
        "  - kind: is_rows_nonzero\n    name: has genes\n    sql: \"SELECT * FROM gene\"\n",
    );
    let output = qc(temp.path(), &["validate"]);

    assert!(output.status.success(), "{}", combined(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("has genes [is_rows_nonzero]"), "{}", stdout);
    assert!(stdout.contains("Suite 'core' is valid (1 checks)"), "{}", stdout);
}

#[test]
fn test_validate_rejects_bad_subtotal_sql() {
    let temp = project("  - kind: row_subtotals\n    sql: \"SELECT COUNT(*) FROM gene\"\n");
    let output = qc(temp.path(), &["validate"]);

    assert_eq!(output.status.code(), Some(1), "{}", combined(&output));
    assert!(combined(&output).contains("[C002]"));
}

#[test]
fn test_validate_with_suite_flag() {
    let temp = project("  - kind: is_rows_nonzero\n    sql: \"SELECT * FROM gene\"\n");
    let renamed = temp.path().join("release.yml");
    fs::rename(temp.path().join("qc.yml"), &renamed).unwrap();

    let elsewhere = TempDir::new().unwrap();
    let output = qc(
        elsewhere.path(),
        &["validate", "-s", renamed.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", combined(&output));
}
