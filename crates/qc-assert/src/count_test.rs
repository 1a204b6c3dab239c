use super::*;
use crate::error::AssertError;
use crate::reporter::Recorder;
use crate::test_support::{gene_fixture, FakeDatabase};
use qc_core::DiagnosticConfig;
use qc_db::{Row, Value};

#[test]
fn test_is_rows_pass() {
    let db = gene_fixture();
    let mut recorder = Recorder::new();
    let passed = Checker::new(&mut recorder)
        .is_rows(&db, "SELECT COUNT(*) FROM gene", 4, Some("four genes"))
        .unwrap();

    assert!(passed);
    let outcome = recorder.last().unwrap();
    assert_eq!(outcome.name, "four genes");
    assert!(outcome.passed);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_is_rows_matches_true_count_only() {
    let db = gene_fixture();
    let mut recorder = Recorder::new();
    let mut checker = Checker::new(&mut recorder);
    for expected in 0..8 {
        let passed = checker
            .is_rows(&db, "SELECT COUNT(*) FROM gene", expected, None)
            .unwrap();
        assert_eq!(passed, expected == 4, "expected {}", expected);
    }
    assert_eq!(recorder.summary().total, 8);
    assert_eq!(recorder.summary().passed, 1);
}

#[test]
fn test_is_rows_fail_has_diagnostic_and_default_name() {
    let db = gene_fixture();
    let mut recorder = Recorder::new();
    let passed = Checker::new(&mut recorder)
        .is_rows(&db, "SELECT gene_id\n  FROM gene", 3, None)
        .unwrap();

    assert!(!passed);
    let outcome = recorder.last().unwrap();
    assert_eq!(outcome.name, "Row count is 3: SELECT gene_id FROM gene");
    assert_eq!(outcome.diagnostics, vec!["got 4 rows, expected 3".to_string()]);
}

#[test]
fn test_cmp_rows_operators() {
    let db = gene_fixture();
    let sql = "SELECT COUNT(*) FROM gene";
    let mut recorder = Recorder::new();
    let mut checker = Checker::new(&mut recorder);

    assert!(checker.cmp_rows(&db, sql, Comparator::Ge, 4, None).unwrap());
    assert!(checker.cmp_rows(&db, sql, Comparator::Gt, 3, None).unwrap());
    assert!(checker.cmp_rows(&db, sql, Comparator::Ne, 5, None).unwrap());
    assert!(!checker.cmp_rows(&db, sql, Comparator::Lt, 4, None).unwrap());
    assert!(checker.cmp_rows(&db, sql, Comparator::Le, 4, None).unwrap());
    assert!(!checker.cmp_rows(&db, sql, Comparator::Eq, 0, None).unwrap());

    let failed: Vec<_> = recorder.outcomes().iter().filter(|o| !o.passed).collect();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0].diagnostics, vec!["got 4 rows, expected < 4".to_string()]);
    assert!(failed[0].name.starts_with("Row count < 4"));
}

#[test]
fn test_is_rows_zero_pass() {
    let db = gene_fixture();
    let mut recorder = Recorder::new();
    let passed = Checker::new(&mut recorder)
        .is_rows_zero(&db, "SELECT * FROM gene WHERE gene_id > 100", None, None)
        .unwrap();
    assert!(passed);
    assert!(recorder.last().unwrap().diagnostics.is_empty());
}

#[test]
fn test_is_rows_zero_renders_offending_rows() {
    let db = gene_fixture();
    let mut recorder = Recorder::new();
    let passed = Checker::new(&mut recorder)
        .is_rows_zero(
            &db,
            "SELECT gene_id, biotype FROM gene WHERE biotype = 'protein_coding' ORDER BY gene_id",
            Some("no protein coding genes"),
            Some("Coding gene"),
        )
        .unwrap();

    assert!(!passed);
    assert_eq!(
        recorder.last().unwrap().diagnostics,
        vec![
            "Coding gene (1, protein_coding)".to_string(),
            "Coding gene (2, protein_coding)".to_string(),
            "Coding gene (4, protein_coding)".to_string(),
        ]
    );
}

#[test]
fn test_is_rows_zero_default_prefix_and_nulls() {
    let db = gene_fixture();
    let mut recorder = Recorder::new();
    Checker::new(&mut recorder)
        .is_rows_zero(
            &db,
            "SELECT gene_id, NULL AS missing FROM gene WHERE gene_id = 1",
            None,
            None,
        )
        .unwrap();
    assert_eq!(
        recorder.last().unwrap().diagnostics,
        vec!["Unexpected data (1, NULL)".to_string()]
    );
}

#[test]
fn test_is_rows_zero_renders_typed_columns() {
    let db = gene_fixture();
    db.execute_batch(
        "CREATE TABLE release (score DECIMAL(10,2), released DATE);
         INSERT INTO release VALUES (1.50, DATE '2024-01-15');",
    )
    .unwrap();
    let mut recorder = Recorder::new();
    Checker::new(&mut recorder)
        .is_rows_zero(&db, "SELECT score, released FROM release", None, None)
        .unwrap();
    assert_eq!(
        recorder.last().unwrap().diagnostics,
        vec!["Unexpected data (1.50, 2024-01-15)".to_string()]
    );
}

#[test]
fn test_is_rows_zero_scalar_failure() {
    let db = gene_fixture();
    let mut recorder = Recorder::new();
    let passed = Checker::new(&mut recorder)
        .is_rows_zero(&db, "SELECT COUNT(*) FROM gene", None, None)
        .unwrap();
    assert!(!passed);
    assert_eq!(
        recorder.last().unwrap().diagnostics,
        vec!["got 4 rows, expected 0".to_string()]
    );
}

#[test]
fn test_is_rows_zero_caps_diagnostics() {
    let rows: Vec<Row> = (1..=15).map(|i| vec![Value::Integer(i)]).collect();
    let db = FakeDatabase::with_rows("core_db", rows);
    let mut recorder = Recorder::new();
    let passed = Checker::new(&mut recorder)
        .is_rows_zero(&db, "SELECT gene_id FROM gene", None, None)
        .unwrap();

    assert!(!passed);
    let diagnostics = &recorder.last().unwrap().diagnostics;
    assert_eq!(diagnostics.len(), 11);
    assert_eq!(diagnostics[0], "Unexpected data (1)");
    assert_eq!(diagnostics[9], "Unexpected data (10)");
    let summary = &diagnostics[10];
    assert!(summary.contains("15 rows"), "{}", summary);
    assert!(summary.contains("core_db"), "{}", summary);
    assert!(summary.contains("SELECT gene_id FROM gene"), "{}", summary);
}

#[test]
fn test_is_rows_zero_exactly_at_cap_has_no_summary() {
    let rows: Vec<Row> = (1..=10).map(|i| vec![Value::Integer(i)]).collect();
    let db = FakeDatabase::with_rows("core_db", rows);
    let mut recorder = Recorder::new();
    Checker::new(&mut recorder)
        .is_rows_zero(&db, "SELECT gene_id FROM gene", None, None)
        .unwrap();
    assert_eq!(recorder.last().unwrap().diagnostics.len(), 10);
}

#[test]
fn test_is_rows_zero_custom_limits() {
    let rows: Vec<Row> = (1..=4)
        .map(|i| vec![Value::Integer(i), Value::from("x")])
        .collect();
    let db = FakeDatabase::with_rows("core_db", rows);
    let mut recorder = Recorder::new();
    let options = DiagnosticConfig {
        max_rows: 2,
        delimiter: "|".to_string(),
        prefix: "Row".to_string(),
    };
    Checker::with_options(&mut recorder, options)
        .is_rows_zero(&db, "SELECT * FROM t", None, None)
        .unwrap();

    let diagnostics = &recorder.last().unwrap().diagnostics;
    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics[0], "Row (1|x)");
    assert_eq!(diagnostics[1], "Row (2|x)");
}

#[test]
fn test_is_rows_nonzero() {
    let db = gene_fixture();
    let mut recorder = Recorder::new();
    let mut checker = Checker::new(&mut recorder);
    assert!(checker
        .is_rows_nonzero(&db, "SELECT * FROM gene", None)
        .unwrap());
    assert!(!checker
        .is_rows_nonzero(&db, "SELECT COUNT(*) FROM gene WHERE gene_id < 0", None)
        .unwrap());
    assert_eq!(recorder.summary().failed, 1);
}

#[test]
fn test_execution_error_propagates_without_outcome() {
    let db = FakeDatabase::failing("connection reset");
    let mut recorder = Recorder::new();
    let err = Checker::new(&mut recorder)
        .is_rows(&db, "SELECT COUNT(*) FROM gene", 1, None)
        .unwrap_err();

    assert!(matches!(err, AssertError::Database(_)));
    assert!(!err.is_configuration());
    assert!(recorder.outcomes().is_empty());
}
