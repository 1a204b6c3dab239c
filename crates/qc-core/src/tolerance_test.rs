use super::*;

#[test]
fn test_default_is_exact() {
    assert_eq!(Tolerance::default(), Tolerance::EXACT);
    assert_eq!(Tolerance::default().ratio(), 1.0);
}

#[test]
fn test_exact_accepts_equal_and_growth() {
    let t = Tolerance::EXACT;
    assert!(t.accepts(100, 100));
    assert!(t.accepts(101, 100));
    assert!(!t.accepts(99, 100));
}

#[test]
fn test_partial_tolerance() {
    let t = Tolerance::new(0.9).unwrap();
    assert!(t.accepts(90, 100));
    assert!(!t.accepts(89, 100));
}

#[test]
fn test_monotonic_in_ratio() {
    // Passing at a ratio implies passing at every smaller ratio
    let (primary, secondary) = (75, 100);
    let ratios = [1.0, 0.9, 0.8, 0.75, 0.5, 0.1];
    let mut seen_pass = false;
    for r in ratios {
        let passed = Tolerance::new(r).unwrap().accepts(primary, secondary);
        if seen_pass {
            assert!(passed, "ratio {} should pass after a larger ratio passed", r);
        }
        seen_pass |= passed;
    }
    assert!(seen_pass);
}

#[test]
fn test_rejects_invalid_ratios() {
    assert!(Tolerance::new(0.0).is_err());
    assert!(Tolerance::new(-0.5).is_err());
    assert!(Tolerance::new(f64::NAN).is_err());
    assert!(Tolerance::new(f64::INFINITY).is_err());
}

#[test]
fn test_ratio_above_one_is_accepted() {
    let t = Tolerance::new(1.1).unwrap();
    assert!(!t.accepts(100, 100));
    assert!(t.accepts(110, 100));
}

#[test]
fn test_percent_and_display() {
    let t = Tolerance::new(0.95).unwrap();
    assert!((t.percent() - 95.0).abs() < 1e-9);
    assert_eq!(t.to_string(), "95%");
    assert_eq!(Tolerance::EXACT.to_string(), "100%");
    assert_eq!(Tolerance::new(0.125).unwrap().to_string(), "12.5%");
}

#[test]
fn test_deserialize_validates() {
    let t: Tolerance = serde_yaml::from_str("0.5").unwrap();
    assert_eq!(t.ratio(), 0.5);
    assert!(serde_yaml::from_str::<Tolerance>("0").is_err());
}
