//! Validation report integration tests

use bioeq::validation::*;

#[test]
fn test_report_counts() {
    let mut report = ValidationReport::new("Test_Report", "0.2.0");
    assert!(report.add_result("Passing Test", 10.0, 10.0, 1e-6));
    assert!(!report.add_result("Failing Test", 10.0, 11.0, 1e-6));

    assert_eq!(report.summary.total_tests, 2);
    assert_eq!(report.summary.passed_tests, 1);
    assert_eq!(report.summary.failed_tests, 1);
    assert_eq!(report.summary.pass_rate, 50.0);
    assert!(!report.all_passed());

    assert_eq!(report.validation_results[1].test_name, "Failing Test");
    assert_eq!(report.validation_results[1].actual, 11.0);
}

#[test]
fn test_builtin_checks_pass() {
    let mut report = ValidationReport::new("NCA", "0.2.0");
    assert!(validate_auc_calculation(&mut report));
    assert!(validate_cmax_calculation(&mut report));

    assert_eq!(report.validation_results[0].test_name, "AUC Calculation");
    assert_eq!(report.validation_results[1].test_name, "Cmax Calculation");
    assert_eq!(report.validation_results[1].expected, 10.0);
    assert!(report.all_passed());
}

#[test]
fn test_report_serializes() {
    let mut report = ValidationReport::new("NCA", "0.2.0");
    validate_auc_calculation(&mut report);
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["report_name"], "NCA");
    assert_eq!(json["summary"]["total_tests"], 1);
}
