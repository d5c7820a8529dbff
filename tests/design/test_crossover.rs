//! 2x2 crossover analyses

use approx::assert_relative_eq;
use bioeq::prelude::*;

fn study() -> Crossover2x2 {
    let data = simulate::crossover_2x2(&SimulationConfig::default().with_subjects(24)).unwrap();
    Crossover2x2::new(data, ColumnMapping::default()).unwrap()
}

#[test]
fn test_parameter_table_shape() {
    let study = study();
    let table = study.parameters();
    assert_eq!(table.len(), 48);
    assert_eq!(table.subjects().len(), 24);
    // Terminal phase is off by default for the 2x2 design
    assert!(!table.has_metric(Metric::AucInf));
    assert!(table.rows().iter().all(|r| r.log_auc.is_finite()));
}

#[test]
fn test_anova_terms() {
    let anova = study().run_anova(Metric::LogAuc).unwrap();
    assert_eq!(
        anova.formula,
        "log_AUC ~ C(Formulation) + C(Period) + C(Sequence)"
    );
    for term in ["C(Formulation)", "C(Period)", "C(Sequence)"] {
        let row = anova.term(term).unwrap();
        assert_eq!(row.df, 1.0);
        assert!(row.sum_sq >= 0.0);
        assert!(row.p_value.is_some());
    }
    let residual = anova.term("Residual").unwrap();
    assert_eq!(residual.df, 44.0);
    assert!(residual.f_value.is_none());
}

#[test]
fn test_point_estimate_brackets_true_ratio() {
    let pe = study().calculate_point_estimate(Metric::LogAuc).unwrap();
    let est = &pe.estimate;
    assert_eq!(est.n, 24);
    assert!(est.lower_90ci < est.point_estimate && est.point_estimate < est.upper_90ci);
    assert!(est.point_estimate > 80.0 && est.point_estimate < 115.0);
    assert_eq!(
        est.be_criteria_met,
        est.lower_90ci >= 80.0 && est.upper_90ci <= 125.0
    );
}

#[test]
fn test_raw_and_log_metric_agree() {
    let study = study();
    let raw = study.calculate_point_estimate(Metric::Auc).unwrap();
    let log = study.calculate_point_estimate(Metric::LogAuc).unwrap();
    assert_relative_eq!(raw.estimate.point_estimate, log.estimate.point_estimate, epsilon = 1e-10);
}

#[test]
fn test_mixed_model() {
    let summary = study().run_nlme(Metric::LogCmax).unwrap();
    assert_eq!(summary.group, "SubjectID");
    assert_eq!(summary.n_groups, 24);
    assert_eq!(summary.n_obs, 48);
    assert_eq!(summary.min_group_size, 2);
    assert!(summary.scale > 0.0);
    assert!(summary.group_var >= 0.0);

    let formulation = summary.coefficient("C(Formulation)[T.Test]").unwrap();
    assert!(formulation.ci_lower < formulation.estimate);
    assert!(formulation.estimate < formulation.ci_upper);
}

#[test]
fn test_summary_rows() {
    let summary = study().summarize_pk_parameters().unwrap();
    assert_eq!(summary.len(), 6);
    assert_eq!(summary[0].parameter, "AUC");
    assert_eq!(summary[0].formulation, "Reference");
    assert_eq!(summary[1].formulation, "Test");
    assert!(summary.iter().all(|r| r.n == 24));
    assert!(summary.iter().all(|r| r.min <= r.median && r.median <= r.max));
}

#[test]
fn test_result_mapping_keys() {
    let pe = study().calculate_point_estimate(Metric::LogAuc).unwrap();
    let value = pe.to_value().unwrap();
    for key in ["metric", "point_estimate", "lower_90ci", "upper_90ci", "be_criteria_met"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn test_csv_round_trip_preserves_results() {
    let data = simulate::crossover_2x2(&SimulationConfig::default().with_subjects(12)).unwrap();
    let csv = data.to_csv().unwrap();
    let reloaded = Dataset::from_csv_reader(csv.as_bytes()).unwrap();

    let a = Crossover2x2::new(data, ColumnMapping::default())
        .unwrap()
        .calculate_point_estimate(Metric::LogCmax)
        .unwrap();
    let b = Crossover2x2::new(reloaded, ColumnMapping::default())
        .unwrap()
        .calculate_point_estimate(Metric::LogCmax)
        .unwrap();
    assert_relative_eq!(a.estimate.point_estimate, b.estimate.point_estimate, epsilon = 1e-9);
}

#[test]
fn test_stricter_alpha_widens_interval() {
    let data = simulate::crossover_2x2(&SimulationConfig::default().with_subjects(24)).unwrap();
    let default = Crossover2x2::new(data.clone(), ColumnMapping::default())
        .unwrap()
        .calculate_point_estimate(Metric::LogAuc)
        .unwrap();
    let strict = Crossover2x2::with_options(
        data,
        ColumnMapping::default(),
        AnalysisOptions::default().with_alpha(0.05),
    )
    .unwrap()
    .calculate_point_estimate(Metric::LogAuc)
    .unwrap();

    assert!(strict.estimate.lower_90ci < default.estimate.lower_90ci);
    assert!(strict.estimate.upper_90ci > default.estimate.upper_90ci);
}
