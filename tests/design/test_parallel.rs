//! Parallel design analyses

use bioeq::prelude::*;

fn study() -> ParallelDesign {
    let data = simulate::parallel(&SimulationConfig::default().with_subjects(24)).unwrap();
    ParallelDesign::new(data, ColumnMapping::parallel_default()).unwrap()
}

#[test]
fn test_terminal_phase_on_by_default() {
    let study = study();
    assert_eq!(study.parameters().len(), 24);
    assert!(study.parameters().has_metric(Metric::AucInf));
    assert!(study.parameters().has_metric(Metric::THalf));
}

#[test]
fn test_ttest_groups() {
    let result = study().run_ttest(Metric::Auc).unwrap();
    assert_eq!(result.sample_sizes["Test"], 12);
    assert_eq!(result.sample_sizes["Reference"], 12);
    assert_eq!(result.df, 22.0);
    assert!(result.p_value > 0.0 && result.p_value <= 1.0);
    assert!(result.equal_variance);
}

#[test]
fn test_anova_formulation_only() {
    let anova = study().run_anova(Metric::LogCmax).unwrap();
    assert_eq!(anova.formula, "log_Cmax ~ C(Formulation)");
    assert_eq!(anova.term("C(Formulation)").unwrap().df, 1.0);
    assert_eq!(anova.term("Residual").unwrap().df, 22.0);
}

#[test]
fn test_welch_point_estimate() {
    let data = simulate::parallel(&SimulationConfig::default().with_subjects(24)).unwrap();
    let study = ParallelDesign::with_options(
        data,
        ColumnMapping::parallel_default(),
        AnalysisOptions::default().with_equal_variance(false),
    )
    .unwrap();

    let pe = study.calculate_point_estimate(Metric::LogAuc).unwrap();
    assert_eq!(pe.estimate.n, 24);
    assert!(pe.estimate.df <= 22.0);
    assert!(pe.estimate.lower_90ci < pe.estimate.upper_90ci);
}

#[test]
fn test_summary_includes_terminal_parameters() {
    let summary = study().summarize_pk_parameters().unwrap();
    let parameters: Vec<&str> = summary.iter().map(|r| r.parameter.as_str()).collect();
    assert!(parameters.contains(&"AUC_inf"));
    assert!(parameters.contains(&"t_half"));
}
