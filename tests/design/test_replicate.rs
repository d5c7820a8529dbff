//! Replicate crossover analyses

use bioeq::prelude::*;

fn partial() -> ReplicateCrossover {
    let data = simulate::partial_replicate(&SimulationConfig::default().with_subjects(24)).unwrap();
    ReplicateCrossover::new(data, ColumnMapping::default(), "partial").unwrap()
}

fn full(config: SimulationConfig) -> ReplicateCrossover {
    let data = simulate::full_replicate(&config).unwrap();
    ReplicateCrossover::new(data, ColumnMapping::default(), "full").unwrap()
}

#[test]
fn test_invalid_design_type() {
    let data = simulate::partial_replicate(&SimulationConfig::default()).unwrap();
    let err = ReplicateCrossover::new(data, ColumnMapping::default(), "invalid").unwrap_err();
    assert!(matches!(err, BioeqError::InvalidDesignType { ref value } if value == "invalid"));
}

#[test]
fn test_design_type_is_case_sensitive() {
    let data = simulate::full_replicate(&SimulationConfig::default()).unwrap();
    let err = ReplicateCrossover::new(data, ColumnMapping::default(), "FULL").unwrap_err();
    assert!(matches!(err, BioeqError::InvalidDesignType { ref value } if value == "FULL"));
}

#[test]
fn test_sequences_must_match_design() {
    let data = simulate::partial_replicate(&SimulationConfig::default().with_subjects(6)).unwrap();
    let err = ReplicateCrossover::new(data, ColumnMapping::default(), "full").unwrap_err();
    assert!(matches!(err, BioeqError::InvalidSequence { .. }));
}

#[test]
fn test_partial_design_analyses() {
    let study = partial();
    assert_eq!(study.design_type(), ReplicateDesign::Partial);
    assert_eq!(study.parameters().len(), 72);

    let anova = study.run_anova(Metric::LogAuc).unwrap();
    assert_eq!(anova.term("C(Period)").unwrap().df, 2.0);
    assert_eq!(anova.term("C(Sequence)").unwrap().df, 2.0);

    let pe = study.calculate_point_estimate(Metric::LogAuc).unwrap();
    assert_eq!(pe.estimate.n, 24);
    assert!(pe.estimate.point_estimate > 80.0 && pe.estimate.point_estimate < 115.0);
}

#[test]
fn test_within_subject_cv_in_plausible_range() {
    let cv = partial().calculate_within_subject_cv(Metric::LogAuc).unwrap();
    assert_eq!(cv.parameter, "log_AUC");
    // Each subject has two Reference periods
    assert_eq!(cv.cv.n_subjects, 24);
    assert_eq!(cv.cv.df, 24);
    assert!(cv.cv.within_subject_cv > 5.0 && cv.cv.within_subject_cv < 40.0);
}

#[test]
fn test_rsabe_requires_full_design() {
    let err = partial().run_rsabe(Metric::LogAuc).unwrap_err();
    assert!(matches!(err, BioeqError::Unsupported { .. }));
}

#[test]
fn test_rsabe_low_variability_falls_back_to_abe() {
    let result = full(SimulationConfig::default().with_subjects(24))
        .run_rsabe(Metric::LogAuc)
        .unwrap();
    assert!(result.swr < 0.294);
    assert!(!result.scaled);
    assert_eq!(result.limits, (80.0, 125.0));
    assert_eq!(
        result.be_conclusion,
        result.lower_90ci >= 80.0 && result.upper_90ci <= 125.0
    );
    assert_eq!(result.model_summary.n_groups, 24);
}

#[test]
fn test_rsabe_highly_variable_reference_is_scaled() {
    let config = SimulationConfig::default()
        .with_subjects(24)
        .with_variability(0.2, 0.5, 0.1);
    let result = full(config).run_rsabe(Metric::LogCmax).unwrap();
    assert!(result.swr > 0.294);
    assert!(result.scaled);
    assert!(result.upper_bound.is_finite());
    if result.be_conclusion {
        assert!(result.upper_bound <= 0.0);
        assert!(result.pe_constraint_met);
    }
}
