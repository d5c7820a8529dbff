//! Result mappings returned by the analyzers
//!
//! Every result is a typed struct. [`ResultMapping::to_value`] renders it as a
//! JSON object keyed by result name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats::{AnovaRow, MixedModelSummary, PointEstimate, WithinSubjectCv};

/// Conversion of a result into a name → value mapping
pub trait ResultMapping: Serialize {
    fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Type II ANOVA of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    pub metric: String,
    pub formula: String,
    pub anova_table: Vec<AnovaRow>,
}

impl AnovaResult {
    /// Row of a term such as `C(Formulation)`
    pub fn term(&self, term: &str) -> Option<&AnovaRow> {
        self.anova_table.iter().find(|r| r.term == term)
    }
}

/// Two-sample t-test between formulations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub metric: String,
    /// Test minus Reference
    pub t_statistic: f64,
    pub p_value: f64,
    pub df: f64,
    /// Group means keyed by formulation
    pub means: BTreeMap<String, f64>,
    pub sample_sizes: BTreeMap<String, usize>,
    pub equal_variance: bool,
}

/// Ratio of geometric means for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEstimateResult {
    pub metric: String,
    #[serde(flatten)]
    pub estimate: PointEstimate,
}

/// Within-subject CV of the Reference formulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvResult {
    pub parameter: String,
    #[serde(flatten)]
    pub cv: WithinSubjectCv,
}

/// Reference-scaled average bioequivalence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsabeResult {
    pub parameter: String,
    pub within_subject_cv: f64,
    pub swr: f64,
    pub point_estimate: f64,
    pub lower_90ci: f64,
    pub upper_90ci: f64,
    pub scaled_criterion: f64,
    pub upper_bound: f64,
    pub pe_constraint_met: bool,
    /// Whether the reference-scaled limits applied
    pub scaled: bool,
    /// Acceptance limits in percent
    pub limits: (f64, f64),
    pub model_summary: MixedModelSummary,
    pub formula: String,
    pub be_conclusion: bool,
}

impl ResultMapping for AnovaResult {}
impl ResultMapping for TTestResult {}
impl ResultMapping for PointEstimateResult {}
impl ResultMapping for CvResult {}
impl ResultMapping for RsabeResult {}
impl ResultMapping for MixedModelSummary {}
