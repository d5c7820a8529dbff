use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::analysis::Analysis;
use super::metric::Metric;
use super::results::{AnovaResult, CvResult, PointEstimateResult, RsabeResult};
use super::table::{ParameterTable, SummaryRow};
use crate::data::{ColumnMapping, Dataset, Formulation, Role, UnitLayout};
use crate::error::BioeqError;
use crate::options::AnalysisOptions;
use crate::stats::{paired_estimate, scaled_criterion, within_subject_cv, MixedModelSummary, ScalingConfig};

/// Replicate crossover layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicateDesign {
    /// Three periods, Reference replicated (TRR, RTR, RRT)
    Partial,
    /// Four periods, both formulations replicated (TRTR, RTRT)
    Full,
}

impl ReplicateDesign {
    /// Periods per subject
    pub fn periods(&self) -> usize {
        match self {
            ReplicateDesign::Partial => 3,
            ReplicateDesign::Full => 4,
        }
    }

    /// Permitted sequences
    pub fn sequences(&self) -> &'static [&'static str] {
        match self {
            ReplicateDesign::Partial => &["TRR", "RTR", "RRT"],
            ReplicateDesign::Full => &["TRTR", "RTRT"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReplicateDesign::Partial => "partial",
            ReplicateDesign::Full => "full",
        }
    }

    fn allows(&self, sequence: &str) -> bool {
        self.sequences()
            .iter()
            .any(|s| s.eq_ignore_ascii_case(sequence.trim()))
    }
}

impl fmt::Display for ReplicateDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ReplicateDesign {
    type Err = BioeqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partial" => Ok(ReplicateDesign::Partial),
            "full" => Ok(ReplicateDesign::Full),
            _ => Err(BioeqError::InvalidDesignType {
                value: s.to_string(),
            }),
        }
    }
}

/// Replicate crossover study (partial or full)
///
/// Besides the crossover analyses, the Reference formulation's replicates
/// allow estimation of its within-subject variability and, in the full
/// design, reference-scaled average bioequivalence.
#[derive(Debug, Clone)]
pub struct ReplicateCrossover {
    design: ReplicateDesign,
    analysis: Analysis,
}

impl ReplicateCrossover {
    /// Build from a design type string, `"partial"` or `"full"`
    ///
    /// The design type is checked before any other work.
    pub fn new(dataset: Dataset, mapping: ColumnMapping, design_type: &str) -> Result<Self, BioeqError> {
        let design = design_type.parse()?;
        Self::with_options(dataset, mapping, design, AnalysisOptions::default())
    }

    pub fn with_options(
        dataset: Dataset,
        mapping: ColumnMapping,
        design: ReplicateDesign,
        options: AnalysisOptions,
    ) -> Result<Self, BioeqError> {
        let analysis = Analysis::build(dataset, mapping, UnitLayout::Crossover, options, true)?;

        for row in analysis.table.rows() {
            if let Some(sequence) = &row.sequence {
                if !design.allows(&sequence.to_string()) {
                    return Err(BioeqError::InvalidSequence {
                        sequence: sequence.to_string(),
                        design: design.to_string(),
                    });
                }
            }
        }

        for (subject, periods) in analysis.periods_per_subject() {
            if periods != design.periods() {
                tracing::warn!(
                    %subject,
                    periods,
                    expected = design.periods(),
                    "subject has an incomplete set of periods"
                );
            }
        }
        tracing::info!(
            design = %design,
            subjects = analysis.table.subjects().len(),
            units = analysis.table.len(),
            "replicate crossover analyzer ready"
        );

        Ok(Self { design, analysis })
    }

    pub fn design_type(&self) -> ReplicateDesign {
        self.design
    }

    pub fn dataset(&self) -> &Dataset {
        &self.analysis.dataset
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.analysis.mapping
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.analysis.options
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.analysis.table
    }

    /// Type II ANOVA of `metric ~ C(Formulation) + C(Period) + C(Sequence)`
    pub fn run_anova(&self, metric: Metric) -> Result<AnovaResult, BioeqError> {
        self.analysis.run_anova(metric, true)
    }

    /// Mixed model with a random intercept per subject
    pub fn run_nlme(&self, metric: Metric) -> Result<MixedModelSummary, BioeqError> {
        self.analysis.run_nlme(metric)
    }

    /// Ratio from per-subject mean(Test) − mean(Reference) on the log scale
    pub fn calculate_point_estimate(&self, metric: Metric) -> Result<PointEstimateResult, BioeqError> {
        self.analysis.require_formulations()?;
        self.analysis.paired_point_estimate(metric)
    }

    /// Within-subject CV of the Reference formulation from its replicates
    pub fn calculate_within_subject_cv(&self, metric: Metric) -> Result<CvResult, BioeqError> {
        let table = &self.analysis.table;
        let mut subjects = Vec::new();
        let mut values = Vec::new();
        for row in table.formulation(Formulation::Reference) {
            if let Some(value) = row.log_value(metric) {
                subjects.push(row.subject.clone());
                values.push(value?);
            }
        }
        if values.is_empty() {
            return Err(crate::stats::StatsError::MissingFormulation {
                formulation: self.analysis.options.reference_label.clone(),
            }
            .into());
        }

        let cv = within_subject_cv(
            metric.name(),
            self.analysis.mapping.require(Role::Subject)?,
            &subjects,
            &values,
        )?;
        Ok(CvResult {
            parameter: metric.name().to_string(),
            cv,
        })
    }

    /// Reference-scaled average bioequivalence (full replicate only)
    pub fn run_rsabe(&self, metric: Metric) -> Result<RsabeResult, BioeqError> {
        if self.design != ReplicateDesign::Full {
            return Err(BioeqError::Unsupported {
                operation: "RSABE".to_string(),
                reason: format!("requires the full replicate design, not {}", self.design),
            });
        }
        self.analysis.require_formulations()?;

        let cv = self.calculate_within_subject_cv(metric)?.cv;
        let diffs = self.analysis.table.subject_log_differences(metric)?;
        let estimate = paired_estimate(&diffs, &self.analysis.tost_config())?;
        let model_summary = self.run_nlme(metric)?;

        let rsabe = &self.analysis.options.rsabe;
        let criterion = scaled_criterion(
            &estimate,
            &cv,
            &ScalingConfig {
                regulatory_constant: rsabe.regulatory_constant,
                swr_threshold: rsabe.swr_threshold,
                alpha: rsabe.alpha,
                pe_limits: self.analysis.options.be_limits,
            },
        )?;

        Ok(RsabeResult {
            parameter: metric.name().to_string(),
            within_subject_cv: cv.within_subject_cv,
            swr: cv.swr,
            point_estimate: estimate.point_estimate,
            lower_90ci: estimate.lower_90ci,
            upper_90ci: estimate.upper_90ci,
            scaled_criterion: criterion.scaled_criterion,
            upper_bound: criterion.upper_bound,
            pe_constraint_met: criterion.pe_constraint_met,
            scaled: criterion.scaled,
            limits: criterion.limits,
            formula: model_summary.formula.clone(),
            model_summary,
            be_conclusion: criterion.be_conclusion,
        })
    }

    pub fn summarize_pk_parameters(&self) -> Result<Vec<SummaryRow>, BioeqError> {
        self.analysis.summarize()
    }
}
