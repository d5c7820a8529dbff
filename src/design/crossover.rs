use super::analysis::Analysis;
use super::metric::Metric;
use super::results::{AnovaResult, PointEstimateResult};
use super::table::{ParameterTable, SummaryRow};
use crate::data::{ColumnMapping, Dataset, UnitLayout};
use crate::error::BioeqError;
use crate::options::AnalysisOptions;
use crate::stats::MixedModelSummary;

/// Two-period, two-sequence (TR/RT) crossover study
///
/// Construction validates the column mapping, computes AUC, Cmax and Tmax
/// for every subject × period × formulation and log-transforms them. A
/// successfully constructed analyzer is immutable.
///
/// # Example
///
/// ```rust
/// use bioeq::prelude::*;
///
/// let data = simulate::crossover_2x2(&SimulationConfig::default().with_subjects(12))?;
/// let study = Crossover2x2::new(data, ColumnMapping::default())?;
///
/// let pe = study.calculate_point_estimate(Metric::LogAuc)?;
/// println!("AUC ratio {:.2}% [{:.2}, {:.2}]", pe.estimate.point_estimate,
///     pe.estimate.lower_90ci, pe.estimate.upper_90ci);
/// # Ok::<(), bioeq::BioeqError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Crossover2x2 {
    analysis: Analysis,
}

impl Crossover2x2 {
    /// Build with default options
    pub fn new(dataset: Dataset, mapping: ColumnMapping) -> Result<Self, BioeqError> {
        Self::with_options(dataset, mapping, AnalysisOptions::default())
    }

    pub fn with_options(
        dataset: Dataset,
        mapping: ColumnMapping,
        options: AnalysisOptions,
    ) -> Result<Self, BioeqError> {
        let analysis = Analysis::build(dataset, mapping, UnitLayout::Crossover, options, false)?;

        for (subject, periods) in analysis.periods_per_subject() {
            if periods != 2 {
                tracing::warn!(%subject, periods, "subject does not have exactly 2 periods");
            }
        }
        tracing::info!(
            subjects = analysis.table.subjects().len(),
            units = analysis.table.len(),
            "2x2 crossover analyzer ready"
        );

        Ok(Self { analysis })
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

    /// Mixed model with the ANOVA fixed effects and a random intercept per subject
    pub fn run_nlme(&self, metric: Metric) -> Result<MixedModelSummary, BioeqError> {
        self.analysis.run_nlme(metric)
    }

    /// Test/Reference ratio with its confidence interval from paired differences
    pub fn calculate_point_estimate(&self, metric: Metric) -> Result<PointEstimateResult, BioeqError> {
        self.analysis.require_formulations()?;
        self.analysis.paired_point_estimate(metric)
    }

    pub fn summarize_pk_parameters(&self) -> Result<Vec<SummaryRow>, BioeqError> {
        self.analysis.summarize()
    }
}
