use std::collections::BTreeMap;

use super::analysis::Analysis;
use super::metric::Metric;
use super::results::{AnovaResult, PointEstimateResult, TTestResult};
use super::table::{ParameterTable, SummaryRow};
use crate::data::{ColumnMapping, Dataset, Formulation, UnitLayout};
use crate::error::BioeqError;
use crate::options::AnalysisOptions;
use crate::stats::{independent_estimate, two_sample_ttest};

/// Parallel-group study: each subject receives one formulation
///
/// Units are subject × formulation. AUC_inf and t_half are computed unless
/// the options turn terminal phase estimation off.
#[derive(Debug, Clone)]
pub struct ParallelDesign {
    analysis: Analysis,
}

impl ParallelDesign {
    pub fn new(dataset: Dataset, mapping: ColumnMapping) -> Result<Self, BioeqError> {
        Self::with_options(dataset, mapping, AnalysisOptions::default())
    }

    pub fn with_options(
        dataset: Dataset,
        mapping: ColumnMapping,
        options: AnalysisOptions,
    ) -> Result<Self, BioeqError> {
        let analysis = Analysis::build(dataset, mapping, UnitLayout::Parallel, options, true)?;

        let mut formulations: BTreeMap<_, Vec<Formulation>> = BTreeMap::new();
        for row in analysis.table.rows() {
            formulations.entry(&row.subject).or_default().push(row.formulation);
        }
        for (subject, f) in formulations {
            if f.len() > 1 {
                tracing::warn!(%subject, "subject received both formulations in a parallel design");
            }
        }
        tracing::info!(
            subjects = analysis.table.subjects().len(),
            "parallel design analyzer ready"
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

    /// Type II ANOVA of `metric ~ C(Formulation)`
    pub fn run_anova(&self, metric: Metric) -> Result<AnovaResult, BioeqError> {
        self.analysis.run_anova(metric, false)
    }

    /// Two-sample t-test of the metric, Test against Reference
    pub fn run_ttest(&self, metric: Metric) -> Result<TTestResult, BioeqError> {
        self.analysis.require_formulations()?;
        let values = |f: Formulation| -> Vec<f64> {
            self.analysis
                .table
                .formulation(f)
                .filter_map(|r| r.get(metric))
                .collect()
        };
        let test = values(Formulation::Test);
        let reference = values(Formulation::Reference);
        let result = two_sample_ttest(&test, &reference, self.analysis.options.equal_variance)?;

        let labels = self.analysis.options.labels();
        let test_label = labels.label(Formulation::Test).to_string();
        let reference_label = labels.label(Formulation::Reference).to_string();

        Ok(TTestResult {
            metric: metric.name().to_string(),
            t_statistic: result.t_statistic,
            p_value: result.p_value,
            df: result.df,
            means: BTreeMap::from([
                (test_label.clone(), result.means.0),
                (reference_label.clone(), result.means.1),
            ]),
            sample_sizes: BTreeMap::from([
                (test_label, result.sample_sizes.0),
                (reference_label, result.sample_sizes.1),
            ]),
            equal_variance: result.equal_variance,
        })
    }

    /// Ratio of geometric means from independent groups
    pub fn calculate_point_estimate(&self, metric: Metric) -> Result<PointEstimateResult, BioeqError> {
        self.analysis.require_formulations()?;
        let table = &self.analysis.table;
        let test = table.log_values(metric, Formulation::Test)?;
        let reference = table.log_values(metric, Formulation::Reference)?;
        let estimate = independent_estimate(
            &test,
            &reference,
            self.analysis.options.equal_variance,
            &self.analysis.tost_config(),
        )?;
        Ok(PointEstimateResult {
            metric: metric.name().to_string(),
            estimate,
        })
    }

    pub fn summarize_pk_parameters(&self) -> Result<Vec<SummaryRow>, BioeqError> {
        self.analysis.summarize()
    }
}
