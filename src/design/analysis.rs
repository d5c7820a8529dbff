//! State and operations shared by every design analyzer

use std::collections::BTreeMap;

use super::metric::Metric;
use super::results::{AnovaResult, PointEstimateResult};
use super::table::{ParameterRow, ParameterTable, SummaryRow};
use crate::data::{group_units, ColumnMapping, Dataset, Formulation, Level, Role, UnitLayout};
use crate::error::BioeqError;
use crate::options::AnalysisOptions;
use crate::stats::{
    anova_type2, fit_random_intercept, Factor, MixedModelSummary, ModelFrame, StatsError,
    TostConfig,
};

/// Dataset, mapping and the parameter table derived from them
#[derive(Debug, Clone)]
pub(crate) struct Analysis {
    pub(crate) dataset: Dataset,
    pub(crate) mapping: ColumnMapping,
    pub(crate) options: AnalysisOptions,
    pub(crate) table: ParameterTable,
}

impl Analysis {
    /// Validate the columns, then compute the parameter table
    ///
    /// `terminal_default` applies when the options leave terminal phase
    /// computation unspecified.
    pub(crate) fn build(
        dataset: Dataset,
        mapping: ColumnMapping,
        layout: UnitLayout,
        options: AnalysisOptions,
        terminal_default: bool,
    ) -> Result<Self, BioeqError> {
        options.validate()?;
        mapping.validate(&dataset, layout.required_roles())?;

        let units = group_units(&dataset, &mapping, layout, &options.labels())?;
        let compute_terminal = options.compute_terminal.unwrap_or(terminal_default);
        let table = ParameterTable::from_units(&units, compute_terminal, &options.terminal)?;

        Ok(Self {
            dataset,
            mapping,
            options,
            table,
        })
    }

    pub(crate) fn tost_config(&self) -> TostConfig {
        TostConfig {
            alpha: self.options.alpha,
            limits: self.options.be_limits,
        }
    }

    fn column(&self, role: Role) -> Result<&str, BioeqError> {
        Ok(self.mapping.require(role)?)
    }

    /// Fixed-effects frame `metric ~ C(formulation) [+ C(period) + C(sequence)]`
    ///
    /// Rows missing the metric are dropped. Returns the subject of every row
    /// kept for use as a grouping factor.
    pub(crate) fn model_frame(
        &self,
        metric: Metric,
        crossover_terms: bool,
    ) -> Result<(ModelFrame, Vec<Level>), BioeqError> {
        let rows: Vec<&ParameterRow> = self
            .table
            .rows()
            .iter()
            .filter(|r| r.get(metric).is_some())
            .collect();
        let response: Vec<f64> = rows.iter().filter_map(|r| r.get(metric)).collect();
        let labels = self.options.labels();

        let formulations: Vec<Level> = rows
            .iter()
            .map(|r| Level::from(labels.label(r.formulation)))
            .collect();
        let mut factors = vec![Factor::new(self.column(Role::Formulation)?, &formulations)?];

        if crossover_terms {
            for role in [Role::Period, Role::Sequence] {
                let levels = rows
                    .iter()
                    .map(|r| {
                        let level = match role {
                            Role::Period => r.period.clone(),
                            _ => r.sequence.clone(),
                        };
                        level.ok_or_else(|| StatsError::InsufficientData {
                            what: format!("{} level of subject {}", role, r.subject),
                            n: 0,
                            required: 1,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                factors.push(Factor::new(self.column(role)?, &levels)?);
            }
        }

        let subjects = rows.iter().map(|r| r.subject.clone()).collect();
        let frame = ModelFrame::new(metric.name(), response, factors)?;
        Ok((frame, subjects))
    }

    pub(crate) fn run_anova(&self, metric: Metric, crossover_terms: bool) -> Result<AnovaResult, BioeqError> {
        let (frame, _) = self.model_frame(metric, crossover_terms)?;
        let table = anova_type2(&frame)?;
        Ok(AnovaResult {
            metric: metric.name().to_string(),
            formula: table.formula,
            anova_table: table.rows,
        })
    }

    pub(crate) fn run_nlme(&self, metric: Metric) -> Result<MixedModelSummary, BioeqError> {
        let (frame, subjects) = self.model_frame(metric, true)?;
        Ok(fit_random_intercept(
            &frame,
            self.column(Role::Subject)?,
            &subjects,
        )?)
    }

    /// Point estimate from per-subject Test − Reference differences
    pub(crate) fn paired_point_estimate(&self, metric: Metric) -> Result<PointEstimateResult, BioeqError> {
        let diffs = self.table.subject_log_differences(metric)?;
        let estimate = crate::stats::paired_estimate(&diffs, &self.tost_config())?;
        Ok(PointEstimateResult {
            metric: metric.name().to_string(),
            estimate,
        })
    }

    pub(crate) fn summarize(&self) -> Result<Vec<SummaryRow>, BioeqError> {
        Ok(self.table.summarize()?)
    }

    /// Both formulations must be present before comparing them
    pub(crate) fn require_formulations(&self) -> Result<(), BioeqError> {
        for formulation in Formulation::ALL {
            if self.table.formulation(formulation).next().is_none() {
                return Err(StatsError::MissingFormulation {
                    formulation: self.options.labels().label(formulation).to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Distinct periods observed per subject
    pub(crate) fn periods_per_subject(&self) -> BTreeMap<&Level, usize> {
        let mut periods: BTreeMap<&Level, Vec<&Level>> = BTreeMap::new();
        for row in self.table.rows() {
            if let Some(period) = &row.period {
                periods.entry(&row.subject).or_default().push(period);
            }
        }
        periods
            .into_iter()
            .map(|(subject, mut p)| {
                p.sort();
                p.dedup();
                (subject, p.len())
            })
            .collect()
    }
}
