//! The parameter table: one row of PK parameters per analysis unit

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metric::Metric;
use crate::data::{AnalysisUnit, DataError, Formulation, Level};
use crate::error::BioeqError;
use crate::nca::{PkParameters, Profile, TerminalOptions};
use crate::stats::{describe, StatsError};

/// PK parameters of one analysis unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRow {
    pub subject: Level,
    pub period: Option<Level>,
    pub sequence: Option<Level>,
    pub formulation: Formulation,
    #[serde(rename = "AUC")]
    pub auc: f64,
    #[serde(rename = "Cmax")]
    pub cmax: f64,
    #[serde(rename = "Tmax")]
    pub tmax: f64,
    #[serde(rename = "log_AUC")]
    pub log_auc: f64,
    #[serde(rename = "log_Cmax")]
    pub log_cmax: f64,
    #[serde(rename = "AUC_inf")]
    pub auc_inf: Option<f64>,
    pub t_half: Option<f64>,
}

impl ParameterRow {
    fn from_unit(
        unit: &AnalysisUnit,
        compute_terminal: bool,
        terminal: &TerminalOptions,
    ) -> Result<Self, BioeqError> {
        let wrap = |source| BioeqError::Analysis {
            unit: unit.key.to_string(),
            source,
        };
        let profile = Profile::new(&unit.times, &unit.concentrations).map_err(wrap)?;
        let params = PkParameters::from_profile(&profile, compute_terminal, terminal).map_err(wrap)?;
        let log_auc = params.log_auc().map_err(wrap)?;
        let log_cmax = params.log_cmax().map_err(wrap)?;

        tracing::debug!(
            unit = %unit.key,
            auc = params.auc,
            cmax = params.cmax,
            tmax = params.tmax,
            "computed unit parameters"
        );

        Ok(Self {
            subject: unit.key.subject.clone(),
            period: unit.key.period.clone(),
            sequence: unit.sequence.clone(),
            formulation: unit.key.formulation,
            auc: params.auc,
            cmax: params.cmax,
            tmax: params.tmax,
            log_auc,
            log_cmax,
            auc_inf: params.auc_inf,
            t_half: params.t_half,
        })
    }

    /// Value of a metric, `None` when an optional parameter is missing
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Auc => Some(self.auc),
            Metric::Cmax => Some(self.cmax),
            Metric::Tmax => Some(self.tmax),
            Metric::LogAuc => Some(self.log_auc),
            Metric::LogCmax => Some(self.log_cmax),
            Metric::AucInf => self.auc_inf,
            Metric::THalf => self.t_half,
        }
    }

    /// Metric value on the log scale
    ///
    /// Log metrics are returned as-is; other metrics must be positive.
    pub fn log_value(&self, metric: Metric) -> Option<Result<f64, StatsError>> {
        let value = self.get(metric)?;
        Some(if metric.is_log() {
            Ok(value)
        } else if value > 0.0 {
            Ok(value.ln())
        } else {
            Err(StatsError::NonPositiveValue {
                metric: metric.name().to_string(),
                value,
            })
        })
    }
}

/// One row of the descriptive summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Parameter")]
    pub parameter: String,
    #[serde(rename = "Formulation")]
    pub formulation: String,
    #[serde(rename = "N")]
    pub n: usize,
    #[serde(rename = "Mean")]
    pub mean: f64,
    #[serde(rename = "SD")]
    pub sd: f64,
    #[serde(rename = "Median")]
    pub median: f64,
    #[serde(rename = "Min")]
    pub min: f64,
    #[serde(rename = "Max")]
    pub max: f64,
    #[serde(rename = "CV%")]
    pub cv_pct: f64,
}

/// Parameter rows sorted by subject, formulation and period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    rows: Vec<ParameterRow>,
}

impl ParameterTable {
    /// Compute one row per unit in the order AUC, Cmax, Tmax, terminal phase, logs
    pub fn from_units(
        units: &[AnalysisUnit],
        compute_terminal: bool,
        terminal: &TerminalOptions,
    ) -> Result<Self, BioeqError> {
        let mut rows = units
            .iter()
            .map(|unit| ParameterRow::from_unit(unit, compute_terminal, terminal))
            .collect::<Result<Vec<_>, _>>()?;

        rows.sort_by(|a, b| {
            (&a.subject, a.formulation, &a.period).cmp(&(&b.subject, b.formulation, &b.period))
        });

        if compute_terminal {
            let missing = rows.iter().filter(|r| r.auc_inf.is_none()).count();
            if missing > 0 {
                tracing::warn!(
                    missing,
                    total = rows.len(),
                    "units without an estimable terminal phase; AUC_inf and t_half are missing"
                );
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ParameterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct subjects, ordered
    pub fn subjects(&self) -> Vec<&Level> {
        let mut subjects: Vec<&Level> = self.rows.iter().map(|r| &r.subject).collect();
        subjects.dedup();
        subjects
    }

    /// Rows of one formulation
    pub fn formulation(&self, formulation: Formulation) -> impl Iterator<Item = &ParameterRow> + '_ {
        self.rows.iter().filter(move |r| r.formulation == formulation)
    }

    /// Whether any row carries the given metric
    pub fn has_metric(&self, metric: Metric) -> bool {
        self.rows.iter().any(|r| r.get(metric).is_some())
    }

    /// Log-scale values of a formulation, skipping rows where the metric is missing
    pub fn log_values(&self, metric: Metric, formulation: Formulation) -> Result<Vec<f64>, StatsError> {
        self.formulation(formulation)
            .filter_map(|r| r.log_value(metric))
            .collect()
    }

    /// Per-subject mean(Test) − mean(Reference) of the log-scale metric
    ///
    /// Subjects lacking either formulation are skipped.
    pub fn subject_log_differences(&self, metric: Metric) -> Result<Vec<f64>, StatsError> {
        let mut by_subject: BTreeMap<&Level, [Vec<f64>; 2]> = BTreeMap::new();
        for row in &self.rows {
            if let Some(value) = row.log_value(metric) {
                let slot = match row.formulation {
                    Formulation::Reference => 0,
                    Formulation::Test => 1,
                };
                by_subject.entry(&row.subject).or_default()[slot].push(value?);
            }
        }

        let mut diffs = Vec::with_capacity(by_subject.len());
        for (subject, [reference, test]) in by_subject {
            if reference.is_empty() || test.is_empty() {
                tracing::warn!(%subject, metric = %metric, "subject lacks a Test or Reference value, excluded");
                continue;
            }
            let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
            diffs.push(mean(&test) - mean(&reference));
        }
        Ok(diffs)
    }

    /// Descriptive statistics per parameter and formulation
    ///
    /// AUC, Cmax and Tmax always; AUC_inf and t_half when computed.
    pub fn summarize(&self) -> Result<Vec<SummaryRow>, StatsError> {
        let mut metrics = vec![Metric::Auc, Metric::Cmax, Metric::Tmax];
        for optional in [Metric::AucInf, Metric::THalf] {
            if self.has_metric(optional) {
                metrics.push(optional);
            }
        }

        let mut summary = Vec::new();
        for metric in metrics {
            for formulation in Formulation::ALL {
                let values: Vec<f64> = self
                    .formulation(formulation)
                    .filter_map(|r| r.get(metric))
                    .collect();
                if values.is_empty() {
                    continue;
                }
                let d = describe(&values)?;
                summary.push(SummaryRow {
                    parameter: metric.name().to_string(),
                    formulation: formulation.to_string(),
                    n: d.n,
                    mean: d.mean,
                    sd: d.sd,
                    median: d.median,
                    min: d.min,
                    max: d.max,
                    cv_pct: d.cv_pct,
                });
            }
        }
        Ok(summary)
    }

    /// Export the table as CSV text
    pub fn to_csv(&self) -> Result<String, DataError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let csv_err = |e: csv::Error| DataError::Csv(e.to_string());

        writer
            .write_record([
                "subject",
                "period",
                "sequence",
                "formulation",
                "AUC",
                "Cmax",
                "Tmax",
                "log_AUC",
                "log_Cmax",
                "AUC_inf",
                "t_half",
            ])
            .map_err(csv_err)?;

        let opt_level = |l: &Option<Level>| l.as_ref().map(|l| l.to_string()).unwrap_or_default();
        let opt_num = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();

        for row in &self.rows {
            writer
                .write_record([
                    row.subject.to_string(),
                    opt_level(&row.period),
                    opt_level(&row.sequence),
                    row.formulation.to_string(),
                    row.auc.to_string(),
                    row.cmax.to_string(),
                    row.tmax.to_string(),
                    row.log_auc.to_string(),
                    row.log_cmax.to_string(),
                    opt_num(row.auc_inf),
                    opt_num(row.t_half),
                ])
                .map_err(csv_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DataError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DataError::Csv(e.to_string()))
    }
}
