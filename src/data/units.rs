//! Observations and analysis units
//!
//! Rows of a [`Dataset`] are interpreted through a [`ColumnMapping`] into typed
//! [`Observation`]s, which are then grouped into [`AnalysisUnit`]s: one
//! concentration-time profile per subject × period × formulation
//! (crossover and replicate designs) or per subject × formulation (parallel).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::dataset::{Dataset, Row};
use super::error::DataError;
use super::roles::{ColumnMapping, Role};
use super::value::{Level, Value};

/// Formulation under comparison
///
/// `Reference` orders before `Test`, matching the alphabetical order of the
/// conventional labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Formulation {
    Reference,
    Test,
}

impl Formulation {
    pub const ALL: [Formulation; 2] = [Formulation::Reference, Formulation::Test];
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formulation::Reference => write!(f, "Reference"),
            Formulation::Test => write!(f, "Test"),
        }
    }
}

/// Labels identifying the Test and Reference formulations in the data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulationLabels {
    pub test: String,
    pub reference: String,
}

impl Default for FormulationLabels {
    fn default() -> Self {
        Self {
            test: "Test".to_string(),
            reference: "Reference".to_string(),
        }
    }
}

impl FormulationLabels {
    /// Resolve a cell to a formulation. Matching is exact after trimming.
    pub fn resolve(&self, value: &Value, row: usize) -> Result<Formulation, DataError> {
        let text = value.as_text().ok_or_else(|| DataError::UnknownFormulation {
            row,
            value: value.to_string(),
        })?;
        let text = text.trim();
        if text == self.test {
            Ok(Formulation::Test)
        } else if text == self.reference {
            Ok(Formulation::Reference)
        } else {
            Err(DataError::UnknownFormulation {
                row,
                value: text.to_string(),
            })
        }
    }

    pub fn label(&self, formulation: Formulation) -> &str {
        match formulation {
            Formulation::Test => &self.test,
            Formulation::Reference => &self.reference,
        }
    }
}

/// How observations are grouped into analysis units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLayout {
    /// One unit per subject × period × formulation
    Crossover,
    /// One unit per subject × formulation
    Parallel,
}

impl UnitLayout {
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            UnitLayout::Crossover => &Role::CROSSOVER,
            UnitLayout::Parallel => &Role::PARALLEL,
        }
    }
}

/// One concentration measurement
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub subject: Level,
    pub sequence: Option<Level>,
    pub period: Option<Level>,
    pub formulation: Formulation,
    pub time: f64,
    pub concentration: f64,
}

/// Grouping key of an analysis unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    pub subject: Level,
    pub period: Option<Level>,
    pub formulation: Formulation,
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject {}", self.subject)?;
        if let Some(period) = &self.period {
            write!(f, ", period {}", period)?;
        }
        write!(f, ", {}", self.formulation)
    }
}

/// The observations of one analysis unit, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisUnit {
    pub key: UnitKey,
    pub sequence: Option<Level>,
    pub times: Vec<f64>,
    pub concentrations: Vec<f64>,
}

/// Columns read for each observation
struct UnitColumns<'a> {
    subject: &'a str,
    time: &'a str,
    concentration: &'a str,
    formulation: &'a str,
    period: Option<&'a str>,
    sequence: Option<&'a str>,
}

impl<'a> UnitColumns<'a> {
    fn new(mapping: &'a ColumnMapping, layout: UnitLayout) -> Result<Self, DataError> {
        let (period, sequence) = match layout {
            UnitLayout::Crossover => (
                Some(mapping.require(Role::Period)?),
                Some(mapping.require(Role::Sequence)?),
            ),
            UnitLayout::Parallel => (None, None),
        };
        Ok(Self {
            subject: mapping.require(Role::Subject)?,
            time: mapping.require(Role::Time)?,
            concentration: mapping.require(Role::Concentration)?,
            formulation: mapping.require(Role::Formulation)?,
            period,
            sequence,
        })
    }

    /// Columns identifying an analysis unit
    fn unit_key(&self) -> Vec<&'a str> {
        let mut key = vec![self.subject];
        key.extend(self.period);
        key.push(self.formulation);
        key
    }

    fn observation(&self, row: &Row<'_>, labels: &FormulationLabels) -> Result<Observation, DataError> {
        Ok(Observation {
            subject: level(row, self.subject)?,
            sequence: self.sequence.map(|c| level(row, c)).transpose()?,
            period: self.period.map(|c| level(row, c)).transpose()?,
            formulation: labels.resolve(cell(row, self.formulation)?, row.index())?,
            time: number(row, self.time)?,
            concentration: number(row, self.concentration)?,
        })
    }
}

/// Interpret every row of `dataset` as an [`Observation`]
///
/// The mapping must already have been validated against the dataset for the
/// roles `layout` requires.
pub fn extract_observations(
    dataset: &Dataset,
    mapping: &ColumnMapping,
    layout: UnitLayout,
    labels: &FormulationLabels,
) -> Result<Vec<Observation>, DataError> {
    let columns = UnitColumns::new(mapping, layout)?;
    dataset
        .rows()
        .map(|row| columns.observation(&row, labels))
        .collect()
}

/// Group the rows of `dataset` into analysis units, ordered by key
///
/// Rows are grouped on the subject, period (crossover layouts) and
/// formulation columns. Within a unit observations keep their input order.
/// Cells whose labels differ only in surrounding whitespace land in the
/// same unit.
pub fn group_units(
    dataset: &Dataset,
    mapping: &ColumnMapping,
    layout: UnitLayout,
    labels: &FormulationLabels,
) -> Result<Vec<AnalysisUnit>, DataError> {
    let columns = UnitColumns::new(mapping, layout)?;
    let groups = dataset.group_by(&columns.unit_key())?;

    let mut members: BTreeMap<UnitKey, Vec<(usize, Observation)>> = BTreeMap::new();
    for indices in groups.into_values() {
        for row in indices.into_iter().filter_map(|i| dataset.row(i)) {
            let obs = columns.observation(&row, labels)?;
            let key = UnitKey {
                subject: obs.subject.clone(),
                period: obs.period.clone(),
                formulation: obs.formulation,
            };
            members.entry(key).or_default().push((row.index(), obs));
        }
    }

    let mut units = Vec::with_capacity(members.len());
    for (key, mut rows) in members {
        // padded labels split a unit across groups
        rows.sort_by_key(|(index, _)| *index);
        let sequence = rows.first().and_then(|(_, obs)| obs.sequence.clone());
        if rows.iter().any(|(_, obs)| obs.sequence != sequence) {
            return Err(DataError::Inconsistent {
                column: "sequence".to_string(),
                unit: key.to_string(),
            });
        }
        let (times, concentrations): (Vec<f64>, Vec<f64>) = rows
            .iter()
            .map(|(_, obs)| (obs.time, obs.concentration))
            .unzip();
        units.push(AnalysisUnit {
            key,
            sequence,
            times,
            concentrations,
        });
    }

    Ok(units)
}

fn cell<'a>(row: &Row<'a>, column: &str) -> Result<&'a Value, DataError> {
    match row.get(column) {
        Some(Value::Missing) | None => Err(DataError::MissingValue {
            column: column.to_string(),
            row: row.index(),
        }),
        Some(value) => Ok(value),
    }
}

fn level(row: &Row<'_>, column: &str) -> Result<Level, DataError> {
    cell(row, column)?
        .to_level()
        .ok_or_else(|| DataError::MissingValue {
            column: column.to_string(),
            row: row.index(),
        })
}

fn number(row: &Row<'_>, column: &str) -> Result<f64, DataError> {
    let value = cell(row, column)?;
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::InvalidValue {
            column: column.to_string(),
            row: row.index(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crossover_rows() -> Dataset {
        Dataset::builder(&[
            "SubjectID",
            "Sequence",
            "Period",
            "Time (hr)",
            "Concentration (ng/mL)",
            "Formulation",
        ])
        .row([1.into(), "TR".into(), 1.into(), 1.0.into(), 10.0.into(), "Test".into()])
        .row([1.into(), "TR".into(), 1.into(), 0.0.into(), 0.0.into(), "Test".into()])
        .row([1.into(), "TR".into(), 2.into(), 0.0.into(), 0.0.into(), "Reference".into()])
        .row([1.into(), "TR".into(), 2.into(), 1.0.into(), 8.0.into(), "Reference".into()])
        .build()
        .unwrap()
    }

    #[test]
    fn test_extract_and_group() {
        let obs = extract_observations(
            &crossover_rows(),
            &ColumnMapping::default(),
            UnitLayout::Crossover,
            &FormulationLabels::default(),
        )
        .unwrap();
        assert_eq!(obs.len(), 4);

        let units = group_units(
            &crossover_rows(),
            &ColumnMapping::default(),
            UnitLayout::Crossover,
            &FormulationLabels::default(),
        )
        .unwrap();
        assert_eq!(units.len(), 2);
        // Reference sorts first
        assert_eq!(units[0].key.formulation, Formulation::Reference);
        assert_eq!(units[0].key.period, Some(Level::Integer(2)));
        assert_eq!(units[1].times, vec![1.0, 0.0]);
        assert_eq!(units[1].sequence, Some(Level::Text("TR".into())));
    }

    #[test]
    fn test_unknown_formulation() {
        let data = Dataset::builder(&["SubjectID", "Time (hr)", "Concentration (ng/mL)", "Formulation"])
            .row([1.into(), 0.0.into(), 1.0.into(), "Placebo".into()])
            .build()
            .unwrap();
        let err = extract_observations(
            &data,
            &ColumnMapping::parallel_default(),
            UnitLayout::Parallel,
            &FormulationLabels::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DataError::UnknownFormulation {
                row: 0,
                value: "Placebo".into()
            }
        );
    }

    #[test]
    fn test_missing_concentration_is_an_error() {
        let data = Dataset::builder(&["SubjectID", "Time (hr)", "Concentration (ng/mL)", "Formulation"])
            .row([1.into(), 0.0.into(), Value::Missing, "Test".into()])
            .build()
            .unwrap();
        let err = extract_observations(
            &data,
            &ColumnMapping::parallel_default(),
            UnitLayout::Parallel,
            &FormulationLabels::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::MissingValue { row: 0, .. }));
    }

    #[test]
    fn test_inconsistent_sequence_within_unit() {
        let data = Dataset::builder(&[
            "SubjectID",
            "Sequence",
            "Period",
            "Time (hr)",
            "Concentration (ng/mL)",
            "Formulation",
        ])
        .row([1.into(), "TR".into(), 1.into(), 0.0.into(), 0.0.into(), "Test".into()])
        .row([1.into(), "RT".into(), 1.into(), 1.0.into(), 5.0.into(), "Test".into()])
        .build()
        .unwrap();
        let result = group_units(
            &data,
            &ColumnMapping::default(),
            UnitLayout::Crossover,
            &FormulationLabels::default(),
        );
        assert!(matches!(result, Err(DataError::Inconsistent { .. })));
    }

    #[test]
    fn test_group_units_merges_padded_labels() {
        let data = Dataset::builder(&["SubjectID", "Time (hr)", "Concentration (ng/mL)", "Formulation"])
            .row([1.into(), 0.0.into(), 0.0.into(), "Test".into()])
            .row([2.into(), 0.0.into(), 0.0.into(), "Reference".into()])
            .row([1.into(), 1.0.into(), 4.0.into(), " Test ".into()])
            .build()
            .unwrap();
        let units = group_units(
            &data,
            &ColumnMapping::parallel_default(),
            UnitLayout::Parallel,
            &FormulationLabels::default(),
        )
        .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].key.subject, Level::Integer(1));
        assert_eq!(units[0].times, vec![0.0, 1.0]);
        assert_eq!(units[0].concentrations, vec![0.0, 4.0]);
        assert_eq!(units[1].key.formulation, Formulation::Reference);
    }

    #[test]
    fn test_group_units_reports_missing_key_row() {
        let data = Dataset::builder(&["SubjectID", "Time (hr)", "Concentration (ng/mL)", "Formulation"])
            .row([1.into(), 0.0.into(), 0.0.into(), "Test".into()])
            .row([Value::Missing, 0.0.into(), 0.0.into(), "Test".into()])
            .build()
            .unwrap();
        let err = group_units(
            &data,
            &ColumnMapping::parallel_default(),
            UnitLayout::Parallel,
            &FormulationLabels::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::MissingValue { row: 1, .. }));
    }

    #[test]
    fn test_custom_labels() {
        let labels = FormulationLabels {
            test: "T".into(),
            reference: "R".into(),
        };
        assert_eq!(labels.resolve(&Value::from("R"), 0), Ok(Formulation::Reference));
        assert_eq!(labels.label(Formulation::Test), "T");
    }
}
