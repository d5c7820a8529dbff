//! Semantic column roles and the mapping from roles to dataset columns
//!
//! The analyzers never look columns up by free-form strings. Each column they
//! read plays one [`Role`], and a [`ColumnMapping`] fixes which dataset column
//! fills it. The mapping is validated once, exhaustively, when an analyzer is
//! constructed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::dataset::Dataset;
use super::error::DataError;

/// The semantic role a column plays in a study dataset
///
/// Variants are declared in the order missing columns are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Subject,
    Sequence,
    Period,
    Time,
    Concentration,
    Formulation,
}

impl Role {
    /// Roles required by crossover and replicate designs
    pub const CROSSOVER: [Role; 6] = [
        Role::Subject,
        Role::Sequence,
        Role::Period,
        Role::Time,
        Role::Concentration,
        Role::Formulation,
    ];

    /// Roles required by parallel designs
    pub const PARALLEL: [Role; 4] = [
        Role::Subject,
        Role::Time,
        Role::Concentration,
        Role::Formulation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Subject => "subject",
            Role::Sequence => "sequence",
            Role::Period => "period",
            Role::Time => "time",
            Role::Concentration => "concentration",
            Role::Formulation => "formulation",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Assignment of dataset column names to semantic roles
///
/// # Example
///
/// ```rust
/// use bioeq::data::{ColumnMapping, Role};
///
/// let mapping = ColumnMapping::parallel("ID", "TIME", "CONC", "TRT");
/// assert_eq!(mapping.column(Role::Time), Some("TIME"));
/// assert_eq!(mapping.column(Role::Period), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    roles: BTreeMap<Role, String>,
}

impl ColumnMapping {
    /// Mapping for crossover and replicate designs
    pub fn crossover(
        subject: impl Into<String>,
        sequence: impl Into<String>,
        period: impl Into<String>,
        time: impl Into<String>,
        concentration: impl Into<String>,
        formulation: impl Into<String>,
    ) -> Self {
        Self::empty()
            .with(Role::Subject, subject)
            .with(Role::Sequence, sequence)
            .with(Role::Period, period)
            .with(Role::Time, time)
            .with(Role::Concentration, concentration)
            .with(Role::Formulation, formulation)
    }

    /// Mapping for parallel designs (no period or sequence)
    pub fn parallel(
        subject: impl Into<String>,
        time: impl Into<String>,
        concentration: impl Into<String>,
        formulation: impl Into<String>,
    ) -> Self {
        Self::empty()
            .with(Role::Subject, subject)
            .with(Role::Time, time)
            .with(Role::Concentration, concentration)
            .with(Role::Formulation, formulation)
    }

    /// Parallel mapping using the column names of the simulated datasets
    pub fn parallel_default() -> Self {
        Self::parallel(
            "SubjectID",
            "Time (hr)",
            "Concentration (ng/mL)",
            "Formulation",
        )
    }

    pub fn empty() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }

    /// Assign (or reassign) a column to a role
    pub fn with(mut self, role: Role, column: impl Into<String>) -> Self {
        self.roles.insert(role, column.into());
        self
    }

    /// Column name assigned to `role`
    pub fn column(&self, role: Role) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }

    /// Column name assigned to `role`, or an error if the role is unmapped
    pub fn require(&self, role: Role) -> Result<&str, DataError> {
        self.column(role).ok_or(DataError::UnmappedRole { role })
    }

    /// Check that every role in `required` is mapped and present in `dataset`
    ///
    /// All absent columns are reported at once, in role-declaration order.
    pub fn validate(&self, dataset: &Dataset, required: &[Role]) -> Result<(), DataError> {
        let mut roles = required.to_vec();
        roles.sort();
        roles.dedup();

        let mut missing = Vec::new();
        for role in roles {
            let column = self.require(role)?;
            if !dataset.has_column(column) {
                missing.push(column.to_string());
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DataError::MissingColumns { columns: missing })
        }
    }
}

impl Default for ColumnMapping {
    /// Crossover mapping using the column names of the simulated datasets
    fn default() -> Self {
        Self::crossover(
            "SubjectID",
            "Sequence",
            "Period",
            "Time (hr)",
            "Concentration (ng/mL)",
            "Formulation",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str]) -> Dataset {
        Dataset::builder(columns).build().unwrap()
    }

    #[test]
    fn test_validate_reports_all_missing_in_role_order() {
        let mapping = ColumnMapping::crossover(
            "subject",
            "sequence",
            "period",
            "time",
            "concentration",
            "formulation",
        );
        let data = dataset(&["formulation", "time", "sequence", "subject"]);

        let err = mapping.validate(&data, &Role::CROSSOVER).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required column(s) not found in dataset: period, concentration"
        );
    }

    #[test]
    fn test_validate_passes_when_present() {
        let mapping = ColumnMapping::parallel_default();
        let data = dataset(&[
            "SubjectID",
            "Formulation",
            "Time (hr)",
            "Concentration (ng/mL)",
        ]);
        assert!(mapping.validate(&data, &Role::PARALLEL).is_ok());
    }

    #[test]
    fn test_unmapped_role() {
        let mapping = ColumnMapping::parallel_default();
        let data = dataset(&["SubjectID"]);
        let err = mapping.validate(&data, &Role::CROSSOVER).unwrap_err();
        assert_eq!(
            err,
            DataError::UnmappedRole {
                role: Role::Sequence
            }
        );
    }

    #[test]
    fn test_mapping_from_json() {
        let mapping: ColumnMapping = serde_json::from_str(
            r#"{"subject": "ID", "time": "T", "concentration": "C", "formulation": "F"}"#,
        )
        .unwrap();
        assert_eq!(mapping, ColumnMapping::parallel("ID", "T", "C", "F"));
    }
}
