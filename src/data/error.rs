//! Error types for tabular input handling
//!
//! [`DataError`] covers problems with the dataset itself: it is not a
//! structured table, required columns are absent, or individual cells cannot
//! be interpreted for the role their column plays.

use thiserror::Error;

use super::roles::Role;

/// Errors arising while reading or interpreting a tabular dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// The input is not a structured table (ragged rows, duplicate headers, non-record JSON)
    #[error("Data must be a structured table: {reason}")]
    NotTabular { reason: String },

    /// One or more required columns are absent, listed in role-declaration order
    #[error("Required column(s) not found in dataset: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// The column mapping does not assign a column to a role the design needs
    #[error("No column is mapped to the {role} role")]
    UnmappedRole { role: Role },

    /// A cell required for the analysis is empty
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    /// A cell could not be interpreted as the expected type
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// A formulation label matched neither the Test nor the Reference label
    #[error("Unknown formulation '{value}' at row {row}")]
    UnknownFormulation { row: usize, value: String },

    /// Rows of one analysis unit disagree on a value that must be constant within it
    #[error("Column '{column}' is not constant within analysis unit {unit}")]
    Inconsistent { column: String, unit: String },

    /// Error encountered when reading CSV data
    #[error("CSV error: {0}")]
    Csv(String),
}
