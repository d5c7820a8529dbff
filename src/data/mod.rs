//! Tabular study data
//!
//! The analysis core consumes a [`Dataset`]: an in-memory table supplied by an
//! external loader (see [`read_csv`] and [`Dataset::from_json`]). A
//! [`ColumnMapping`] names the column playing each semantic [`Role`], and the
//! rows are turned into [`Observation`]s grouped by [`AnalysisUnit`].

pub mod dataset;
pub mod error;
pub mod reader;
pub mod roles;
pub mod units;
pub mod value;

pub use dataset::{Dataset, DatasetBuilder, Row};
pub use error::DataError;
pub use reader::read_csv;
pub use roles::{ColumnMapping, Role};
pub use units::{
    extract_observations, group_units, AnalysisUnit, Formulation, FormulationLabels,
    Observation, UnitKey, UnitLayout,
};
pub use value::{Level, Value};
