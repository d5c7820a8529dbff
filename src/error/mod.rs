use thiserror::Error;

use crate::data::DataError;
use crate::nca::NCAError;
use crate::stats::StatsError;

/// Errors surfaced by the design analyzers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BioeqError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    NCA(#[from] NCAError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Replicate design type other than "partial" or "full"
    #[error("Invalid design type '{value}': expected 'partial' or 'full'")]
    InvalidDesignType { value: String },

    /// A metric name that is not a parameter table column
    #[error("Unknown metric '{name}'")]
    UnknownMetric { name: String },

    /// A sequence label that the declared design does not allow
    #[error("Sequence '{sequence}' is not valid for the {design} design")]
    InvalidSequence { sequence: String, design: String },

    /// The operation is not available for this analyzer configuration
    #[error("{operation} is not supported: {reason}")]
    Unsupported { operation: String, reason: String },

    /// Parameter computation failed for one analysis unit
    #[error("Failed to compute parameters for {unit}: {source}")]
    Analysis {
        unit: String,
        #[source]
        source: NCAError,
    },
}
