//! NCA error types

use thiserror::Error;

/// Errors that can occur while deriving PK parameters from a profile
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NCAError {
    /// Insufficient data points for the requested operation
    #[error("Insufficient data: {n} points, need at least {required}")]
    InsufficientData { n: usize, required: usize },

    /// Time and concentration arrays differ in length
    #[error("Array length mismatch: times={times}, concentrations={concentrations}")]
    LengthMismatch { times: usize, concentrations: usize },

    /// The same time appears more than once within one analysis unit
    #[error("Duplicate time {time} within one profile")]
    DuplicateTime { time: f64 },

    /// A time value is negative or not finite
    #[error("Invalid time sequence: times must be finite and non-negative")]
    InvalidTimeSequence,

    /// Concentrations must be non-negative and finite
    #[error("Invalid concentration {value} at time {time}")]
    NegativeConcentration { time: f64, value: f64 },

    /// Log-transform of a parameter that is zero or negative
    #[error("Cannot log-transform {parameter} = {value}: value must be positive")]
    NonPositiveLog { parameter: &'static str, value: f64 },
}
