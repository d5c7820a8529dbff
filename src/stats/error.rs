use thiserror::Error;

/// Errors raised by the statistical routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Too few observations for the requested statistic
    #[error("Insufficient data for {what}: have {n}, need at least {required}")]
    InsufficientData {
        what: String,
        n: usize,
        required: usize,
    },

    /// A categorical factor has fewer than two levels
    #[error("Factor '{factor}' has {levels} level(s); at least 2 are required to fit the model")]
    DegenerateFactor { factor: String, levels: usize },

    /// The fixed-effects design cannot be solved
    #[error("Singular design: {reason}")]
    SingularDesign { reason: String },

    /// A value that must be log-transformed is zero or negative
    #[error("Cannot log-transform {metric} = {value}: value must be positive")]
    NonPositiveValue { metric: String, value: f64 },

    /// The variance-component optimization failed
    #[error("Optimization failed: {0}")]
    Optimization(String),

    /// No observations of a formulation are available
    #[error("No observations for the {formulation} formulation")]
    MissingFormulation { formulation: String },

    /// Invalid analysis configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A probability distribution could not be constructed
    #[error("Distribution error: {0}")]
    Distribution(String),
}

impl StatsError {
    pub(crate) fn insufficient(what: impl Into<String>, n: usize, required: usize) -> Self {
        StatsError::InsufficientData {
            what: what.into(),
            n,
            required,
        }
    }
}
