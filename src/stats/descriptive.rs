//! Descriptive statistics of a sample

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

use super::error::StatsError;

/// Summary of one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptive {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1); 0 for a single value
    pub sd: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Coefficient of variation in percent; NaN when the mean is zero
    pub cv_pct: f64,
}

/// Describe a non-empty sample
pub fn describe(values: &[f64]) -> Result<Descriptive, StatsError> {
    let n = values.len();
    if n == 0 {
        return Err(StatsError::insufficient("descriptive statistics", 0, 1));
    }

    let mut data = Data::new(values.to_vec());
    let mean = data.mean().unwrap_or(f64::NAN);
    let sd = if n > 1 {
        data.std_dev().unwrap_or(0.0)
    } else {
        0.0
    };
    let cv_pct = if mean.abs() > f64::EPSILON {
        sd / mean * 100.0
    } else {
        f64::NAN
    };

    Ok(Descriptive {
        n,
        mean,
        sd,
        median: data.median(),
        min: data.min(),
        max: data.max(),
        cv_pct,
    })
}
