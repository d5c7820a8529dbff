//! Thin wrappers over the `statrs` distributions used in testing
//!
//! Every constructor validates its degrees of freedom and returns a
//! [`StatsError`] instead of panicking.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use super::error::StatsError;

fn check_df(df: f64) -> Result<(), StatsError> {
    if df.is_finite() && df > 0.0 {
        Ok(())
    } else {
        Err(StatsError::Distribution(format!(
            "degrees of freedom must be positive and finite, got {df}"
        )))
    }
}

fn students_t(df: f64) -> Result<StudentsT, StatsError> {
    check_df(df)?;
    StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))
}

fn standard_normal() -> Result<Normal, StatsError> {
    Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))
}

/// Quantile of Student's t(df) at probability `p`
pub fn t_quantile(p: f64, df: f64) -> Result<f64, StatsError> {
    Ok(students_t(df)?.inverse_cdf(p))
}

/// CDF of Student's t(df)
pub fn t_cdf(x: f64, df: f64) -> Result<f64, StatsError> {
    Ok(students_t(df)?.cdf(x))
}

/// Two-sided p-value of a t statistic
pub fn t_two_sided_p(t: f64, df: f64) -> Result<f64, StatsError> {
    if t.is_nan() {
        return Err(StatsError::Distribution("t statistic is NaN".to_string()));
    }
    Ok((2.0 * students_t(df)?.sf(t.abs())).min(1.0))
}

/// Upper tail probability of F(d1, d2)
pub fn f_sf(f: f64, d1: f64, d2: f64) -> Result<f64, StatsError> {
    check_df(d1)?;
    check_df(d2)?;
    let dist = FisherSnedecor::new(d1, d2).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(dist.sf(f.max(0.0)))
}

/// Quantile of the chi-square distribution
pub fn chi2_quantile(p: f64, df: f64) -> Result<f64, StatsError> {
    check_df(df)?;
    let dist = ChiSquared::new(df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(dist.inverse_cdf(p))
}

/// Standard normal quantile
pub fn normal_quantile(p: f64) -> Result<f64, StatsError> {
    Ok(standard_normal()?.inverse_cdf(p))
}

/// Two-sided p-value of a z statistic
pub fn normal_two_sided_p(z: f64) -> Result<f64, StatsError> {
    Ok((2.0 * standard_normal()?.sf(z.abs())).min(1.0))
}
