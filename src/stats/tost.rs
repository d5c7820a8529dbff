//! Point estimate, confidence interval and TOST on the log scale
//!
//! All inference is on differences of natural logs. The point estimate and
//! interval are back-transformed to a Test/Reference ratio in percent.

use serde::{Deserialize, Serialize};

use super::distributions::{t_cdf, t_quantile};
use super::error::StatsError;
use super::ttest::{difference_se_df, mean_var};

/// Confidence and acceptance settings for one point-estimate computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TostConfig {
    /// Two-sided interval level is 1 − alpha
    pub alpha: f64,
    /// Acceptance limits on the ratio scale
    pub limits: (f64, f64),
}

impl Default for TostConfig {
    fn default() -> Self {
        Self {
            alpha: 0.10,
            limits: (0.80, 1.25),
        }
    }
}

/// Ratio of geometric means with its confidence interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEstimate {
    /// Number of paired subjects, or total observations for independent samples
    pub n: usize,
    /// exp(mean log difference) × 100
    pub point_estimate: f64,
    pub lower_90ci: f64,
    pub upper_90ci: f64,
    /// Both interval bounds inside the acceptance limits
    pub be_criteria_met: bool,
    pub mean_log_difference: f64,
    pub std_error: f64,
    pub df: f64,
    /// Acceptance limits in percent
    pub limits: (f64, f64),
    /// Confidence level of the interval in percent
    pub confidence_level: f64,
    /// One-sided p-value against the lower limit; `None` when SE is zero
    pub p_lower: Option<f64>,
    /// One-sided p-value against the upper limit; `None` when SE is zero
    pub p_upper: Option<f64>,
}

/// Point estimate from per-subject log differences (Test − Reference)
pub fn paired_estimate(log_diffs: &[f64], config: &TostConfig) -> Result<PointEstimate, StatsError> {
    let n = log_diffs.len();
    if n < 2 {
        return Err(StatsError::insufficient("point estimate (log ratios)", n, 2));
    }
    let (mean, var) = mean_var(log_diffs);
    let se = (var / n as f64).sqrt();
    from_log_estimate(mean, se, (n - 1) as f64, n, config)
}

/// Point estimate from independent Test and Reference log values
pub fn independent_estimate(
    test: &[f64],
    reference: &[f64],
    equal_variance: bool,
    config: &TostConfig,
) -> Result<PointEstimate, StatsError> {
    let (diff, se, df) = difference_se_df(test, reference, equal_variance)?;
    from_log_estimate(diff, se, df, test.len() + reference.len(), config)
}

/// Build the interval and TOST decision from a log-scale estimate
pub fn from_log_estimate(
    mean: f64,
    se: f64,
    df: f64,
    n: usize,
    config: &TostConfig,
) -> Result<PointEstimate, StatsError> {
    if !(config.alpha > 0.0 && config.alpha < 1.0) {
        return Err(StatsError::InvalidConfig {
            reason: format!("alpha must lie in (0, 1), got {}", config.alpha),
        });
    }
    let t_crit = t_quantile(1.0 - config.alpha / 2.0, df)?;
    let lower = (mean - t_crit * se).exp() * 100.0;
    let upper = (mean + t_crit * se).exp() * 100.0;

    let (lo_limit, hi_limit) = (config.limits.0 * 100.0, config.limits.1 * 100.0);

    let (p_lower, p_upper) = if se > 0.0 {
        let t_lower = (mean - config.limits.0.ln()) / se;
        let t_upper = (mean - config.limits.1.ln()) / se;
        (Some(1.0 - t_cdf(t_lower, df)?), Some(t_cdf(t_upper, df)?))
    } else {
        (None, None)
    };

    Ok(PointEstimate {
        n,
        point_estimate: mean.exp() * 100.0,
        lower_90ci: lower,
        upper_90ci: upper,
        be_criteria_met: lower >= lo_limit && upper <= hi_limit,
        mean_log_difference: mean,
        std_error: se,
        df,
        limits: (lo_limit, hi_limit),
        confidence_level: (1.0 - config.alpha) * 100.0,
        p_lower,
        p_upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_formulations() {
        let pe = paired_estimate(&[0.0, 0.0, 0.0, 0.0], &TostConfig::default()).unwrap();
        assert_relative_eq!(pe.point_estimate, 100.0);
        assert_relative_eq!(pe.lower_90ci, 100.0);
        assert_relative_eq!(pe.upper_90ci, 100.0);
        assert!(pe.be_criteria_met);
        assert!(pe.p_lower.is_none());
    }

    #[test]
    fn test_paired_interval() {
        let diffs = [0.05, -0.02, 0.10, 0.01, -0.04, 0.06];
        let pe = paired_estimate(&diffs, &TostConfig::default()).unwrap();
        let (mean, var) = mean_var(&diffs);
        let se = (var / 6.0).sqrt();
        let t = t_quantile(0.95, 5.0).unwrap();
        assert_relative_eq!(pe.point_estimate, mean.exp() * 100.0, epsilon = 1e-10);
        assert_relative_eq!(pe.lower_90ci, (mean - t * se).exp() * 100.0, epsilon = 1e-10);
        assert_relative_eq!(pe.upper_90ci, (mean + t * se).exp() * 100.0, epsilon = 1e-10);
        assert!(pe.be_criteria_met);
        assert!(pe.p_lower.unwrap() < 0.05 && pe.p_upper.unwrap() < 0.05);
    }

    #[test]
    fn test_wide_interval_fails() {
        let diffs = [0.5, -0.4, 0.6, -0.5];
        let pe = paired_estimate(&diffs, &TostConfig::default()).unwrap();
        assert!(!pe.be_criteria_met);
    }

    #[test]
    fn test_single_ratio_is_insufficient() {
        assert!(matches!(
            paired_estimate(&[0.1], &TostConfig::default()),
            Err(StatsError::InsufficientData { n: 1, required: 2, .. })
        ));
    }

    #[test]
    fn test_independent_samples() {
        let test = [4.0, 4.1, 3.9, 4.05];
        let reference = [4.0, 4.05, 3.95, 4.0];
        let pe = independent_estimate(&test, &reference, true, &TostConfig::default()).unwrap();
        assert_eq!(pe.df, 6.0);
        assert_eq!(pe.n, 8);
        assert_relative_eq!(pe.mean_log_difference, 0.0125, epsilon = 1e-12);
    }
}
