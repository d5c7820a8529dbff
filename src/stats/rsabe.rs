//! Reference-scaled average bioequivalence
//!
//! For highly variable drugs the acceptance limits widen with the
//! within-subject SD of the Reference product, `s_WR`. The linearized
//! criterion is
//!
//! ```text
//! (μT − μR)² − θs² · σ²_WR ≤ 0
//! ```
//!
//! tested through Howe's approximation to its 95% upper confidence bound,
//! together with a point-estimate constraint of 80–125%. Below the switching
//! SD the unscaled average bioequivalence decision applies.

use serde::{Deserialize, Serialize};

use super::cv::WithinSubjectCv;
use super::distributions::{chi2_quantile, t_quantile};
use super::error::StatsError;
use super::tost::PointEstimate;

/// Reference-scaling settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingConfig {
    pub regulatory_constant: f64,
    pub swr_threshold: f64,
    /// One-sided level of the upper bound
    pub alpha: f64,
    /// Point-estimate constraint on the ratio scale
    pub pe_limits: (f64, f64),
}

/// Outcome of the reference-scaled criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledCriterion {
    /// Point value of (μT − μR)² − θs²·σ²_WR
    pub scaled_criterion: f64,
    /// Howe's upper confidence bound of the criterion
    pub upper_bound: f64,
    pub pe_constraint_met: bool,
    /// Whether the scaled procedure applied (s_WR at or above the threshold)
    pub scaled: bool,
    /// Implied acceptance limits in percent
    pub limits: (f64, f64),
    pub be_conclusion: bool,
}

/// Evaluate the scaled criterion
///
/// `estimate` is the per-subject Test − Reference estimate and `reference`
/// the within-subject variability of the Reference product.
pub fn scaled_criterion(
    estimate: &PointEstimate,
    reference: &WithinSubjectCv,
    config: &ScalingConfig,
) -> Result<ScaledCriterion, StatsError> {
    if config.regulatory_constant <= 0.0 || config.swr_threshold <= 0.0 {
        return Err(StatsError::InvalidConfig {
            reason: "regulatory constant and switching SD must be positive".to_string(),
        });
    }

    let theta2 = config.regulatory_constant.powi(2);
    let pe = estimate.mean_log_difference;
    let s2wr = reference.mse;
    let df_wr = reference.df as f64;

    let e = pe * pe;
    let h = -theta2 * s2wr;

    let t = t_quantile(1.0 - config.alpha, estimate.df)?;
    let u_e = (pe.abs() + t * estimate.std_error).powi(2);
    let u_h = -theta2 * s2wr * df_wr / chi2_quantile(1.0 - config.alpha, df_wr)?;
    let upper_bound = e + h + ((u_e - e).powi(2) + (u_h - h).powi(2)).sqrt();

    let ratio = pe.exp();
    let pe_constraint_met = ratio >= config.pe_limits.0 && ratio <= config.pe_limits.1;

    let scaled = reference.swr >= config.swr_threshold;
    let (limits, be_conclusion) = if scaled {
        let width = config.regulatory_constant * reference.swr;
        (
            ((-width).exp() * 100.0, width.exp() * 100.0),
            upper_bound <= 0.0 && pe_constraint_met,
        )
    } else {
        (estimate.limits, estimate.be_criteria_met)
    };

    tracing::debug!(swr = reference.swr, upper_bound, scaled, "reference-scaled criterion");

    Ok(ScaledCriterion {
        scaled_criterion: e + h,
        upper_bound,
        pe_constraint_met,
        scaled,
        limits,
        be_conclusion,
    })
}
