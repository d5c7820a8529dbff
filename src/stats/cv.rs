//! Within-subject coefficient of variation
//!
//! Fitted as the one-way model `y ~ C(subject)` on repeated log-scale
//! measurements of one formulation. The residual mean square estimates the
//! within-subject variance σ²_W and
//!
//! ```text
//! CV% = 100 · √(exp(σ²_W) − 1)
//! ```

use serde::{Deserialize, Serialize};

use super::error::StatsError;
use super::model::{Factor, ModelFrame, OlsFit};
use crate::data::Level;

/// Within-subject variability of one formulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithinSubjectCv {
    /// CV in percent
    pub within_subject_cv: f64,
    /// Residual mean square, i.e. σ²_W on the log scale
    pub mse: f64,
    /// Within-subject standard deviation √mse
    pub swr: f64,
    /// Residual degrees of freedom
    pub df: usize,
    pub n_subjects: usize,
}

/// CV% from a log-scale variance
pub fn cv_from_log_variance(variance: f64) -> f64 {
    100.0 * (variance.exp() - 1.0).sqrt()
}

/// Estimate within-subject variability from replicated log values
///
/// `subjects` and `log_values` are parallel. Subjects with a single
/// observation contribute no degrees of freedom.
pub fn within_subject_cv(
    response: &str,
    subject_name: &str,
    subjects: &[Level],
    log_values: &[f64],
) -> Result<WithinSubjectCv, StatsError> {
    let factor = Factor::new(subject_name, subjects)?;
    let n_subjects = factor.levels().len();
    let frame = ModelFrame::new(response, log_values.to_vec(), vec![factor])?;
    let fit = OlsFit::fit(frame.design(), frame.response())?;

    let df = fit.df_resid();
    let mse = fit.mse().ok_or_else(|| {
        StatsError::insufficient("within-subject degrees of freedom", df, 1)
    })?;

    tracing::debug!(formula = %frame.formula(), mse, df, "within-subject variance");

    Ok(WithinSubjectCv {
        within_subject_cv: cv_from_log_variance(mse),
        mse,
        swr: mse.sqrt(),
        df,
        n_subjects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lv(values: &[i64]) -> Vec<Level> {
        values.iter().map(|&v| Level::from(v)).collect()
    }

    #[test]
    fn test_pooled_within_variance() {
        // Subject 1: 1.0, 1.2 (ss 0.02); subject 2: 2.0, 2.4 (ss 0.08); df = 2
        let cv = within_subject_cv(
            "log_AUC",
            "Subject",
            &lv(&[1, 1, 2, 2]),
            &[1.0, 1.2, 2.0, 2.4],
        )
        .unwrap();
        assert_relative_eq!(cv.mse, 0.05, epsilon = 1e-12);
        assert_eq!(cv.df, 2);
        assert_eq!(cv.n_subjects, 2);
        assert_relative_eq!(cv.within_subject_cv, 100.0 * (0.05f64.exp() - 1.0).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_singletons_add_no_df() {
        let cv = within_subject_cv(
            "y",
            "Subject",
            &lv(&[1, 1, 2, 3]),
            &[1.0, 1.2, 5.0, 7.0],
        )
        .unwrap();
        assert_eq!(cv.df, 1);
        assert_relative_eq!(cv.mse, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_no_replicates() {
        assert!(matches!(
            within_subject_cv("y", "Subject", &lv(&[1, 2, 3]), &[1.0, 2.0, 3.0]),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_known_cv() {
        // σ²_W = ln(1 + 0.3²) gives a CV of exactly 30%
        assert_relative_eq!(cv_from_log_variance((1.09f64).ln()), 30.0, epsilon = 1e-10);
    }
}
