//! Two-sample t-test

use serde::{Deserialize, Serialize};

use super::distributions::t_two_sided_p;
use super::error::StatsError;

/// Result of a two-sample t-test of `first` against `second`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoSampleTest {
    pub t_statistic: f64,
    pub p_value: f64,
    pub df: f64,
    /// Mean difference `first − second`
    pub difference: f64,
    /// Standard error of the difference
    pub std_error: f64,
    pub means: (f64, f64),
    pub sample_sizes: (usize, usize),
    pub equal_variance: bool,
}

/// Sample mean and unbiased variance
pub(crate) fn mean_var(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = if values.len() > 1 {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };
    (mean, var)
}

/// Difference of means with its standard error and degrees of freedom
///
/// Pooled variance when `equal_variance`, Welch–Satterthwaite otherwise.
pub(crate) fn difference_se_df(
    first: &[f64],
    second: &[f64],
    equal_variance: bool,
) -> Result<(f64, f64, f64), StatsError> {
    for (label, group) in [("first sample", first), ("second sample", second)] {
        if group.len() < 2 {
            return Err(StatsError::insufficient(
                format!("two-sample t-test ({label})"),
                group.len(),
                2,
            ));
        }
    }

    let (m1, v1) = mean_var(first);
    let (m2, v2) = mean_var(second);
    let n1 = first.len() as f64;
    let n2 = second.len() as f64;

    let (se, df) = if equal_variance {
        let df = n1 + n2 - 2.0;
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
        ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
    } else {
        let a = v1 / n1;
        let b = v2 / n2;
        let df = if a + b > 0.0 {
            (a + b).powi(2) / (a * a / (n1 - 1.0) + b * b / (n2 - 1.0))
        } else {
            n1 + n2 - 2.0
        };
        ((a + b).sqrt(), df)
    };

    Ok((m1 - m2, se, df))
}

/// Student (pooled) or Welch two-sample t-test
pub fn two_sample_ttest(
    first: &[f64],
    second: &[f64],
    equal_variance: bool,
) -> Result<TwoSampleTest, StatsError> {
    let (difference, std_error, df) = difference_se_df(first, second, equal_variance)?;
    if std_error == 0.0 {
        return Err(StatsError::SingularDesign {
            reason: "both samples are constant; t statistic is undefined".to_string(),
        });
    }
    let t_statistic = difference / std_error;

    Ok(TwoSampleTest {
        t_statistic,
        p_value: t_two_sided_p(t_statistic, df)?,
        df,
        difference,
        std_error,
        means: (mean_var(first).0, mean_var(second).0),
        sample_sizes: (first.len(), second.len()),
        equal_variance,
    })
}
