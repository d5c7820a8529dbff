//! Terminal phase analysis: λz, AUC∞ and half-life
//!
//! The terminal phase is the longest trailing run of strictly decreasing,
//! positive concentrations observed after Tmax. At least
//! [`TerminalOptions::min_points`] points are required. A log-linear fit
//! `ln(C) = a - λz·t` over those points gives the elimination rate constant.
//!
//! A terminal phase that cannot be estimated is not an error: callers receive
//! `None` and report AUC∞ and t½ as missing.

use serde::{Deserialize, Serialize};

use super::profile::Profile;

/// Options for terminal phase estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalOptions {
    /// Minimum number of points in the terminal regression (default: 3)
    pub min_points: usize,
    /// Minimum R² to accept a fit (default: 0.0, i.e. any fit)
    pub min_r_squared: f64,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            min_points: 3,
            min_r_squared: 0.0,
        }
    }
}

impl TerminalOptions {
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_min_r_squared(mut self, min_r_squared: f64) -> Self {
        self.min_r_squared = min_r_squared;
        self
    }
}

/// Fitted terminal phase of one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalPhase {
    /// Terminal elimination rate constant (1/time)
    pub lambda_z: f64,
    /// Intercept of the ln(C) vs time regression
    pub intercept: f64,
    /// Coefficient of determination of the fit
    pub r_squared: f64,
    /// Number of points used
    pub n_points: usize,
    /// First time point used
    pub time_first: f64,
    /// Last time point used
    pub time_last: f64,
}

impl TerminalPhase {
    /// Terminal half-life: ln(2) / λz
    pub fn half_life(&self) -> f64 {
        half_life(self.lambda_z)
    }
}

/// Estimate the terminal phase of a profile
///
/// Returns `None` when the profile ends at zero concentration, when fewer
/// than `min_points` trailing points decline strictly after Tmax, when the
/// fitted slope is non-negative, or when R² falls below `min_r_squared`.
///
/// # Examples
///
/// ```rust
/// use bioeq::nca::{lambda_z, Profile, TerminalOptions};
///
/// let times = [0.0, 1.0, 2.0, 4.0, 8.0];
/// let concs = [0.0, 10.0, 8.0, 4.0, 1.0];
/// let profile = Profile::new(&times, &concs).unwrap();
///
/// let terminal = lambda_z(&profile, &TerminalOptions::default()).unwrap();
/// assert_eq!(terminal.n_points, 3);
/// assert!(terminal.lambda_z > 0.0);
/// ```
pub fn lambda_z(profile: &Profile, options: &TerminalOptions) -> Option<TerminalPhase> {
    let times = profile.times();
    let concs = profile.concentrations();
    let last = profile.len().checked_sub(1)?;

    if concs[last] <= 0.0 {
        return None;
    }

    // Walk backwards while the curve strictly declines, staying after Tmax
    let floor = profile.cmax_idx() + 1;
    let mut first = last;
    while first > floor && concs[first - 1] > concs[first] {
        first -= 1;
    }

    let n_points = last - first + 1;
    if first < floor || n_points < options.min_points.max(2) {
        return None;
    }

    let x = &times[first..=last];
    let y: Vec<f64> = concs[first..=last].iter().map(|c| c.ln()).collect();

    let (slope, intercept, r_squared) = linear_regression(x, &y)?;
    if slope >= 0.0 || r_squared < options.min_r_squared {
        return None;
    }

    Some(TerminalPhase {
        lambda_z: -slope,
        intercept,
        r_squared,
        n_points,
        time_first: times[first],
        time_last: times[last],
    })
}

/// Terminal half-life from λz
#[inline]
pub fn half_life(lambda_z: f64) -> f64 {
    std::f64::consts::LN_2 / lambda_z
}

/// AUC extrapolated to infinity: AUClast + Clast / λz
#[inline]
pub fn auc_inf(auc_last: f64, clast: f64, lambda_z: f64) -> f64 {
    auc_last + clast / lambda_z
}

/// Ordinary least squares of y on x
///
/// Returns `(slope, intercept, r_squared)`, or `None` when x has no spread.
pub(crate) fn linear_regression(x: &[f64], y: &[f64]) -> Option<(f64, f64, f64)> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }

    let n_f = n as f64;
    let x_mean: f64 = x.iter().sum::<f64>() / n_f;
    let y_mean: f64 = y.iter().sum::<f64>() / n_f;

    let (ss_xy, ss_xx, ss_yy) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |acc, (xi, yi)| {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        (acc.0 + dx * dy, acc.1 + dx * dx, acc.2 + dy * dy)
    });

    if ss_xx.abs() < 1e-15 {
        return None;
    }

    let slope = ss_xy / ss_xx;
    let intercept = y_mean - slope * x_mean;
    let r_squared = if ss_yy.abs() < 1e-15 {
        1.0
    } else {
        (ss_xy * ss_xy) / (ss_xx * ss_yy)
    };

    Some((slope, intercept, r_squared))
}
