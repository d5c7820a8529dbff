//! Time-ordered concentration profile of one analysis unit
//!
//! [`Profile`] is the validated, analysis-ready form of a unit's observations:
//! sorted by time, free of duplicate times, with the index of Cmax cached.

use super::auc::trapezoidal_auc;
use super::error::NCAError;

/// A validated concentration-time profile
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    times: Vec<f64>,
    concentrations: Vec<f64>,
    cmax_idx: usize,
}

impl Profile {
    /// Build a profile from observations in any order
    ///
    /// Observations are sorted by time. Duplicate times are rejected, as are
    /// negative or non-finite times and concentrations.
    pub fn new(times: &[f64], concentrations: &[f64]) -> Result<Self, NCAError> {
        if times.len() != concentrations.len() {
            return Err(NCAError::LengthMismatch {
                times: times.len(),
                concentrations: concentrations.len(),
            });
        }
        if times.is_empty() {
            return Err(NCAError::InsufficientData { n: 0, required: 1 });
        }

        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(times.len());
        for (&t, &c) in times.iter().zip(concentrations) {
            if !t.is_finite() || t < 0.0 {
                return Err(NCAError::InvalidTimeSequence);
            }
            if !c.is_finite() || c < 0.0 {
                return Err(NCAError::NegativeConcentration { time: t, value: c });
            }
            pairs.push((t, c));
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(NCAError::DuplicateTime { time: w[0].0 });
        }

        let (times, concentrations): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

        // First index of the maximum, i.e. the earliest time reaching Cmax
        let mut cmax_idx = 0;
        for (i, &c) in concentrations.iter().enumerate() {
            if c > concentrations[cmax_idx] {
                cmax_idx = i;
            }
        }

        Ok(Self {
            times,
            concentrations,
            cmax_idx,
        })
    }

    /// Time points, ascending
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Concentrations, parallel to [`times`](Self::times)
    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub(crate) fn cmax_idx(&self) -> usize {
        self.cmax_idx
    }

    /// Maximum observed concentration
    pub fn cmax(&self) -> f64 {
        self.concentrations[self.cmax_idx]
    }

    /// Earliest time at which Cmax is observed
    pub fn tmax(&self) -> f64 {
        self.times[self.cmax_idx]
    }

    /// Last observed concentration
    pub fn clast(&self) -> f64 {
        self.concentrations[self.len() - 1]
    }

    /// Time of the last observation
    pub fn tlast(&self) -> f64 {
        self.times[self.len() - 1]
    }

    /// AUC from the first to the last observation (linear trapezoidal)
    pub fn auc(&self) -> Result<f64, NCAError> {
        trapezoidal_auc(&self.times, &self.concentrations)
    }
}
