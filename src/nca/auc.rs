//! Trapezoidal integration of concentration-time data
//!
//! Pure functions on raw slices. Callers are responsible for passing data
//! sorted by ascending time; [`Profile`](super::Profile) guarantees this.
//!
//! # Example
//!
//! ```rust
//! use bioeq::nca::trapezoidal_auc;
//!
//! let times = [0.0, 1.0, 2.0, 4.0];
//! let concs = [0.0, 10.0, 8.0, 4.0];
//! let auc = trapezoidal_auc(&times, &concs).unwrap();
//! assert!((auc - 26.0).abs() < 1e-12);
//! ```

use super::error::NCAError;

/// Linear trapezoidal AUC for a single segment
#[inline]
pub fn auc_segment(t1: f64, c1: f64, t2: f64, c2: f64) -> f64 {
    0.5 * (t2 - t1) * (c1 + c2)
}

/// AUC over the whole sequence by the linear trapezoidal rule
///
/// Computes Σ ½·(t[i+1] − t[i])·(c[i+1] + c[i]). An all-zero profile has an
/// AUC of 0.
///
/// # Errors
///
/// [`NCAError::InsufficientData`] with fewer than two points and
/// [`NCAError::LengthMismatch`] when the slices differ in length.
pub fn trapezoidal_auc(times: &[f64], concentrations: &[f64]) -> Result<f64, NCAError> {
    if times.len() != concentrations.len() {
        return Err(NCAError::LengthMismatch {
            times: times.len(),
            concentrations: concentrations.len(),
        });
    }
    if times.len() < 2 {
        return Err(NCAError::InsufficientData {
            n: times.len(),
            required: 2,
        });
    }

    Ok(times
        .windows(2)
        .zip(concentrations.windows(2))
        .map(|(t, c)| auc_segment(t[0], c[0], t[1], c[1]))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auc_segment() {
        assert!((auc_segment(0.0, 10.0, 1.0, 8.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_point_profile() {
        // 0.5 * (1 - 0) * (10 + 0)
        let auc = trapezoidal_auc(&[0.0, 1.0], &[0.0, 10.0]).unwrap();
        assert!((auc - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_multi_segment() {
        // 5 + 9 + 12 + 12 + 6
        let auc = trapezoidal_auc(
            &[0.0, 1.0, 2.0, 4.0, 8.0, 12.0],
            &[0.0, 10.0, 8.0, 4.0, 2.0, 1.0],
        )
        .unwrap();
        assert!((auc - 44.0).abs() < 1e-10);
    }

    #[test]
    fn test_all_zero_is_zero() {
        let auc = trapezoidal_auc(&[0.0, 1.0, 2.0], &[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(auc, 0.0);
    }

    #[test]
    fn test_insufficient_points() {
        assert_eq!(
            trapezoidal_auc(&[1.0], &[3.0]),
            Err(NCAError::InsufficientData { n: 1, required: 2 })
        );
        assert_eq!(
            trapezoidal_auc(&[], &[]),
            Err(NCAError::InsufficientData { n: 0, required: 2 })
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            trapezoidal_auc(&[0.0, 1.0], &[1.0]),
            Err(NCAError::LengthMismatch { .. })
        ));
    }
}
