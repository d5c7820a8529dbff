//! Linear trapezoidal AUC
//!
//! Tests cover:
//! - Hand-computed totals
//! - Input order invariance through `Profile`
//! - Monotonicity in concentrations
//! - Error cases

use approx::assert_relative_eq;
use bioeq::nca::*;

#[test]
fn test_linear_trapezoidal_simple_decreasing() {
    let times = vec![0.0, 1.0, 2.0, 4.0, 8.0];
    let concs = vec![10.0, 8.0, 6.0, 4.0, 2.0];

    let auc = trapezoidal_auc(&times, &concs).unwrap();

    // 9 + 7 + 10 + 12
    assert_relative_eq!(auc, 38.0, epsilon = 1e-10);
}

#[test]
fn test_linear_trapezoidal_exponential_decay() {
    let times = vec![0.0, 1.0, 2.0, 4.0, 8.0, 12.0, 24.0];
    let concs: Vec<f64> = times.iter().map(|t: &f64| 100.0 * (-0.1 * t).exp()).collect();

    let auc = trapezoidal_auc(&times, &concs).unwrap();

    // Exact integral is 1000 * (1 - e^-2.4) ≈ 909.3; trapezoids overestimate a convex curve
    assert!(auc > 909.0 && auc < 950.0);
}

#[test]
fn test_uneven_spacing() {
    let times = [0.0, 0.5, 1.0, 2.0, 4.0, 6.0, 8.0, 12.0, 24.0];
    let concs = [0.0, 4.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.5];
    let expected: f64 = times
        .windows(2)
        .zip(concs.windows(2))
        .map(|(t, c)| 0.5 * (t[1] - t[0]) * (c[0] + c[1]))
        .sum();

    assert_relative_eq!(trapezoidal_auc(&times, &concs).unwrap(), expected, epsilon = 1e-12);
}

#[test]
fn test_all_zero_profile() {
    let profile = Profile::new(&[0.0, 1.0, 2.0], &[0.0, 0.0, 0.0]).unwrap();
    assert_eq!(profile.auc().unwrap(), 0.0);
    assert_eq!(profile.cmax(), 0.0);
    assert_eq!(profile.tmax(), 0.0);
}

#[test]
fn test_order_invariance() {
    let times = [0.0, 1.0, 2.0, 4.0, 8.0];
    let concs = [0.0, 10.0, 8.0, 4.0, 1.0];
    let sorted = Profile::new(&times, &concs).unwrap();

    let shuffled_times = [4.0, 0.0, 8.0, 2.0, 1.0];
    let shuffled_concs = [4.0, 0.0, 1.0, 8.0, 10.0];
    let shuffled = Profile::new(&shuffled_times, &shuffled_concs).unwrap();

    assert_eq!(sorted.auc().unwrap(), shuffled.auc().unwrap());
    assert_eq!(sorted.cmax(), shuffled.cmax());
    assert_eq!(sorted.tmax(), shuffled.tmax());
}

#[test]
fn test_monotone_in_concentration() {
    let times = [0.0, 1.0, 2.0, 4.0];
    let low = [0.0, 5.0, 4.0, 2.0];
    let high = [0.0, 5.0, 4.5, 2.0];

    let auc_low = trapezoidal_auc(&times, &low).unwrap();
    let auc_high = trapezoidal_auc(&times, &high).unwrap();
    assert!(auc_high > auc_low);
}

#[test]
fn test_errors() {
    assert_eq!(
        trapezoidal_auc(&[0.0], &[1.0]),
        Err(NCAError::InsufficientData { n: 1, required: 2 })
    );
    assert!(matches!(
        trapezoidal_auc(&[0.0, 1.0], &[1.0]),
        Err(NCAError::LengthMismatch { times: 2, concentrations: 1 })
    ));
    assert!(matches!(
        Profile::new(&[0.0, 1.0, 1.0], &[0.0, 2.0, 3.0]),
        Err(NCAError::DuplicateTime { .. })
    ));
    assert!(matches!(
        Profile::new(&[0.0, 1.0], &[0.0, -2.0]),
        Err(NCAError::NegativeConcentration { .. })
    ));
    assert_eq!(
        Profile::new(&[-0.5, 0.0, 1.0], &[0.0, 0.0, 2.0]),
        Err(NCAError::InvalidTimeSequence)
    );
}
