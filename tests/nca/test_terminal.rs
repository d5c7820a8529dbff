//! Terminal phase estimation

use approx::assert_relative_eq;
use bioeq::nca::*;

fn profile(times: &[f64], concs: &[f64]) -> Profile {
    Profile::new(times, concs).unwrap()
}

#[test]
fn test_exact_exponential_tail() {
    let ke: f64 = 0.2;
    let times = [0.0, 1.0, 2.0, 4.0, 6.0, 8.0];
    let concs: Vec<f64> = times
        .iter()
        .map(|&t| if t == 0.0 { 0.0 } else { 100.0 * (-ke * t).exp() })
        .collect();

    let phase = lambda_z(&profile(&times, &concs), &TerminalOptions::default()).unwrap();

    assert_relative_eq!(phase.lambda_z, ke, epsilon = 1e-10);
    assert_relative_eq!(phase.r_squared, 1.0, epsilon = 1e-10);
    assert_relative_eq!(phase.half_life(), half_life(ke), epsilon = 1e-10);
    // Points after Tmax only
    assert_eq!(phase.n_points, 4);
    assert_eq!(phase.time_first, 2.0);
    assert_eq!(phase.time_last, 8.0);
}

#[test]
fn test_too_few_declining_points() {
    let p = profile(&[0.0, 1.0, 2.0, 3.0], &[0.0, 10.0, 8.0, 6.0]);
    assert!(lambda_z(&p, &TerminalOptions::default()).is_none());
    assert!(lambda_z(&p, &TerminalOptions::default().with_min_points(2)).is_some());
}

#[test]
fn test_zero_last_concentration() {
    let p = profile(&[0.0, 1.0, 2.0, 4.0, 8.0], &[0.0, 10.0, 8.0, 4.0, 0.0]);
    assert!(lambda_z(&p, &TerminalOptions::default()).is_none());
}

#[test]
fn test_rising_tail() {
    let p = profile(&[0.0, 1.0, 2.0, 4.0, 8.0], &[0.0, 2.0, 4.0, 6.0, 9.0]);
    assert!(lambda_z(&p, &TerminalOptions::default()).is_none());
}

#[test]
fn test_r_squared_threshold() {
    // Declining but not log-linear
    let p = profile(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 100.0, 99.0, 50.0, 1.0]);
    let loose = lambda_z(&p, &TerminalOptions::default()).unwrap();
    assert!(loose.r_squared < 0.99);
    assert!(lambda_z(&p, &TerminalOptions::default().with_min_r_squared(0.99)).is_none());
}

#[test]
fn test_auc_inf_formula() {
    assert_relative_eq!(auc_inf(40.0, 2.0, 0.5), 44.0, epsilon = 1e-12);
}
