//! Per-unit PK parameters

use approx::assert_relative_eq;
use bioeq::nca::*;

#[test]
fn test_basic_parameters() {
    let params = PkParameters::from_observations(
        &[0.0, 1.0, 2.0],
        &[0.0, 10.0, 0.0],
        false,
        &TerminalOptions::default(),
    )
    .unwrap();

    assert_relative_eq!(params.auc, 10.0, epsilon = 1e-12);
    assert_eq!(params.cmax, 10.0);
    assert_eq!(params.tmax, 1.0);
    assert!(params.lambda_z.is_none());
    assert!(params.auc_inf.is_none());
    assert!(params.t_half.is_none());
}

#[test]
fn test_tmax_ties_take_earliest_time() {
    let params = PkParameters::from_observations(
        &[0.0, 1.0, 2.0, 3.0],
        &[0.0, 5.0, 5.0, 1.0],
        false,
        &TerminalOptions::default(),
    )
    .unwrap();

    assert_eq!(params.cmax, 5.0);
    assert_eq!(params.tmax, 1.0);
}

#[test]
fn test_log_parameters() {
    let params = PkParameters::from_observations(
        &[0.0, 1.0, 2.0],
        &[0.0, 10.0, 0.0],
        false,
        &TerminalOptions::default(),
    )
    .unwrap();

    assert_relative_eq!(params.log_auc().unwrap(), 10f64.ln(), epsilon = 1e-12);
    assert_relative_eq!(params.log_cmax().unwrap(), 10f64.ln(), epsilon = 1e-12);
}

#[test]
fn test_log_of_zero_auc_fails() {
    let params = PkParameters::from_observations(
        &[0.0, 1.0],
        &[0.0, 0.0],
        false,
        &TerminalOptions::default(),
    )
    .unwrap();

    assert!(matches!(
        params.log_auc(),
        Err(NCAError::NonPositiveLog { parameter: "AUC", .. })
    ));
}

#[test]
fn test_terminal_parameters_consistent() {
    let times = [0.0, 0.5, 1.0, 2.0, 4.0, 8.0, 12.0];
    let concs = [0.0, 6.0, 9.0, 7.0, 5.0, 2.5, 1.25];
    let params = PkParameters::from_observations(&times, &concs, true, &TerminalOptions::default())
        .unwrap();

    let lambda_z = params.lambda_z.unwrap();
    assert_relative_eq!(params.t_half.unwrap(), std::f64::consts::LN_2 / lambda_z, epsilon = 1e-12);
    assert_relative_eq!(
        params.auc_inf.unwrap(),
        params.auc + 1.25 / lambda_z,
        epsilon = 1e-12
    );
    assert!(params.auc_inf.unwrap() > params.auc);
}
