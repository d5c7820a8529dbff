//! Per-unit pharmacokinetic parameters
//!
//! | Parameter | Description |
//! |-----------|-------------|
//! | AUC | Area under the curve from first to last observation |
//! | Cmax | Maximum observed concentration |
//! | Tmax | Earliest time of Cmax |
//! | AUC_inf | AUC extrapolated to infinity (optional) |
//! | t_half | Terminal half-life (optional) |

use serde::{Deserialize, Serialize};

use super::error::NCAError;
use super::profile::Profile;
use super::terminal::{self, TerminalOptions};

/// Parameters computed for one analysis unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PkParameters {
    pub auc: f64,
    pub cmax: f64,
    pub tmax: f64,
    /// Terminal elimination rate constant, when a terminal phase was found
    pub lambda_z: Option<f64>,
    pub auc_inf: Option<f64>,
    pub t_half: Option<f64>,
}

impl PkParameters {
    /// Compute parameters in the order AUC, Cmax, Tmax, then the terminal phase
    ///
    /// With `compute_terminal` false the optional fields are left empty.
    pub fn from_profile(
        profile: &Profile,
        compute_terminal: bool,
        options: &TerminalOptions,
    ) -> Result<Self, NCAError> {
        let auc = profile.auc()?;
        let cmax = profile.cmax();
        let tmax = profile.tmax();

        let mut params = Self {
            auc,
            cmax,
            tmax,
            lambda_z: None,
            auc_inf: None,
            t_half: None,
        };

        if compute_terminal {
            match terminal::lambda_z(profile, options) {
                Some(phase) => {
                    params.lambda_z = Some(phase.lambda_z);
                    params.auc_inf = Some(terminal::auc_inf(auc, profile.clast(), phase.lambda_z));
                    params.t_half = Some(phase.half_life());
                }
                None => {
                    tracing::debug!(
                        points = profile.len(),
                        "no terminal phase, AUC_inf and t_half left missing"
                    );
                }
            }
        }

        Ok(params)
    }

    /// Convenience wrapper building the [`Profile`] from raw observations
    pub fn from_observations(
        times: &[f64],
        concentrations: &[f64],
        compute_terminal: bool,
        options: &TerminalOptions,
    ) -> Result<Self, NCAError> {
        let profile = Profile::new(times, concentrations)?;
        Self::from_profile(&profile, compute_terminal, options)
    }

    /// ln(AUC)
    pub fn log_auc(&self) -> Result<f64, NCAError> {
        ln_positive("AUC", self.auc)
    }

    /// ln(Cmax)
    pub fn log_cmax(&self) -> Result<f64, NCAError> {
        ln_positive("Cmax", self.cmax)
    }
}

/// Natural log of a strictly positive parameter value
pub fn ln_positive(parameter: &'static str, value: f64) -> Result<f64, NCAError> {
    if value > 0.0 && value.is_finite() {
        Ok(value.ln())
    } else {
        Err(NCAError::NonPositiveLog { parameter, value })
    }
}
