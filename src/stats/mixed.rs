//! Linear mixed model with a random intercept per group, fitted by REML
//!
//! The model is `y = Xβ + b[g] + ε` with `b ~ N(0, σ²_b)` and `ε ~ N(0, σ²)`.
//! Writing `γ = σ²_b / σ²`, the marginal covariance of group `i` is
//! `σ² (I + γ J)`, whose inverse and determinant have closed forms:
//!
//! - `(I + γJ)⁻¹ = I − γ / (1 + γ nᵢ) · J`
//! - `ln |I + γJ| = ln(1 + γ nᵢ)`
//!
//! so β and σ² are profiled out and only γ is optimized numerically. The
//! search runs over `τ = γ / (1 + γ)` in `[0, 1)` with Brent's method.

use std::collections::BTreeMap;

use argmin::core::{CostFunction, Executor, State, TerminationReason};
use argmin::solver::brent::BrentOpt;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::distributions::{normal_quantile, normal_two_sided_p};
use super::error::StatsError;
use super::model::ModelFrame;
use crate::data::Level;

const TAU_MAX: f64 = 1.0 - 1e-6;
const MAX_ITERS: u64 = 200;

/// One fixed-effect coefficient with Wald inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_err: f64,
    pub z: f64,
    pub p_value: f64,
    /// Lower bound of the 95% Wald interval
    pub ci_lower: f64,
    /// Upper bound of the 95% Wald interval
    pub ci_upper: f64,
}

/// Summary of a fitted random-intercept model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedModelSummary {
    pub formula: String,
    /// Name of the grouping factor
    pub group: String,
    pub n_obs: usize,
    pub n_groups: usize,
    pub min_group_size: usize,
    pub max_group_size: usize,
    pub mean_group_size: f64,
    /// Residual variance σ²
    pub scale: f64,
    /// Random intercept variance σ²_b
    pub group_var: f64,
    pub reml_log_likelihood: f64,
    pub converged: bool,
    pub coefficients: Vec<Coefficient>,
}

impl MixedModelSummary {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

/// Precomputed pieces of a random-intercept model
struct RandomIntercept {
    x: DMatrix<f64>,
    y: DVector<f64>,
    xtx: DMatrix<f64>,
    xty: DVector<f64>,
    /// Per group: size, column sums of X, sum of y, member rows
    groups: Vec<GroupSums>,
}

struct GroupSums {
    rows: Vec<usize>,
    x_sum: DVector<f64>,
    y_sum: f64,
}

/// Fit at a fixed variance ratio
struct Profiled {
    beta: DVector<f64>,
    sigma2: f64,
    xtvx_inv: DMatrix<f64>,
    neg_reml: f64,
}

impl RandomIntercept {
    fn new(x: DMatrix<f64>, y: DVector<f64>, members: Vec<Vec<usize>>) -> Self {
        let xtx = x.transpose() * &x;
        let xty = x.transpose() * &y;
        let groups = members
            .into_iter()
            .map(|rows| {
                let mut x_sum = DVector::zeros(x.ncols());
                let mut y_sum = 0.0;
                for &r in &rows {
                    x_sum += x.row(r).transpose();
                    y_sum += y[r];
                }
                GroupSums { rows, x_sum, y_sum }
            })
            .collect();
        Self {
            x,
            y,
            xtx,
            xty,
            groups,
        }
    }

    fn df(&self) -> f64 {
        (self.x.nrows() - self.x.ncols()) as f64
    }

    fn profile(&self, gamma: f64) -> Result<Profiled, StatsError> {
        let mut xtvx = self.xtx.clone();
        let mut xtvy = self.xty.clone();
        let mut logdet_h = 0.0;
        for g in &self.groups {
            let n_i = g.rows.len() as f64;
            let c = gamma / (1.0 + gamma * n_i);
            xtvx -= &g.x_sum * g.x_sum.transpose() * c;
            xtvy -= &g.x_sum * (c * g.y_sum);
            logdet_h += (1.0 + gamma * n_i).ln();
        }

        let chol =
            nalgebra::linalg::Cholesky::new(xtvx).ok_or_else(|| StatsError::SingularDesign {
                reason: "XᵀV⁻¹X is not positive definite".to_string(),
            })?;
        let beta = chol.solve(&xtvy);
        let residuals = &self.y - &self.x * &beta;

        let mut quad = 0.0;
        for g in &self.groups {
            let n_i = g.rows.len() as f64;
            let c = gamma / (1.0 + gamma * n_i);
            let (sum, sum_sq) = g.rows.iter().fold((0.0, 0.0), |acc, &r| {
                (acc.0 + residuals[r], acc.1 + residuals[r] * residuals[r])
            });
            quad += sum_sq - c * sum * sum;
        }

        let df = self.df();
        let sigma2 = quad / df;
        if !(sigma2 > 0.0 && sigma2.is_finite()) {
            return Err(StatsError::SingularDesign {
                reason: "residual variance is zero".to_string(),
            });
        }

        let logdet_xtvx: f64 = 2.0 * chol.l().diagonal().iter().map(|d| d.ln()).sum::<f64>();
        let neg_reml = 0.5
            * (df * sigma2.ln()
                + logdet_h
                + logdet_xtvx
                + df * (1.0 + (2.0 * std::f64::consts::PI).ln()));

        Ok(Profiled {
            beta,
            sigma2,
            xtvx_inv: chol.inverse(),
            neg_reml,
        })
    }
}

fn gamma_of(tau: f64) -> f64 {
    tau / (1.0 - tau)
}

/// Negative profiled REML log-likelihood as a function of τ
struct RemlCost<'a> {
    model: &'a RandomIntercept,
}

impl CostFunction for RemlCost<'_> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, tau: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.model.profile(gamma_of(*tau))?.neg_reml)
    }
}

/// Fit `frame` with a random intercept for each distinct value of `groups`
pub fn fit_random_intercept(
    frame: &ModelFrame,
    group_name: &str,
    groups: &[Level],
) -> Result<MixedModelSummary, StatsError> {
    let n = frame.n_obs();
    if groups.len() != n {
        return Err(StatsError::SingularDesign {
            reason: format!("{} group labels for {} observations", groups.len(), n),
        });
    }

    let mut members: BTreeMap<&Level, Vec<usize>> = BTreeMap::new();
    for (i, g) in groups.iter().enumerate() {
        members.entry(g).or_default().push(i);
    }
    if members.len() < 2 {
        return Err(StatsError::DegenerateFactor {
            factor: group_name.to_string(),
            levels: members.len(),
        });
    }
    let sizes: Vec<usize> = members.values().map(Vec::len).collect();

    let design = frame.design();
    let p = design.matrix.ncols();
    if n <= p {
        return Err(StatsError::insufficient(
            "mixed model residual degrees of freedom",
            n.saturating_sub(p),
            1,
        ));
    }

    let model = RandomIntercept::new(
        design.matrix,
        DVector::from_column_slice(frame.response()),
        members.into_values().collect(),
    );

    // The boundary γ = 0 is a legitimate optimum Brent's method cannot reach
    let boundary = model.profile(0.0)?;

    let solver = BrentOpt::new(0.0, TAU_MAX);
    let res = Executor::new(RemlCost { model: &model }, solver)
        .configure(|state| state.max_iters(MAX_ITERS))
        .run()
        .map_err(|e| StatsError::Optimization(e.to_string()))?;

    let converged = matches!(
        res.state.get_termination_reason(),
        Some(TerminationReason::SolverConverged)
    );
    let (gamma, fit) = match res.state.best_param {
        Some(tau) => {
            let interior = model.profile(gamma_of(tau))?;
            if interior.neg_reml < boundary.neg_reml {
                (gamma_of(tau), interior)
            } else {
                (0.0, boundary)
            }
        }
        None => (0.0, boundary),
    };

    if !converged {
        tracing::warn!(formula = %frame.formula(), "REML optimization did not report convergence");
    }

    let z_crit = normal_quantile(0.975)?;
    let coefficients = design
        .names
        .iter()
        .enumerate()
        .map(|(j, name)| -> Result<Coefficient, StatsError> {
            let estimate = fit.beta[j];
            let std_err = (fit.sigma2 * fit.xtvx_inv[(j, j)]).sqrt();
            let z = estimate / std_err;
            Ok(Coefficient {
                name: name.clone(),
                estimate,
                std_err,
                z,
                p_value: normal_two_sided_p(z)?,
                ci_lower: estimate - z_crit * std_err,
                ci_upper: estimate + z_crit * std_err,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let summary = MixedModelSummary {
        formula: frame.formula(),
        group: group_name.to_string(),
        n_obs: n,
        n_groups: sizes.len(),
        min_group_size: sizes.iter().copied().min().unwrap_or(0),
        max_group_size: sizes.iter().copied().max().unwrap_or(0),
        mean_group_size: n as f64 / sizes.len() as f64,
        scale: fit.sigma2,
        group_var: gamma * fit.sigma2,
        reml_log_likelihood: -fit.neg_reml,
        converged,
        coefficients,
    };

    tracing::debug!(
        formula = %summary.formula,
        scale = summary.scale,
        group_var = summary.group_var,
        "fitted random-intercept model"
    );

    Ok(summary)
}
