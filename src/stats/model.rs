//! Linear model frames with treatment-coded categorical factors
//!
//! A [`ModelFrame`] pairs a response vector with categorical [`Factor`]s and
//! builds the fixed-effects design matrix `y ~ C(f1) + C(f2) + ...`. The first
//! level of every factor is the baseline. Columns that are linear
//! combinations of earlier ones are dropped so the matrix always has full
//! column rank.

use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};

use super::error::StatsError;
use crate::data::Level;

/// Relative residual norm below which a column is considered aliased
const ALIAS_TOLERANCE: f64 = 1e-10;

/// A categorical predictor
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    name: String,
    levels: Vec<Level>,
    codes: Vec<usize>,
}

impl Factor {
    /// Build a factor from one level per observation
    ///
    /// Levels are sorted; the smallest becomes the baseline. Fails with
    /// [`StatsError::DegenerateFactor`] when fewer than two levels occur.
    pub fn new(name: impl Into<String>, values: &[Level]) -> Result<Self, StatsError> {
        let name = name.into();
        let levels: Vec<Level> = values
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if levels.len() < 2 {
            return Err(StatsError::DegenerateFactor {
                factor: name,
                levels: levels.len(),
            });
        }
        let codes = values
            .iter()
            .map(|v| levels.binary_search(v).unwrap_or(0))
            .collect();
        Ok(Self {
            name,
            levels,
            codes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Level index of every observation
    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

    /// Term label, e.g. `C(Period)`
    pub fn term(&self) -> String {
        format!("C({})", self.name)
    }
}

/// Response plus categorical predictors
#[derive(Debug, Clone)]
pub struct ModelFrame {
    response_name: String,
    response: Vec<f64>,
    factors: Vec<Factor>,
}

/// Full-rank design matrix with column labels and the term owning each column
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    pub matrix: DMatrix<f64>,
    pub names: Vec<String>,
    /// Index into the factor list, `None` for the intercept
    pub terms: Vec<Option<usize>>,
}

impl ModelFrame {
    pub fn new(
        response_name: impl Into<String>,
        response: Vec<f64>,
        factors: Vec<Factor>,
    ) -> Result<Self, StatsError> {
        let n = response.len();
        if let Some(f) = factors.iter().find(|f| f.codes.len() != n) {
            return Err(StatsError::SingularDesign {
                reason: format!(
                    "factor '{}' has {} values for {} responses",
                    f.name,
                    f.codes.len(),
                    n
                ),
            });
        }
        if response.iter().any(|v| !v.is_finite()) {
            return Err(StatsError::SingularDesign {
                reason: "response contains non-finite values".to_string(),
            });
        }
        Ok(Self {
            response_name: response_name.into(),
            response,
            factors,
        })
    }

    pub fn response(&self) -> &[f64] {
        &self.response
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn n_obs(&self) -> usize {
        self.response.len()
    }

    /// Formula string, e.g. `log_AUC ~ C(Formulation) + C(Period)`
    pub fn formula(&self) -> String {
        let terms: Vec<String> = self.factors.iter().map(Factor::term).collect();
        if terms.is_empty() {
            format!("{} ~ 1", self.response_name)
        } else {
            format!("{} ~ {}", self.response_name, terms.join(" + "))
        }
    }

    /// Design matrix using every factor
    pub fn design(&self) -> DesignMatrix {
        self.design_without(None)
    }

    /// Design matrix omitting the factor at index `skip`
    pub fn design_without(&self, skip: Option<usize>) -> DesignMatrix {
        let n = self.n_obs();
        let mut columns: Vec<DVector<f64>> = vec![DVector::from_element(n, 1.0)];
        let mut names = vec!["Intercept".to_string()];
        let mut terms = vec![None];

        for (fi, factor) in self.factors.iter().enumerate() {
            if Some(fi) == skip {
                continue;
            }
            for (li, level) in factor.levels.iter().enumerate().skip(1) {
                columns.push(DVector::from_iterator(
                    n,
                    factor.codes.iter().map(|&c| if c == li { 1.0 } else { 0.0 }),
                ));
                names.push(format!("{}[T.{}]", factor.term(), level));
                terms.push(Some(fi));
            }
        }

        let keep = independent_columns(&columns);
        let kept: Vec<DVector<f64>> = keep.iter().map(|&i| columns[i].clone()).collect();
        let matrix = if kept.is_empty() {
            DMatrix::zeros(n, 0)
        } else {
            DMatrix::from_columns(&kept)
        };

        DesignMatrix {
            matrix,
            names: keep.iter().map(|&i| names[i].clone()).collect(),
            terms: keep.iter().map(|&i| terms[i]).collect(),
        }
    }
}

/// Indices of a maximal linearly independent prefix-greedy subset of columns
///
/// Modified Gram-Schmidt: a column is kept when its residual after projecting
/// onto the kept columns is not negligible relative to its own norm.
fn independent_columns(columns: &[DVector<f64>]) -> Vec<usize> {
    let mut basis: Vec<DVector<f64>> = Vec::new();
    let mut keep = Vec::new();
    for (i, col) in columns.iter().enumerate() {
        let norm = col.norm();
        if norm == 0.0 {
            continue;
        }
        let mut residual = col.clone();
        for q in &basis {
            let proj = q.dot(&residual);
            residual -= q * proj;
        }
        let r = residual.norm();
        if r / norm > ALIAS_TOLERANCE {
            basis.push(residual / r);
            keep.push(i);
        }
    }
    keep
}

/// Ordinary least squares fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub coefficients: DVector<f64>,
    pub names: Vec<String>,
    pub terms: Vec<Option<usize>>,
    /// Residual sum of squares
    pub rss: f64,
    pub n_obs: usize,
    pub rank: usize,
    /// (XᵀX)⁻¹
    pub xtx_inv: DMatrix<f64>,
}

impl OlsFit {
    /// Fit `y = Xβ + ε` by the normal equations with a Cholesky factorization
    pub fn fit(design: DesignMatrix, y: &[f64]) -> Result<Self, StatsError> {
        let x = &design.matrix;
        let n = x.nrows();
        let p = x.ncols();
        if p == 0 {
            return Err(StatsError::SingularDesign {
                reason: "design has no columns".to_string(),
            });
        }
        let y = DVector::from_column_slice(y);
        let xtx = x.transpose() * x;
        let xty = x.transpose() * &y;
        let chol = nalgebra::linalg::Cholesky::new(xtx).ok_or_else(|| StatsError::SingularDesign {
            reason: "XᵀX is not positive definite".to_string(),
        })?;
        let coefficients = chol.solve(&xty);
        let residuals = &y - x * &coefficients;
        let rss = residuals.norm_squared();

        Ok(Self {
            coefficients,
            names: design.names,
            terms: design.terms,
            rss,
            n_obs: n,
            rank: p,
            xtx_inv: chol.inverse(),
        })
    }

    /// Residual degrees of freedom
    pub fn df_resid(&self) -> usize {
        self.n_obs.saturating_sub(self.rank)
    }

    /// Residual mean square, `None` without residual degrees of freedom
    pub fn mse(&self) -> Option<f64> {
        match self.df_resid() {
            0 => None,
            df => Some(self.rss / df as f64),
        }
    }
}
