//! Type II analysis of variance for additive factorial models
//!
//! For a model without interactions the Type II sum of squares of a term is
//! the increase in residual sum of squares when that term alone is dropped.

use serde::{Deserialize, Serialize};

use super::distributions::f_sf;
use super::error::StatsError;
use super::model::{ModelFrame, OlsFit};

/// One row of an ANOVA table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaRow {
    pub term: String,
    pub sum_sq: f64,
    pub df: f64,
    /// `None` on the residual row and for fully aliased terms
    pub f_value: Option<f64>,
    pub p_value: Option<f64>,
}

/// A Type II ANOVA table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTable {
    pub formula: String,
    pub rows: Vec<AnovaRow>,
}

impl AnovaTable {
    /// Row of the named term, e.g. `C(Formulation)` or `Residual`
    pub fn row(&self, term: &str) -> Option<&AnovaRow> {
        self.rows.iter().find(|r| r.term == term)
    }

    pub fn residual(&self) -> Option<&AnovaRow> {
        self.row("Residual")
    }
}

/// Fit the frame by OLS and decompose its sums of squares
pub fn anova_type2(frame: &ModelFrame) -> Result<AnovaTable, StatsError> {
    let full = OlsFit::fit(frame.design(), frame.response())?;
    let df_resid = full.df_resid();
    if df_resid == 0 {
        return Err(StatsError::insufficient(
            "ANOVA residual degrees of freedom",
            0,
            1,
        ));
    }
    let mse = full.rss / df_resid as f64;

    let mut rows = Vec::with_capacity(frame.factors().len() + 1);
    for (i, factor) in frame.factors().iter().enumerate() {
        let reduced = OlsFit::fit(frame.design_without(Some(i)), frame.response())?;
        let df = full.rank - reduced.rank;
        let sum_sq = (reduced.rss - full.rss).max(0.0);

        let (f_value, p_value) = if df == 0 {
            tracing::warn!(term = %factor.term(), "term is fully aliased with other terms");
            (None, None)
        } else if mse > 0.0 {
            let f = (sum_sq / df as f64) / mse;
            (Some(f), Some(f_sf(f, df as f64, df_resid as f64)?))
        } else {
            (None, None)
        };

        rows.push(AnovaRow {
            term: factor.term(),
            sum_sq,
            df: df as f64,
            f_value,
            p_value,
        });
    }

    rows.push(AnovaRow {
        term: "Residual".to_string(),
        sum_sq: full.rss,
        df: df_resid as f64,
        f_value: None,
        p_value: None,
    });

    tracing::debug!(formula = %frame.formula(), mse, "fitted ANOVA");

    Ok(AnovaTable {
        formula: frame.formula(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Level;
    use crate::stats::model::Factor;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_way_anova() {
        // Group means 2 and 6, grand mean 4: SS_between = 4 * 4 = 16
        let a = Factor::new(
            "A",
            &[1i64, 1, 2, 2].iter().map(|&v| Level::from(v)).collect::<Vec<_>>(),
        )
        .unwrap();
        let frame = ModelFrame::new("y", vec![1.0, 3.0, 4.0, 8.0], vec![a]).unwrap();
        let table = anova_type2(&frame).unwrap();

        let row = table.row("C(A)").unwrap();
        assert_relative_eq!(row.sum_sq, 16.0, epsilon = 1e-10);
        assert_eq!(row.df, 1.0);
        assert_relative_eq!(row.f_value.unwrap(), 16.0 / 5.0, epsilon = 1e-10);

        let resid = table.residual().unwrap();
        assert_relative_eq!(resid.sum_sq, 10.0, epsilon = 1e-10);
        assert_eq!(resid.df, 2.0);
        assert_eq!(table.formula, "y ~ C(A)");
    }

    #[test]
    fn test_balanced_two_way_sums() {
        // Balanced additive data: y = a_effect + b_effect exactly, plus noise in one cell
        let a: Vec<Level> = [1i64, 1, 2, 2, 1, 1, 2, 2].iter().map(|&v| Level::from(v)).collect();
        let b: Vec<Level> = [1i64, 2, 1, 2, 1, 2, 1, 2].iter().map(|&v| Level::from(v)).collect();
        let y = vec![1.0, 2.0, 3.0, 4.0, 1.2, 1.8, 3.1, 4.1];
        let frame = ModelFrame::new(
            "y",
            y,
            vec![Factor::new("A", &a).unwrap(), Factor::new("B", &b).unwrap()],
        )
        .unwrap();
        let table = anova_type2(&frame).unwrap();

        // In a balanced design Type II equals the sequential decomposition
        let total: f64 = table.rows.iter().map(|r| r.sum_sq).sum();
        let y_mean = (1.0 + 2.0 + 3.0 + 4.0 + 1.2 + 1.8 + 3.1 + 4.1) / 8.0;
        let ss_total: f64 = [1.0, 2.0, 3.0, 4.0, 1.2, 1.8, 3.1, 4.1]
            .iter()
            .map(|v: &f64| (v - y_mean).powi(2))
            .sum();
        assert_relative_eq!(total, ss_total, epsilon = 1e-10);
        assert!(table.row("C(A)").unwrap().p_value.unwrap() < 0.01);
    }
}
