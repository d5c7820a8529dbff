//! Analysis configuration
//!
//! [`AnalysisOptions`] collects every tunable of an analysis: the confidence
//! level and acceptance limits of the bioequivalence test, the formulation
//! labels used in the data, terminal phase settings and the reference-scaled
//! criterion.
//!
//! ```rust
//! use bioeq::AnalysisOptions;
//!
//! let options = AnalysisOptions::default()
//!     .with_labels("T", "R")
//!     .with_compute_terminal(true);
//! assert_eq!(options.alpha, 0.10);
//! ```

use serde::{Deserialize, Serialize};

use crate::data::FormulationLabels;
use crate::stats::StatsError;

pub use crate::nca::TerminalOptions;

/// Settings of the reference-scaled average bioequivalence procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsabeOptions {
    /// Regulatory constant θs = ln(1.25) / σW0 with σW0 = 0.25
    pub regulatory_constant: f64,
    /// Reference within-subject SD below which unscaled ABE applies
    pub swr_threshold: f64,
    /// One-sided level of the upper confidence bound
    pub alpha: f64,
}

impl Default for RsabeOptions {
    fn default() -> Self {
        Self {
            regulatory_constant: 1.25_f64.ln() / 0.25,
            swr_threshold: 0.294,
            alpha: 0.05,
        }
    }
}

/// Options shared by all design analyzers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Two-sided CI level is 1 - alpha (default 0.10, a 90% interval)
    pub alpha: f64,
    /// Acceptance limits on the ratio scale (default 0.80, 1.25)
    pub be_limits: (f64, f64),
    /// Label of the Test formulation in the data
    pub test_label: String,
    /// Label of the Reference formulation in the data
    pub reference_label: String,
    /// Terminal phase estimation
    pub terminal: TerminalOptions,
    /// Compute AUC_inf and t_half. `None` uses the design default
    pub compute_terminal: Option<bool>,
    /// Pooled-variance two-sample tests; Welch otherwise
    pub equal_variance: bool,
    pub rsabe: RsabeOptions,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            alpha: 0.10,
            be_limits: (0.80, 1.25),
            test_label: "Test".to_string(),
            reference_label: "Reference".to_string(),
            terminal: TerminalOptions::default(),
            compute_terminal: None,
            equal_variance: true,
            rsabe: RsabeOptions::default(),
        }
    }
}

impl AnalysisOptions {
    /// Terminal phase fits must reach R² ≥ 0.90
    pub fn strict() -> Self {
        Self {
            terminal: TerminalOptions {
                min_points: 3,
                min_r_squared: 0.90,
            },
            ..Default::default()
        }
    }

    /// Load options from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, StatsError> {
        let options: Self = serde_json::from_str(json).map_err(|e| StatsError::InvalidConfig {
            reason: e.to_string(),
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Check that the options describe a usable analysis
    pub fn validate(&self) -> Result<(), StatsError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(StatsError::InvalidConfig {
                reason: format!("alpha must lie in (0, 1), got {}", self.alpha),
            });
        }
        let (lower, upper) = self.be_limits;
        if !(lower > 0.0 && lower < 1.0 && upper > 1.0) {
            return Err(StatsError::InvalidConfig {
                reason: format!("invalid acceptance limits ({}, {})", lower, upper),
            });
        }
        if self.test_label == self.reference_label {
            return Err(StatsError::InvalidConfig {
                reason: format!("Test and Reference share the label '{}'", self.test_label),
            });
        }
        if self.terminal.min_points < 2 {
            return Err(StatsError::InvalidConfig {
                reason: "terminal phase needs at least 2 points".to_string(),
            });
        }
        if !(self.rsabe.alpha > 0.0 && self.rsabe.alpha < 1.0) {
            return Err(StatsError::InvalidConfig {
                reason: format!("RSABE alpha must lie in (0, 1), got {}", self.rsabe.alpha),
            });
        }
        Ok(())
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_be_limits(mut self, lower: f64, upper: f64) -> Self {
        self.be_limits = (lower, upper);
        self
    }

    /// Set the labels identifying Test and Reference in the formulation column
    pub fn with_labels(mut self, test: impl Into<String>, reference: impl Into<String>) -> Self {
        self.test_label = test.into();
        self.reference_label = reference.into();
        self
    }

    pub fn with_terminal(mut self, terminal: TerminalOptions) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn with_compute_terminal(mut self, compute: bool) -> Self {
        self.compute_terminal = Some(compute);
        self
    }

    pub fn with_equal_variance(mut self, equal_variance: bool) -> Self {
        self.equal_variance = equal_variance;
        self
    }

    pub fn with_rsabe(mut self, rsabe: RsabeOptions) -> Self {
        self.rsabe = rsabe;
        self
    }

    pub(crate) fn labels(&self) -> FormulationLabels {
        FormulationLabels {
            test: self.test_label.clone(),
            reference: self.reference_label.clone(),
        }
    }

    /// Confidence level of the two-sided interval, in percent
    pub fn confidence_pct(&self) -> f64 {
        (1.0 - self.alpha) * 100.0
    }
}
