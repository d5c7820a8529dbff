use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BioeqError;

/// A column of the parameter table that can be analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "AUC")]
    Auc,
    #[serde(rename = "Cmax")]
    Cmax,
    #[serde(rename = "Tmax")]
    Tmax,
    #[serde(rename = "log_AUC")]
    LogAuc,
    #[serde(rename = "log_Cmax")]
    LogCmax,
    #[serde(rename = "AUC_inf")]
    AucInf,
    #[serde(rename = "t_half")]
    THalf,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Auc,
        Metric::Cmax,
        Metric::Tmax,
        Metric::LogAuc,
        Metric::LogCmax,
        Metric::AucInf,
        Metric::THalf,
    ];

    /// Column name in the parameter table
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Auc => "AUC",
            Metric::Cmax => "Cmax",
            Metric::Tmax => "Tmax",
            Metric::LogAuc => "log_AUC",
            Metric::LogCmax => "log_Cmax",
            Metric::AucInf => "AUC_inf",
            Metric::THalf => "t_half",
        }
    }

    /// Whether values are already on the natural-log scale
    pub fn is_log(&self) -> bool {
        matches!(self, Metric::LogAuc | Metric::LogCmax)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = BioeqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BioeqError::UnknownMetric {
                name: trimmed.to_string(),
            })
    }
}
