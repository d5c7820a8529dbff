//! Seeded simulated study datasets
//!
//! Profiles follow a one-compartment model with first-order absorption,
//! perturbed by log-normal subject, period and residual effects. Columns use
//! the names expected by [`ColumnMapping::default`](crate::data::ColumnMapping)
//! and [`ColumnMapping::parallel_default`](crate::data::ColumnMapping::parallel_default).

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::data::{Dataset, Value};
use crate::error::BioeqError;
use crate::stats::StatsError;

const KA: f64 = 1.0;
const KE: f64 = 0.1;
const DOSE: f64 = 100.0;
const VOLUME: f64 = 10.0;

/// Settings shared by every simulated design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Total number of subjects. Parallel studies split them across the two arms.
    pub n_subjects: usize,
    pub time_points: Vec<f64>,
    /// True Test/Reference exposure ratio
    pub ratio: f64,
    /// SD of the log-scale subject effect
    pub between_subject_sd: f64,
    /// SD of the log-scale effect drawn per subject and period
    pub within_subject_sd: f64,
    /// SD of the log-scale error on each sample
    pub residual_sd: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_subjects: 24,
            time_points: vec![0.0, 0.5, 1.0, 2.0, 4.0, 6.0, 8.0, 12.0, 24.0],
            ratio: 0.95,
            between_subject_sd: 0.2,
            within_subject_sd: 0.15,
            residual_sd: 0.1,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn with_subjects(mut self, n_subjects: usize) -> Self {
        self.n_subjects = n_subjects;
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn with_variability(mut self, between: f64, within: f64, residual: f64) -> Self {
        self.between_subject_sd = between;
        self.within_subject_sd = within;
        self.residual_sd = residual;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), StatsError> {
        if self.n_subjects < 2 {
            return Err(StatsError::InvalidConfig {
                reason: format!("at least 2 subjects are required, got {}", self.n_subjects),
            });
        }
        if !(self.ratio.is_finite() && self.ratio > 0.0) {
            return Err(StatsError::InvalidConfig {
                reason: format!("ratio must be positive, got {}", self.ratio),
            });
        }
        if self.time_points.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(StatsError::InvalidConfig {
                reason: "time points must be finite and non-negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Zero-mean normal draws on the log scale
struct Noise {
    rng: StdRng,
    between: Normal<f64>,
    within: Normal<f64>,
    residual: Normal<f64>,
}

impl Noise {
    fn new(config: &SimulationConfig) -> Result<Self, StatsError> {
        let normal = |sd: f64| {
            Normal::new(0.0, sd).map_err(|e| StatsError::InvalidConfig {
                reason: format!("invalid standard deviation {sd}: {e}"),
            })
        };
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            between: normal(config.between_subject_sd)?,
            within: normal(config.within_subject_sd)?,
            residual: normal(config.residual_sd)?,
        })
    }

    fn between(&mut self) -> f64 {
        self.between.sample(&mut self.rng)
    }

    fn within(&mut self) -> f64 {
        self.within.sample(&mut self.rng)
    }

    fn residual(&mut self) -> f64 {
        self.residual.sample(&mut self.rng)
    }
}

/// Noise-free concentration of the one-compartment oral model
pub fn model_concentration(time: f64, relative_dose: f64) -> f64 {
    if time <= 0.0 {
        return 0.0;
    }
    (DOSE * relative_dose / VOLUME) * (KA / (KA - KE)) * ((-KE * time).exp() - (-KA * time).exp())
}

fn formulation_label(code: char) -> &'static str {
    if code.eq_ignore_ascii_case(&'T') {
        "Test"
    } else {
        "Reference"
    }
}

/// Subjects cycle through `sequences`; each letter gives that period's formulation
fn crossover(config: &SimulationConfig, sequences: &[&str]) -> Result<Dataset, BioeqError> {
    config.validate()?;
    let mut noise = Noise::new(config)?;
    let mut builder = Dataset::builder(&[
        "SubjectID",
        "Sequence",
        "Period",
        "Formulation",
        "Time (hr)",
        "Concentration (ng/mL)",
    ]);

    for subject in 1..=config.n_subjects {
        let sequence = sequences[(subject - 1) % sequences.len()];
        let subject_effect = noise.between();

        for (period, code) in sequence.chars().enumerate() {
            let label = formulation_label(code);
            let relative_dose = if label == "Test" { config.ratio } else { 1.0 };
            let period_effect = noise.within();

            for &time in &config.time_points {
                let conc = model_concentration(time, relative_dose)
                    * (subject_effect + period_effect + noise.residual()).exp();
                builder = builder.row([
                    Value::from(subject),
                    Value::from(sequence),
                    Value::from(period + 1),
                    Value::from(label),
                    Value::from(time),
                    Value::from(conc.max(0.0)),
                ]);
            }
        }
    }

    tracing::debug!(subjects = config.n_subjects, ?sequences, "simulated crossover dataset");
    Ok(builder.build()?)
}

/// Two-period crossover with sequences TR and RT
pub fn crossover_2x2(config: &SimulationConfig) -> Result<Dataset, BioeqError> {
    crossover(config, &["TR", "RT"])
}

/// Three-period partial replicate with sequences TRR, RTR and RRT
pub fn partial_replicate(config: &SimulationConfig) -> Result<Dataset, BioeqError> {
    crossover(config, &["TRR", "RTR", "RRT"])
}

/// Four-period full replicate with sequences TRTR and RTRT
pub fn full_replicate(config: &SimulationConfig) -> Result<Dataset, BioeqError> {
    crossover(config, &["TRTR", "RTRT"])
}

/// Parallel study, subjects alternating between the Test and Reference arms
pub fn parallel(config: &SimulationConfig) -> Result<Dataset, BioeqError> {
    config.validate()?;
    let mut noise = Noise::new(config)?;
    let mut builder = Dataset::builder(&[
        "SubjectID",
        "Formulation",
        "Time (hr)",
        "Concentration (ng/mL)",
    ]);

    for subject in 1..=config.n_subjects {
        let label = if subject % 2 == 1 { "Test" } else { "Reference" };
        let relative_dose = if label == "Test" { config.ratio } else { 1.0 };
        let subject_effect = noise.between();

        for &time in &config.time_points {
            let conc = model_concentration(time, relative_dose)
                * (subject_effect + noise.residual()).exp();
            builder = builder.row([
                Value::from(subject),
                Value::from(label),
                Value::from(time),
                Value::from(conc.max(0.0)),
            ]);
        }
    }

    tracing::debug!(subjects = config.n_subjects, "simulated parallel dataset");
    Ok(builder.build()?)
}
