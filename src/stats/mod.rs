//! Statistical routines for bioequivalence testing
//!
//! Everything here works on plain vectors of log-scale values and
//! [`Level`](crate::data::Level) labels. The design analyzers assemble those
//! inputs from their parameter tables.
//!
//! | Routine | Purpose |
//! |---------|---------|
//! | [`anova_type2`] | Type II ANOVA of an additive factorial model |
//! | [`fit_random_intercept`] | REML mixed model with a random intercept per subject |
//! | [`two_sample_ttest`] | Student or Welch two-sample t-test |
//! | [`paired_estimate`], [`independent_estimate`] | Ratio of geometric means with CI and TOST |
//! | [`within_subject_cv`] | Within-subject CV from replicated measurements |
//! | [`scaled_criterion`] | Reference-scaled average bioequivalence |
//! | [`describe`] | Descriptive statistics |

mod anova;
mod cv;
mod descriptive;
pub mod distributions;
mod error;
mod mixed;
mod model;
mod rsabe;
mod tost;
mod ttest;

pub use anova::{anova_type2, AnovaRow, AnovaTable};
pub use cv::{cv_from_log_variance, within_subject_cv, WithinSubjectCv};
pub use descriptive::{describe, Descriptive};
pub use error::StatsError;
pub use mixed::{fit_random_intercept, Coefficient, MixedModelSummary};
pub use model::{DesignMatrix, Factor, ModelFrame, OlsFit};
pub use rsabe::{scaled_criterion, ScaledCriterion, ScalingConfig};
pub use tost::{from_log_estimate, independent_estimate, paired_estimate, PointEstimate, TostConfig};
pub use ttest::{two_sample_ttest, TwoSampleTest};
