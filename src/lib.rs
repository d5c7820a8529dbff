//! Pharmacokinetic parameter estimation and bioequivalence statistics
//!
//! `bioeq` takes concentration-time data from a bioequivalence study,
//! computes the usual exposure parameters for every subject and period, and
//! compares a Test formulation against a Reference one.
//!
//! Three study layouts are supported:
//!
//! - [`Crossover2x2`]: two periods, sequences TR and RT
//! - [`ParallelDesign`]: one formulation per subject
//! - [`ReplicateCrossover`]: partial (TRR/RTR/RRT) or full (TRTR/RTRT)
//!   replicates, adding within-subject CV and reference-scaled ABE
//!
//! Data enters as a [`Dataset`] (see [`data::read_csv`]) together with a
//! [`ColumnMapping`]. Every result can be rendered as JSON through
//! [`ResultMapping`].

pub mod data;
pub mod design;
pub mod error;
pub mod nca;
pub mod options;
pub mod simulate;
pub mod stats;
pub mod validation;

pub use crate::data::{ColumnMapping, Dataset, Level, Value};
pub use crate::design::{
    Crossover2x2, Metric, ParallelDesign, ReplicateCrossover, ReplicateDesign, ResultMapping,
};
pub use crate::options::{AnalysisOptions, RsabeOptions};
pub use error::BioeqError;

pub mod prelude {
    pub mod data {
        pub use crate::data::{
            read_csv, AnalysisUnit, ColumnMapping, Dataset, Formulation, Level, Role, Value,
        };
    }
    pub mod stats {
        pub use crate::stats::{
            anova_type2, fit_random_intercept, paired_estimate, scaled_criterion,
            two_sample_ttest, within_subject_cv, Factor, ModelFrame,
        };
    }

    pub use crate::data::{read_csv, ColumnMapping, Dataset, Value};
    pub use crate::design::{
        AnovaResult, Crossover2x2, CvResult, Metric, ParallelDesign, ParameterTable,
        PointEstimateResult, ReplicateCrossover, ReplicateDesign, ResultMapping, RsabeResult,
        SummaryRow, TTestResult,
    };
    pub use crate::error::BioeqError;
    pub use crate::nca::{PkParameters, TerminalOptions};
    pub use crate::options::{AnalysisOptions, RsabeOptions};
    pub use crate::simulate::{self, SimulationConfig};
    pub use crate::stats::MixedModelSummary;
}
