//! Study design analyzers
//!
//! Each analyzer is built atomically from a [`Dataset`](crate::data::Dataset)
//! and a [`ColumnMapping`](crate::data::ColumnMapping): columns are validated,
//! parameters computed per analysis unit and log-transformed, and the rows
//! sorted. Any failure aborts construction. The statistical methods only read
//! the resulting [`ParameterTable`].
//!
//! | Analyzer | Units | Operations |
//! |----------|-------|------------|
//! | [`Crossover2x2`] | subject × period × formulation | ANOVA, mixed model, point estimate, summary |
//! | [`ParallelDesign`] | subject × formulation | ANOVA, t-test, point estimate, summary |
//! | [`ReplicateCrossover`] | subject × period × formulation | crossover analyses, within-subject CV, RSABE |

mod analysis;
mod crossover;
mod metric;
mod parallel;
mod replicate;
mod results;
mod table;

pub use crossover::Crossover2x2;
pub use metric::Metric;
pub use parallel::ParallelDesign;
pub use replicate::{ReplicateCrossover, ReplicateDesign};
pub use results::{AnovaResult, CvResult, PointEstimateResult, ResultMapping, RsabeResult, TTestResult};
pub use table::{ParameterRow, ParameterTable, SummaryRow};
