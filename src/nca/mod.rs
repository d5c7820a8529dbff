//! Non-Compartmental Analysis (NCA) of concentration-time profiles
//!
//! This module derives the per-unit pharmacokinetic parameters used by the
//! bioequivalence analyzers. It works on plain slices and knows nothing about
//! datasets or study designs.
//!
//! # Key Parameters
//!
//! | Parameter | Description |
//! |-----------|-------------|
//! | AUC | Linear trapezoidal area from first to last observation |
//! | Cmax | Maximum observed concentration |
//! | Tmax | Earliest time of maximum concentration |
//! | λz | Terminal elimination rate constant |
//! | AUC_inf | AUC extrapolated to infinity (AUC + Clast/λz) |
//! | t_half | Terminal half-life (ln(2)/λz) |
//!
//! # Usage
//!
//! ```rust
//! use bioeq::nca::{PkParameters, TerminalOptions};
//!
//! let times = [4.0, 0.0, 1.0, 2.0, 8.0];
//! let concs = [4.0, 0.0, 10.0, 8.0, 1.0];
//!
//! let params = PkParameters::from_observations(&times, &concs, true, &TerminalOptions::default())?;
//! assert_eq!(params.cmax, 10.0);
//! assert_eq!(params.tmax, 1.0);
//! assert!(params.auc_inf.is_some());
//! # Ok::<(), bioeq::nca::NCAError>(())
//! ```

mod auc;
mod error;
mod params;
mod profile;
mod terminal;

pub use auc::{auc_segment, trapezoidal_auc};
pub use error::NCAError;
pub use params::{ln_positive, PkParameters};
pub use profile::Profile;
pub use terminal::{auc_inf, half_life, lambda_z, TerminalOptions, TerminalPhase};
