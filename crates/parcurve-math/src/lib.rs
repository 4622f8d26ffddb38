//! # Parcurve Math
//!
//! Numerical building blocks for curve construction and bond valuation:
//!
//! - **Solvers**: the secant method, with fallible-objective support
//! - **Interpolation**: linear and log-linear

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator, LogLinearInterpolator};
    pub use crate::solvers::{secant, try_secant, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
