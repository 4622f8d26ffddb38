//! Curve bootstrapping.
//!
//! - [`PiecewiseBootstrap`]: discount factors from deposits, swaps and bonds
//! - [`bootstrap_ratio`]: index-leg discount factors from par basis ratios

mod piecewise;
mod ratio;

pub use piecewise::PiecewiseBootstrap;
pub use ratio::bootstrap_ratio;
