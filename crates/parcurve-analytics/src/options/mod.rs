//! Volatility for valuing call options on bonds.
//!
//! Call rights are valued on short rate lattices from `parcurve-bonds`; this
//! module holds the volatility inputs to those lattices.
//!
//! - [`VolCurve`]: volatility by final maturity for a given call tenor
//! - [`implied_vol_curve`]: implied volatilities from a scale of callable
//!   bonds

mod vol_curve;

pub use vol_curve::{implied_vol_curve, ScalePoint, VolCurve, DEFAULT_CALL_TENOR};
