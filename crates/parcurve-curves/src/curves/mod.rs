//! Curve implementations.
//!
//! - [`DiscountCurve`]: pillar discount factors, log-linear
//! - [`SpreadedCurve`]: a zero-spread view over any curve

mod discount;
mod spreaded;

pub use discount::DiscountCurve;
pub use spreaded::SpreadedCurve;
