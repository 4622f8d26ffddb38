//! Short rate lattices for callable bonds and Bermudan swaptions.
//!
//! This module provides:
//!
//! - **Binomial Tree**: Interest rate tree for backward induction pricing
//! - **Short Rate Models**: Black-Karasinski (default) and Hull-White, fitted
//!   exactly to a discount curve
//!
//! # Example
//!
//! ```rust
//! use parcurve_bonds::options::{ModelKind, DEFAULT_MEAN_REVERSION};
//! use parcurve_core::Date;
//! use parcurve_curves::{Curve, CurveResult};
//!
//! struct Flat;
//!
//! impl Curve for Flat {
//!     fn discount_factor(&self, t: f64) -> CurveResult<f64> {
//!         Ok((-0.04 * t).exp())
//!     }
//!     fn reference_date(&self) -> Date {
//!         Date::from_ymd(2025, 1, 15).unwrap()
//!     }
//!     fn max_date(&self) -> Date {
//!         Date::from_ymd(2055, 1, 15).unwrap()
//!     }
//! }
//!
//! let model = ModelKind::BlackKarasinski.build(0.10, DEFAULT_MEAN_REVERSION);
//! let tree = model.build_tree(&Flat, 5.0, 20).unwrap();
//!
//! // A zero-coupon bond reprices off the curve
//! let pv = tree.value_cash_flows(&[(5.0, 100.0)], 0.0);
//! assert!((pv - 100.0 * (-0.2_f64).exp()).abs() < 1e-8);
//! ```

pub mod binomial_tree;
pub mod models;

pub use binomial_tree::BinomialTree;
pub use models::{
    BlackKarasinski, HullWhite, ModelKind, ShortRateModel, DEFAULT_MEAN_REVERSION,
    DEFAULT_TREE_STEPS,
};
