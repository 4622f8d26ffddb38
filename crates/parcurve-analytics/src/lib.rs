//! # Parcurve Analytics
//!
//! Swap, asset swap and option-adjusted spread analytics for the Parcurve
//! fixed income library.
//!
//! This crate provides:
//!
//! - **Swaps**: USD LIBOR vanilla swaps, ratio basis swaps and Bermudan
//!   swaptions valued on a short rate lattice
//! - **Spreads**: bonds priced as asset swap packages, with solvers for the
//!   asset swap spread, LIBOR ratio, OAS and implied volatility
//! - **Options**: volatility curves by final maturity, implied from a scale
//!   of callable bonds
//!
//! ## Architecture
//!
//! `parcurve-analytics` depends on `parcurve-bonds` for instruments and
//! lattices and on `parcurve-curves` for curves and scenarios. Curves are
//! passed to every valuation call; nothing here caches a swap built against
//! an older curve.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use parcurve_analytics::prelude::*;
//! use parcurve_bonds::{Bond, CallFeature};
//! use parcurve_core::Date;
//! use parcurve_curves::TermStructureModel;
//!
//! let settle = Date::from_ymd(2025, 1, 15).unwrap();
//! let dfs: BTreeMap<Date, f64> = (0..=30)
//!     .map(|y| (settle.add_years(y).unwrap(), (-0.04 * f64::from(y)).exp()))
//!     .collect();
//! let curve = TermStructureModel::from_discount_factors("LIBOR", settle, &dfs).unwrap();
//!
//! let bond = Bond::builder()
//!     .coupon(0.05)
//!     .maturity(Date::from_ymd(2035, 1, 15).unwrap())
//!     .settlement(settle)
//!     .call(CallFeature::new(Date::from_ymd(2030, 1, 15).unwrap(), 100.0))
//!     .build()
//!     .unwrap();
//!
//! let request = OasRequest {
//!     price: Some(103.0),
//!     vol: Some(0.10),
//!     ..OasRequest::default()
//! };
//! let values = AssetSwap::new(bond).evaluate(&curve, &request).unwrap();
//! assert!((values.price - 103.0).abs() < 1e-6);
//! assert!(values.call_value > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod options;
pub mod spreads;
pub mod swaps;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::options::{implied_vol_curve, ScalePoint, VolCurve};
    pub use crate::spreads::{
        AssetSwap, AswTerms, BondValues, OasRequest, SpreadType, MAX_VOL, MIN_VOL,
    };
    pub use crate::swaps::{
        BasisSwap, BermudanSwaption, InterestRateSwap, SwapDirection, SWAP_NOTIONAL,
    };
}

pub use error::{AnalyticsError, AnalyticsResult};
pub use options::VolCurve;
pub use spreads::{AssetSwap, AswTerms, BondValues, OasRequest, SpreadType};
pub use swaps::{BasisSwap, BermudanSwaption, InterestRateSwap};
