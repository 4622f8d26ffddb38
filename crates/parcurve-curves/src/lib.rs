//! # Parcurve Curves
//!
//! Discount and ratio curve construction for the Parcurve fixed income library.
//!
//! This crate provides:
//!
//! - **Curve Trait**: Core [`Curve`] trait and the [`CurveServices`] extension
//!   (deposit, swap and bond par rates)
//! - **Curve Types**: log-linear discount curves and zero-spread views
//! - **Rate Helpers**: deposits, swaps, bonds and ratio instruments quoted
//!   through shared [`SimpleQuote`] cells
//! - **Bootstrap**: piecewise discount bootstrap and the linear-ratio basis
//!   bootstrap
//! - **Models**: [`TermStructureModel`] with scenario shifts, [`RatioCurve`],
//!   and the [`CurveRegistry`] that owns them
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use parcurve_core::{Date, Tenor};
//! use parcurve_curves::prelude::*;
//!
//! let libor = BTreeMap::from([
//!     ("3M".to_string(), 4.50),
//!     ("1Y".to_string(), 4.35),
//!     ("5Y".to_string(), 4.05),
//! ]);
//! let mut model = TermStructureModel::new("LIBOR");
//! model.update(&libor, Some(Date::from_ymd(2025, 1, 13).unwrap())).unwrap();
//!
//! let ratios = BTreeMap::from([("1Y".to_string(), 0.70), ("5Y".to_string(), 0.75)]);
//! let mut muni = RatioCurve::new("MUNI");
//! muni.update(&model, &ratios).unwrap();
//!
//! let five_year = muni.par_ratio(&model, &Tenor::years(5)).unwrap();
//! assert!((five_year - 0.75).abs() < 1e-8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]

pub mod bootstrap;
pub mod curves;
pub mod error;
pub mod fixings;
pub mod helpers;
pub mod quotes;
pub mod ratio_curve;
pub mod registry;
pub mod services;
pub mod term_structure;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{bootstrap_ratio, PiecewiseBootstrap};
    pub use crate::curves::{DiscountCurve, SpreadedCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::fixings::{FixingStore, LIBOR_3M};
    pub use crate::helpers::{
        BondHelper, DepositHelper, HelperSet, HelperSnapshot, Quoted, RateHelper, RatioHelper, SwapHelper,
    };
    pub use crate::quotes::SimpleQuote;
    pub use crate::ratio_curve::RatioCurve;
    pub use crate::registry::{CurveKey, CurveRegistry};
    pub use crate::services::{par_swap_rate, CurveServices};
    pub use crate::term_structure::{ScenarioCurve, Scenarios, TermStructureModel};
    pub use crate::traits::Curve;
}

pub use curves::{DiscountCurve, SpreadedCurve};
pub use error::{CurveError, CurveResult};
pub use fixings::FixingStore;
pub use quotes::SimpleQuote;
pub use ratio_curve::RatioCurve;
pub use registry::{CurveKey, CurveRegistry};
pub use services::CurveServices;
pub use term_structure::TermStructureModel;
pub use traits::Curve;
