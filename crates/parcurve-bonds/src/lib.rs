//! # Parcurve Bonds
//!
//! Bond price/yield analytics for the Parcurve fixed income library.
//!
//! This crate provides:
//!
//! - **Conventions**: [`BondConventions`] presets for generic US, municipal
//!   and Treasury bonds
//! - **Instruments**: fixed-coupon [`Bond`]s with call schedules and
//!   yield-to-worst, Treasury bills and reference bonds
//! - **Municipal Tax**: de minimis cutoff and after-tax yields
//! - **Lattices**: short rate trees fitted to a curve for valuing call rights
//!
//! ## Example
//!
//! ```rust
//! use parcurve_bonds::prelude::*;
//! use parcurve_core::Date;
//!
//! let call = CallFeature::new(Date::from_ymd(2030, 1, 15).unwrap(), 100.0);
//! let bond = Bond::builder()
//!     .coupon(0.05)
//!     .maturity(Date::from_ymd(2035, 1, 15).unwrap())
//!     .settlement(Date::from_ymd(2025, 1, 15).unwrap())
//!     .call(call)
//!     .municipal()
//!     .build()
//!     .unwrap();
//!
//! // A premium price is worked to the call
//! let calc = bond.calc(CalcInput::Price(102.0)).unwrap();
//! assert_eq!(calc.to_date, Date::from_ymd(2030, 1, 15).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]

pub mod conventions;
pub mod error;
pub mod instruments;
pub mod options;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::conventions::{BondConventions, BondConventionsBuilder};
    pub use crate::error::{BondError, BondResult};
    pub use crate::instruments::{
        reference_bond, AfterTaxYield, BillInput, Bond, BondBuilder, BondCalc, CalcInput,
        CallEntry, CallFeature, QualifiedTax, TaxRates, TreasuryBill,
    };
    pub use crate::options::{
        BinomialTree, BlackKarasinski, HullWhite, ModelKind, ShortRateModel,
        DEFAULT_MEAN_REVERSION, DEFAULT_TREE_STEPS,
    };
}

pub use conventions::BondConventions;
pub use error::{BondError, BondResult};
pub use instruments::{Bond, BondCalc, CalcInput, CallEntry, CallFeature, TreasuryBill};
pub use options::{BinomialTree, ModelKind, ShortRateModel};
