//! Bond instruments.
//!
//! - [`Bond`]: fixed-coupon bond with price/yield and yield-to-worst
//! - [`CallFeature`]: call provision expanded into a [`CallEntry`] schedule
//! - [`TreasuryBill`]: discount-basis bills
//! - [`reference_bond`]: restates a bond in the standard par-call structure
//!
//! Municipal tax analytics ([`Bond::qtax`], [`Bond::after_tax_yield`]) are
//! defined on [`Bond`] in the `municipal` module.

mod bill;
mod bond;
mod call;
mod municipal;
mod reference;

pub use bill::{BillInput, TreasuryBill};
pub use bond::{
    Bond, BondBuilder, BondCalc, CalcInput, MAX_ITERATIONS, MIN_YIELD, PAR, YIELD_TOLERANCE,
};
pub use call::{CallEntry, CallFeature};
pub use municipal::{AfterTaxYield, QualifiedTax, TaxRates, DE_MINIMIS_POINTS_PER_YEAR};
pub use reference::{reference_bond, reference_call_date, DEFAULT_CALL_YEARS};
