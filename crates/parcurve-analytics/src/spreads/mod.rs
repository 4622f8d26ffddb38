//! Asset swap and option-adjusted spreads.
//!
//! - [`AssetSwap`]: prices a bond as an asset swap package and solves for
//!   spread, ratio or implied volatility
//! - [`BondValues`]: the full result of a valuation
//! - [`OasRequest`]: two-of-three inputs dispatched by
//!   [`AssetSwap::evaluate`]
//!
//! Spreads come in two flavors, selected by [`SpreadType`]: a spread over
//! LIBOR on the swap's floating leg, or a zero spread over the whole curve.

mod asset_swap;
mod values;

pub use asset_swap::AssetSwap;
pub use values::{AswTerms, BondValues, OasRequest, SpreadType, MAX_VOL, MIN_VOL};
