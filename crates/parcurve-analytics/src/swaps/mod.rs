//! USD LIBOR swaps used to decompose bonds into asset swaps.
//!
//! - [`InterestRateSwap`]: semiannual 30/360 fixed against quarterly
//!   ACT/360 3M LIBOR plus spread
//! - [`BasisSwap`]: quarterly ratio-of-LIBOR against an index leg
//! - [`BermudanSwaption`]: yearly exercise into a forward-starting swap,
//!   valued on a short rate lattice
//!
//! All swaps have notional 100 so values read as points of par.

mod basis;
mod irs;
mod swaption;

pub use basis::BasisSwap;
pub use irs::{InterestRateSwap, SwapDirection, SWAP_NOTIONAL};
pub use swaption::BermudanSwaption;
