//! Domain types.
//!
//! - [`Date`]: calendar date
//! - [`Frequency`]: payment frequency
//! - [`Tenor`] / [`TimeUnit`]: period expressions such as `3M` or `10Y`

mod date;
mod frequency;
mod tenor;

pub use date::Date;
pub use frequency::Frequency;
pub use tenor::{Tenor, TimeUnit};
