//! Day count conventions.
//!
//! - [`Act360`]: money market, LIBOR legs, bill discount
//! - [`Act365Fixed`]: constant 365-day year
//! - [`ActActIsda`]: calendar-year split; curve time axis
//! - [`ActActIcma`]: period-based bond basis (Treasuries)
//! - [`Thirty360`]: 30/360 bond basis (munis, swap fixed legs)
//!
//! ```rust
//! use parcurve_core::daycounts::{DayCount, Thirty360};
//! use parcurve_core::types::Date;
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//! assert_eq!(Thirty360.year_fraction_f64(start, end), 0.5);
//! ```

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::{ActActIcma, ActActIsda};
pub use thirty360::Thirty360;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
pub trait DayCount: Send + Sync {
    /// Market name of the convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Year fraction from `start` to `end`; negative when `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Day count from `start` to `end` under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction as `f64` for pricing arithmetic.
    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(0.0)
    }
}

/// Runtime selector over the supported day counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/360
    #[serde(alias = "ACT/360")]
    Act360,
    /// Actual/365 Fixed
    #[serde(alias = "ACT/365F")]
    Act365Fixed,
    /// Actual/Actual ISDA
    #[serde(alias = "ACT/ACT ISDA", alias = "ACT/ACT")]
    ActActIsda,
    /// Actual/Actual ICMA with semi-annual reference periods
    #[serde(alias = "ACT/ACT ICMA")]
    ActActIcma,
    /// 30/360 bond basis
    #[serde(alias = "30/360")]
    Thirty360,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::ActActIcma => Box::new(ActActIcma::semi_annual()),
            DayCountConvention::Thirty360 => Box::new(Thirty360),
        }
    }

    /// Market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::ActActIcma => "ACT/ACT ICMA",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Year fraction without boxing.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction_f64(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction_f64(start, end),
            DayCountConvention::ActActIsda => ActActIsda.year_fraction_f64(start, end),
            DayCountConvention::ActActIcma => {
                ActActIcma::semi_annual().year_fraction_f64(start, end)
            }
            DayCountConvention::Thirty360 => Thirty360.year_fraction_f64(start, end),
        }
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACT365FIXED" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTACTISDA" => {
                Ok(DayCountConvention::ActActIsda)
            }
            "ACT/ACT ICMA" | "ACT/ACT BOND" | "ACTACTICMA" | "ISMA" => {
                Ok(DayCountConvention::ActActIcma)
            }
            "30/360" | "30/360 US" | "BOND" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(CoreError::parse(s, "day count convention")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_enum_dispatch_matches_structs() {
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        let end = Date::from_ymd(2025, 8, 31).unwrap();
        assert_relative_eq!(
            DayCountConvention::Thirty360.year_fraction(start, end),
            Thirty360.year_fraction_f64(start, end)
        );
        assert_relative_eq!(
            DayCountConvention::Act360.year_fraction(start, end),
            212.0 / 360.0
        );
    }

    #[test]
    fn test_parse_roundtrip_names() {
        for dc in [
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::ActActIcma,
            DayCountConvention::Thirty360,
        ] {
            assert_eq!(dc.name().parse::<DayCountConvention>().unwrap(), dc);
            assert_eq!(dc.to_day_count().name(), dc.name());
        }
        assert!("ACT/999".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_serde_alias() {
        let dc: DayCountConvention = serde_json::from_str("\"30/360\"").unwrap();
        assert_eq!(dc, DayCountConvention::Thirty360);
    }
}
