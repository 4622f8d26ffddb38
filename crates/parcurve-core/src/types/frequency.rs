//! Payment frequency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::tenor::{Tenor, TimeUnit};
use crate::error::CoreError;

/// Payment frequency for coupon and floating legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Annual payments (1 per year)
    Annual,
    /// Semi-annual payments (2 per year) - most common for US bonds
    #[default]
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
    /// Zero coupon (single payment at maturity)
    Zero,
}

impl Frequency {
    /// Returns the number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Zero => 0,
        }
    }

    /// Returns the number of periods per year as a float.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        f64::from(self.periods_per_year())
    }

    /// Returns the number of months per period.
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        match self {
            Frequency::Annual => 12,
            Frequency::SemiAnnual => 6,
            Frequency::Quarterly => 3,
            Frequency::Monthly => 1,
            Frequency::Zero => 0,
        }
    }

    /// The period between payments, e.g. `6M` for semi-annual.
    ///
    /// Zero coupon has no period and returns `None`.
    #[must_use]
    pub fn tenor(&self) -> Option<Tenor> {
        match self {
            Frequency::Zero => None,
            _ => Some(Tenor::new(self.months_per_period(), TimeUnit::Months)),
        }
    }

    /// Returns true if this is a zero coupon (no periodic payments).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Frequency::Zero)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::Zero => "Zero Coupon",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "annual" | "a" | "1" => Ok(Frequency::Annual),
            "semiannual" | "s" | "2" => Ok(Frequency::SemiAnnual),
            "quarterly" | "q" | "4" => Ok(Frequency::Quarterly),
            "monthly" | "m" | "12" => Ok(Frequency::Monthly),
            "zero" | "zerocoupon" | "0" => Ok(Frequency::Zero),
            _ => Err(CoreError::parse(s, "frequency")),
        }
    }
}
