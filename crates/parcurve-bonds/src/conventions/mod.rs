//! Market conventions for bond analytics.
//!
//! A [`BondConventions`] value carries everything a bond needs beyond its
//! coupon and dates: day count, coupon frequency, settlement lag, business
//! day rules, calendar and face. Markets are named presets rather than types.
//!
//! # Market Modules
//!
//! - [`us_municipal`]: tax-exempt municipal bonds and the generic US default
//! - [`us_treasury`]: Treasury notes, bonds and bills
//!
//! # Example
//!
//! ```rust
//! use parcurve_bonds::conventions::BondConventions;
//! use parcurve_core::daycounts::DayCountConvention;
//!
//! let conventions = BondConventions::us_treasury();
//! assert_eq!(conventions.settlement_days(), 2);
//! assert_eq!(conventions.day_count(), DayCountConvention::ActActIcma);
//! ```

pub mod us_municipal;
pub mod us_treasury;

use serde::{Deserialize, Serialize};

use parcurve_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::{Frequency, TimeUnit};
use parcurve_core::{CoreError, CoreResult, Date};

/// Complete bond market conventions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BondConventions {
    /// Number of business days for settlement (T+n).
    settlement_days: u32,

    /// Day count basis for accrued interest and period counting.
    day_count: DayCountConvention,

    /// Coupon payment frequency.
    frequency: Frequency,

    /// Adjustment applied to payment dates.
    payment_convention: BusinessDayConvention,

    /// Adjustment applied to the maturity (termination) date.
    termination_convention: BusinessDayConvention,

    /// Calendar for settlement and payment adjustment.
    calendar: CalendarId,

    /// Face value per unit quoted.
    face: f64,
}

impl BondConventions {
    /// Creates a new `BondConventionsBuilder`.
    #[must_use]
    pub fn builder() -> BondConventionsBuilder {
        BondConventionsBuilder::default()
    }

    /// Generic US bond: T+3, 30/360, semiannual, unadjusted.
    #[must_use]
    pub fn simple() -> Self {
        us_municipal::simple()
    }

    /// Municipal bond: as [`simple`](Self::simple) with Following payments.
    #[must_use]
    pub fn municipal() -> Self {
        us_municipal::municipal()
    }

    /// US Treasury note or bond.
    #[must_use]
    pub fn us_treasury() -> Self {
        us_treasury::note_bond()
    }

    /// US Treasury bill.
    #[must_use]
    pub fn us_treasury_bill() -> Self {
        us_treasury::bill()
    }

    /// Looks a preset up by name (`simple`, `municipal`, `treasury`, `bill`).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "simple" | "default" => Some(Self::simple()),
            "municipal" | "muni" => Some(Self::municipal()),
            "treasury" | "ust" | "us_treasury" => Some(Self::us_treasury()),
            "bill" | "tbill" | "us_treasury_bill" => Some(Self::us_treasury_bill()),
            _ => None,
        }
    }

    /// Returns the number of settlement days.
    #[must_use]
    pub const fn settlement_days(&self) -> u32 {
        self.settlement_days
    }

    /// Returns the day count convention.
    #[must_use]
    pub const fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the coupon frequency.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the payment date convention.
    #[must_use]
    pub const fn payment_convention(&self) -> BusinessDayConvention {
        self.payment_convention
    }

    /// Returns the maturity date convention.
    #[must_use]
    pub const fn termination_convention(&self) -> BusinessDayConvention {
        self.termination_convention
    }

    /// Returns the calendar ID.
    #[must_use]
    pub const fn calendar(&self) -> CalendarId {
        self.calendar
    }

    /// Returns the face value.
    #[must_use]
    pub const fn face(&self) -> f64 {
        self.face
    }

    /// Returns the number of coupon payments per year.
    #[must_use]
    pub fn payments_per_year(&self) -> u32 {
        self.frequency.periods_per_year()
    }

    /// Settlement date for a trade date: `settlement_days` business days later.
    pub fn settlement_date(&self, trade_date: Date) -> CoreResult<Date> {
        let days = i32::try_from(self.settlement_days)
            .map_err(|_| CoreError::calendar("settlement lag out of range"))?;
        self.calendar
            .advance(trade_date, days, TimeUnit::Days, BusinessDayConvention::Following)
    }
}

impl Default for BondConventions {
    fn default() -> Self {
        Self {
            settlement_days: 3,
            day_count: DayCountConvention::Thirty360,
            frequency: Frequency::SemiAnnual,
            payment_convention: BusinessDayConvention::Unadjusted,
            termination_convention: BusinessDayConvention::Unadjusted,
            calendar: CalendarId::UsGovernmentBond,
            face: 100.0,
        }
    }
}

/// Builder for `BondConventions`.
#[derive(Debug, Clone, Default)]
pub struct BondConventionsBuilder {
    settlement_days: Option<u32>,
    day_count: Option<DayCountConvention>,
    frequency: Option<Frequency>,
    payment_convention: Option<BusinessDayConvention>,
    termination_convention: Option<BusinessDayConvention>,
    calendar: Option<CalendarId>,
    face: Option<f64>,
}

impl BondConventionsBuilder {
    /// Sets the settlement days.
    #[must_use]
    pub fn settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = Some(days);
        self
    }

    /// Sets the day count convention.
    #[must_use]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Sets the coupon frequency.
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the payment date convention.
    #[must_use]
    pub fn payment_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.payment_convention = Some(convention);
        self
    }

    /// Sets the maturity date convention.
    #[must_use]
    pub fn termination_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.termination_convention = Some(convention);
        self
    }

    /// Sets the calendar.
    #[must_use]
    pub fn calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn face(mut self, face: f64) -> Self {
        self.face = Some(face);
        self
    }

    /// Builds the `BondConventions`.
    #[must_use]
    pub fn build(self) -> BondConventions {
        let default = BondConventions::default();

        BondConventions {
            settlement_days: self.settlement_days.unwrap_or(default.settlement_days),
            day_count: self.day_count.unwrap_or(default.day_count),
            frequency: self.frequency.unwrap_or(default.frequency),
            payment_convention: self.payment_convention.unwrap_or(default.payment_convention),
            termination_convention: self
                .termination_convention
                .unwrap_or(default.termination_convention),
            calendar: self.calendar.unwrap_or(default.calendar),
            face: self.face.unwrap_or(default.face),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_conventions_default() {
        let conv = BondConventions::default();
        assert_eq!(conv, BondConventions::simple());
        assert_eq!(conv.day_count(), DayCountConvention::Thirty360);
        assert_eq!(conv.frequency(), Frequency::SemiAnnual);
        assert_eq!(conv.settlement_days(), 3);
        assert_eq!(conv.face(), 100.0);
    }

    #[test]
    fn test_bond_conventions_builder() {
        let conv = BondConventions::builder()
            .day_count(DayCountConvention::ActActIcma)
            .frequency(Frequency::Annual)
            .settlement_days(1)
            .build();

        assert_eq!(conv.day_count(), DayCountConvention::ActActIcma);
        assert_eq!(conv.frequency(), Frequency::Annual);
        assert_eq!(conv.settlement_days(), 1);
        assert_eq!(conv.payment_convention(), BusinessDayConvention::Unadjusted);
    }

    #[test]
    fn test_presets_by_name() {
        assert_eq!(BondConventions::preset("Muni"), Some(BondConventions::municipal()));
        assert_eq!(BondConventions::preset("bill"), Some(BondConventions::us_treasury_bill()));
        assert_eq!(BondConventions::preset("gilt"), None);
    }

    #[test]
    fn test_payments_per_year() {
        assert_eq!(BondConventions::simple().payments_per_year(), 2);
        assert_eq!(BondConventions::us_treasury_bill().payments_per_year(), 0);
    }

    #[test]
    fn test_settlement_date() {
        // Friday trade settles the following Wednesday at T+3
        let trade = Date::from_ymd(2025, 1, 10).unwrap();
        let settle = BondConventions::municipal().settlement_date(trade).unwrap();
        assert_eq!(settle, Date::from_ymd(2025, 1, 15).unwrap());
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let conv: BondConventions = serde_json::from_str(r#"{"settlement_days": 1}"#).unwrap();
        assert_eq!(conv.settlement_days(), 1);
        assert_eq!(conv.day_count(), DayCountConvention::Thirty360);
    }
}
