//! Actual/Actual day count conventions.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA.
///
/// Splits the interval at calendar-year boundaries; days in a leap year count
/// 1/366 and other days 1/365. Curve time is measured in this convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start > end {
            return -self.year_fraction(end, start);
        }

        let mut total = Decimal::ZERO;
        let mut current = start;
        while current.year() < end.year() {
            let Ok(next_year) = Date::from_ymd(current.year() + 1, 1, 1) else {
                break;
            };
            total += Decimal::from(current.days_between(&next_year))
                / Decimal::from(current.days_in_year());
            current = next_year;
        }

        total + Decimal::from(current.days_between(&end)) / Decimal::from(current.days_in_year())
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ICMA (bond basis).
///
/// Each coupon period counts `1/frequency` of a year. Reference periods are
/// rolled back from the end date, so a partial first period is weighted by
/// its actual length within the enclosing reference period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActActIcma {
    frequency: u32,
}

impl ActActIcma {
    /// Creates the convention for a coupon frequency (periods per year).
    ///
    /// Frequencies that do not divide twelve months fall back to annual.
    #[must_use]
    pub fn new(frequency: u32) -> Self {
        let frequency = match frequency {
            1 | 2 | 3 | 4 | 6 | 12 => frequency,
            _ => 1,
        };
        Self { frequency }
    }

    /// Semi-annual reference periods.
    #[must_use]
    pub fn semi_annual() -> Self {
        Self::new(2)
    }

    /// Year fraction for an accrual inside an explicit reference period.
    #[must_use]
    pub fn year_fraction_with_period(
        &self,
        start: Date,
        end: Date,
        period_start: Date,
        period_end: Date,
    ) -> Decimal {
        let days_in_period = period_start.days_between(&period_end);
        if days_in_period == 0 {
            return Decimal::ZERO;
        }

        Decimal::from(start.days_between(&end))
            / (Decimal::from(self.frequency) * Decimal::from(days_in_period))
    }
}

impl Default for ActActIcma {
    fn default() -> Self {
        Self::semi_annual()
    }
}

impl DayCount for ActActIcma {
    fn name(&self) -> &'static str {
        "ACT/ACT ICMA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start > end {
            return -self.year_fraction(end, start);
        }

        let months = (12 / self.frequency) as i32;
        let per_period = Decimal::ONE / Decimal::from(self.frequency);
        let mut total = Decimal::ZERO;
        let mut period_end = end;
        let mut k = 1;

        loop {
            let Ok(period_start) = end.add_months(-months * k) else {
                break;
            };
            if period_start <= start {
                total += self.year_fraction_with_period(start, period_end, period_start, period_end);
                break;
            }
            total += per_period;
            period_end = period_start;
            k += 1;
        }

        total
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
