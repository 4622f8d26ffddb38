//! 30/360 bond basis.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// 30/360 bond basis (US).
///
/// - If D1 is 31, change D1 to 30
/// - If D2 is 31 and D1 is now 30, change D2 to 30
///
/// Used for municipal, corporate and swap fixed-leg accrual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360;

impl DayCount for Thirty360 {
    fn name(&self) -> &'static str {
        "30/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = start.day().min(30);
        let d2 = if end.day() == 31 && d1 == 30 { 30 } else { end.day() };

        let years = i64::from(end.year() - start.year());
        let months = i64::from(end.month()) - i64::from(start.month());
        360 * years + 30 * months + i64::from(d2) - i64::from(d1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_half_year() {
        assert_eq!(Thirty360.year_fraction(date(2025, 1, 15), date(2025, 7, 15)), dec!(0.5));
    }

    #[test]
    fn test_month_end_rules() {
        assert_eq!(Thirty360.day_count(date(2025, 1, 31), date(2025, 3, 31)), 60);
        assert_eq!(Thirty360.day_count(date(2025, 1, 30), date(2025, 3, 31)), 60);
        assert_eq!(Thirty360.day_count(date(2025, 1, 29), date(2025, 3, 31)), 62);
        assert_eq!(Thirty360.day_count(date(2025, 2, 28), date(2025, 3, 31)), 33);
    }
}
