//! US government bond market calendar.

use chrono::Weekday;

use super::target::easter_sunday;
use super::Calendar;
use crate::types::Date;

/// US government bond calendar.
///
/// Federal holidays with weekend observation (Saturday to Friday, Sunday to
/// Monday) plus Good Friday. Columbus and Veterans Day are included; the bond
/// market closes on both.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsGovernmentBond;

impl UsGovernmentBond {
    fn is_holiday_date(date: Date) -> bool {
        let year = date.year();
        let weekday = date.weekday();

        let observed = |month: u32, day: u32| -> bool {
            match (date.month(), date.day(), weekday) {
                (m, d, _) if m == month && d == day => true,
                _ => {
                    let Ok(actual) = Date::from_ymd(year, month, day) else {
                        return false;
                    };
                    match actual.weekday() {
                        Weekday::Sat => date == actual.add_days(-1),
                        Weekday::Sun => date == actual.add_days(1),
                        _ => false,
                    }
                }
            }
        };

        // Saturday New Year is not moved back into December for the bond market
        if (date.month() == 1 && date.day() == 1)
            || (date.month() == 1 && date.day() == 2 && weekday == Weekday::Mon)
        {
            return true;
        }
        if observed(7, 4) || observed(11, 11) || observed(12, 25) {
            return true;
        }
        if year >= 2022 && observed(6, 19) {
            return true;
        }

        let nth = |month: u32, wd: Weekday, n: u32| -> bool {
            date.month() == month && weekday == wd && (date.day() - 1) / 7 + 1 == n
        };
        if nth(1, Weekday::Mon, 3)
            || nth(2, Weekday::Mon, 3)
            || nth(9, Weekday::Mon, 1)
            || nth(10, Weekday::Mon, 2)
            || nth(11, Weekday::Thu, 4)
        {
            return true;
        }

        // Memorial Day: last Monday in May
        if date.month() == 5 && weekday == Weekday::Mon && date.day() + 7 > 31 {
            return true;
        }

        easter_sunday(year).is_some_and(|easter| Date::from(easter).add_days(-2) == date)
    }
}

impl Calendar for UsGovernmentBond {
    fn name(&self) -> &'static str {
        "US Government Bond"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !Self::is_holiday_date(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_holidays() {
        let cal = UsGovernmentBond;
        assert!(!cal.is_business_day(date(2025, 1, 1)));
        assert!(!cal.is_business_day(date(2025, 7, 4)));
        assert!(!cal.is_business_day(date(2025, 12, 25)));
        assert!(cal.is_business_day(date(2025, 12, 26)));
    }

    #[test]
    fn test_observed_holidays() {
        let cal = UsGovernmentBond;
        // 2026-07-04 is a Saturday, observed Friday 3rd
        assert!(!cal.is_business_day(date(2026, 7, 3)));
        // 2021-12-25 is a Saturday, observed Friday 24th
        assert!(!cal.is_business_day(date(2021, 12, 24)));
        // 2023-01-01 is a Sunday, observed Monday 2nd
        assert!(!cal.is_business_day(date(2023, 1, 2)));
    }

    #[test]
    fn test_floating_holidays() {
        let cal = UsGovernmentBond;
        assert!(!cal.is_business_day(date(2025, 1, 20))); // MLK
        assert!(!cal.is_business_day(date(2025, 5, 26))); // Memorial Day
        assert!(!cal.is_business_day(date(2025, 9, 1))); // Labor Day
        assert!(!cal.is_business_day(date(2025, 11, 27))); // Thanksgiving
        assert!(!cal.is_business_day(date(2025, 4, 18))); // Good Friday
        assert!(cal.is_business_day(date(2025, 5, 19)));
    }
}
