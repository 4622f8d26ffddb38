//! TARGET calendar for euro settlement.
//!
//! The reference calendar for LIBOR-style curve construction: weekends plus
//! New Year's Day, Good Friday, Easter Monday, Labour Day, and Christmas and
//! Boxing Day. Holidays falling on a weekend are not moved.

use chrono::NaiveDate;

use super::Calendar;
use crate::types::Date;

/// TARGET holiday calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

impl Target {
    fn is_holiday_date(date: Date) -> bool {
        match (date.month(), date.day()) {
            (1, 1) | (5, 1) | (12, 25) | (12, 26) => return true,
            _ => {}
        }

        easter_sunday(date.year()).is_some_and(|easter| {
            let offset = Date::from(easter).days_between(&date);
            offset == -2 || offset == 1
        })
    }
}

impl Calendar for Target {
    fn name(&self) -> &'static str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !Self::is_holiday_date(date)
    }
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
pub(crate) fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = ((h + l - 7 * m + 114) % 31) + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
