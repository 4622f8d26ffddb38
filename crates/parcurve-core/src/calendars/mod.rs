//! Business day calendars and conventions.
//!
//! - [`Calendar`]: holiday rules plus date rolling and period arithmetic
//! - [`BusinessDayConvention`]: how non-business days are adjusted
//! - [`CalendarId`]: serializable selector over the built-in calendars

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod conventions;
mod target;
mod us_calendar;

pub use conventions::BusinessDayConvention;
pub use target::Target;
pub use us_calendar::UsGovernmentBond;

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, TimeUnit};

/// Trait for business day calendars.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday or weekend.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> CoreResult<Date> {
        Ok(conventions::adjust(date, convention, self))
    }

    /// Moves a date by a number of business days.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Advances a date by `n` units and adjusts the result.
    ///
    /// Days count business days on this calendar; weeks, months and years
    /// move calendar time and then apply `convention`.
    fn advance(
        &self,
        date: Date,
        n: i32,
        unit: TimeUnit,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        match unit {
            TimeUnit::Days if n == 0 => self.adjust(date, convention),
            TimeUnit::Days => Ok(self.add_business_days(date, n)),
            TimeUnit::Weeks => self.adjust(date.add_days(7 * i64::from(n)), convention),
            TimeUnit::Months => self.adjust(date.add_months(n)?, convention),
            TimeUnit::Years => {
                let months = n
                    .checked_mul(12)
                    .ok_or_else(|| CoreError::calendar(format!("{n} years out of range")))?;
                self.adjust(date.add_months(months)?, convention)
            }
        }
    }
}

/// A weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Selects one of the built-in calendars.
///
/// Conventions and curve settings store this instead of a trait object so
/// they stay `Copy` and serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CalendarId {
    /// Weekends only.
    Weekend,
    /// TARGET (euro settlement) holidays; the default for curve building.
    #[default]
    Target,
    /// US government bond market holidays.
    UsGovernmentBond,
}

impl CalendarId {
    fn calendar(&self) -> &'static dyn Calendar {
        match self {
            CalendarId::Weekend => &WeekendCalendar,
            CalendarId::Target => &Target,
            CalendarId::UsGovernmentBond => &UsGovernmentBond,
        }
    }
}

impl Calendar for CalendarId {
    fn name(&self) -> &'static str {
        self.calendar().name()
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.calendar().is_business_day(date)
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CalendarId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "weekend" | "weekendonly" => Ok(CalendarId::Weekend),
            "target" | "target2" => Ok(CalendarId::Target),
            "us" | "usgov" | "usgovernmentbond" | "sifma" => Ok(CalendarId::UsGovernmentBond),
            _ => Err(CoreError::parse(s, "calendar")),
        }
    }
}
