//! Period expressions such as `3M` or `10Y`.
//!
//! A [`Tenor`] is both a maturity offset and a curve axis label. Parsing is
//! permissive: the first run of digits is the length and the first letter is
//! the unit, everything else is ignored, so `"3M"`, `"M3"` and `" 3 m "` are
//! the same tenor.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{Date, Frequency};
use crate::calendars::{BusinessDayConvention, Calendar};
use crate::error::CoreResult;

/// Unit of a [`Tenor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days; advanced as business days on a calendar.
    Days,
    /// Weeks of seven calendar days.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

impl TimeUnit {
    /// Single-letter code used in tenor text.
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }

    /// Units per year. Approximate for days and weeks; only used for ordering.
    #[must_use]
    pub fn per_year(&self) -> f64 {
        match self {
            TimeUnit::Days => 365.0,
            TimeUnit::Weeks => 52.0,
            TimeUnit::Months => 12.0,
            TimeUnit::Years => 1.0,
        }
    }

    /// Maps a unit letter (case-insensitive) to a unit.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'D' => Some(TimeUnit::Days),
            'W' => Some(TimeUnit::Weeks),
            'M' => Some(TimeUnit::Months),
            'Y' => Some(TimeUnit::Years),
            _ => None,
        }
    }
}

/// A length of time: `length` units of `unit`.
///
/// # Example
///
/// ```rust
/// use parcurve_core::types::{Frequency, Tenor};
///
/// let tenor = Tenor::parse("18M");
/// assert_eq!(tenor.term(), 1.5);
/// assert_eq!(tenor.number_of_periods(Frequency::Quarterly), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Tenor {
    length: u32,
    unit: TimeUnit,
}

impl Tenor {
    /// Creates a tenor from a length and unit.
    #[must_use]
    pub const fn new(length: u32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// Creates a tenor of `n` years.
    #[must_use]
    pub const fn years(n: u32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Creates a tenor of `n` months.
    #[must_use]
    pub const fn months(n: u32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// Parses tenor text. Never fails.
    ///
    /// The first digit run is the length (0 when there are no digits). The
    /// first letter is the unit; a letter other than D, W, M or Y, or no letter
    /// at all, means years.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut digits = String::new();
        let mut digits_done = false;
        let mut unit_letter = None;

        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            if ch.is_ascii_digit() {
                if !digits_done {
                    digits.push(ch);
                }
            } else {
                if !digits.is_empty() {
                    digits_done = true;
                }
                if unit_letter.is_none() && ch.is_alphabetic() {
                    unit_letter = Some(ch);
                }
            }
        }

        // Lengths beyond u32 are not meaningful tenors; saturate rather than fail.
        let length = if digits.is_empty() {
            0
        } else {
            digits.parse::<u32>().unwrap_or(u32::MAX)
        };
        let unit = unit_letter
            .and_then(TimeUnit::from_code)
            .unwrap_or(TimeUnit::Years);

        Self { length, unit }
    }

    /// Number of units.
    #[must_use]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// The unit.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Returns true for year tenors, which the curve builders treat as swaps.
    #[must_use]
    pub fn is_years(&self) -> bool {
        self.unit == TimeUnit::Years
    }

    /// Approximate length in years (365 days, 52 weeks or 12 months per year).
    #[must_use]
    pub fn term(&self) -> f64 {
        f64::from(self.length) / self.unit.per_year()
    }

    /// Whole periods of `frequency` contained in the tenor.
    #[must_use]
    pub fn number_of_periods(&self, frequency: Frequency) -> u32 {
        (self.term() * frequency.as_f64()).floor() as u32
    }

    /// Advances `date` by the tenor (or backward when `reverse`).
    pub fn advance(
        &self,
        date: Date,
        convention: BusinessDayConvention,
        calendar: &dyn Calendar,
        reverse: bool,
    ) -> CoreResult<Date> {
        self.advance_by(date, if reverse { -1 } else { 1 }, convention, calendar)
    }

    /// Advances `date` by `multiple` times the tenor.
    pub fn advance_by(
        &self,
        date: Date,
        multiple: i32,
        convention: BusinessDayConvention,
        calendar: &dyn Calendar,
    ) -> CoreResult<Date> {
        let n = i32::try_from(self.length)
            .ok()
            .and_then(|len| len.checked_mul(multiple))
            .ok_or_else(|| {
                crate::error::CoreError::invalid_tenor(self.to_string(), "length out of range")
            })?;
        calendar.advance(date, n, self.unit, convention)
    }

    /// Dates from `settle` to `maturity` at this tenor's spacing, short stub first.
    ///
    /// Steps back from maturity by whole multiples of the tenor until reaching
    /// settlement, adjusts each date, then returns them ascending with
    /// settlement as the first element.
    pub fn schedule(
        &self,
        settle: Date,
        maturity: Date,
        convention: BusinessDayConvention,
        calendar: &dyn Calendar,
    ) -> CoreResult<Vec<Date>> {
        if self.length == 0 {
            return Err(crate::error::CoreError::invalid_tenor(
                self.to_string(),
                "zero-length tenor cannot generate a schedule",
            ));
        }

        let mut dates = Vec::new();
        let mut k = 0;
        let mut unadjusted = maturity;
        while unadjusted > settle {
            let adjusted = calendar.adjust(unadjusted, convention)?;
            if adjusted > settle && dates.last().map_or(true, |last| adjusted < *last) {
                dates.push(adjusted);
            }
            k += 1;
            unadjusted = self.advance_by(maturity, -k, BusinessDayConvention::Unadjusted, calendar)?;
        }
        dates.push(settle);
        dates.reverse();
        Ok(dates)
    }

    /// Schedule to a maturity expressed as a tenor from settlement.
    pub fn schedule_to_tenor(
        &self,
        settle: Date,
        maturity: &Tenor,
        convention: BusinessDayConvention,
        calendar: &dyn Calendar,
    ) -> CoreResult<Vec<Date>> {
        let end = maturity.advance(settle, convention, calendar, false)?;
        self.schedule(settle, end, convention, calendar)
    }

    /// Orders tenors by approximate term.
    #[must_use]
    pub fn cmp_term(&self, other: &Tenor) -> Ordering {
        self.term().total_cmp(&other.term())
    }
}

impl Default for Tenor {
    fn default() -> Self {
        Self::years(0)
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.code())
    }
}

impl FromStr for Tenor {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Tenor {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Tenor {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Tenor> for String {
    fn from(tenor: Tenor) -> Self {
        tenor.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::{Target, WeekendCalendar};
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_term() {
        assert_relative_eq!(Tenor::parse("10Y").term(), 10.0);
        assert_relative_eq!(Tenor::parse("6M").term(), 0.5);
        assert_relative_eq!(Tenor::parse("1W").term(), 1.0 / 52.0);
        assert_relative_eq!(Tenor::parse("365D").term(), 1.0);
    }

    #[test]
    fn test_permissive_parsing() {
        assert_eq!(Tenor::parse("3M"), Tenor::months(3));
        assert_eq!(Tenor::parse("M3"), Tenor::months(3));
        assert_eq!(Tenor::parse(" 3 m "), Tenor::months(3));
        assert_eq!(Tenor::parse("").length(), 0);
        assert_eq!(Tenor::parse("M").length(), 0);
    }

    #[test]
    fn test_unknown_unit_is_years() {
        assert_eq!(Tenor::parse("5X"), Tenor::years(5));
        assert_eq!(Tenor::parse("7"), Tenor::years(7));
    }

    #[test]
    fn test_first_digit_run_only() {
        assert_eq!(Tenor::parse("3M6").length(), 3);
    }

    #[test]
    fn test_number_of_periods() {
        assert_eq!(Tenor::parse("10Y").number_of_periods(Frequency::SemiAnnual), 20);
        assert_eq!(Tenor::parse("18M").number_of_periods(Frequency::Annual), 1);
        assert_eq!(Tenor::parse("1M").number_of_periods(Frequency::Quarterly), 0);
    }

    #[test]
    fn test_display_and_serde() {
        let tenor = Tenor::parse("10y");
        assert_eq!(tenor.to_string(), "10Y");
        let json = serde_json::to_string(&tenor).unwrap();
        assert_eq!(json, "\"10Y\"");
        let back: Tenor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tenor);
    }

    #[test]
    fn test_advance_reverse() {
        let cal = WeekendCalendar;
        let start = date(2025, 3, 31);
        let fwd = Tenor::months(3)
            .advance(start, BusinessDayConvention::Unadjusted, &cal, false)
            .unwrap();
        assert_eq!(fwd, date(2025, 6, 30));
        let back = Tenor::months(1)
            .advance(start, BusinessDayConvention::Unadjusted, &cal, true)
            .unwrap();
        assert_eq!(back, date(2025, 2, 28));
    }

    #[test]
    fn test_schedule_front_stub() {
        let cal = WeekendCalendar;
        let settle = date(2025, 1, 15);
        let maturity = date(2026, 1, 1);
        let sched = Tenor::months(3)
            .schedule(settle, maturity, BusinessDayConvention::Unadjusted, &cal)
            .unwrap();
        assert_eq!(
            sched,
            vec![
                settle,
                date(2025, 4, 1),
                date(2025, 7, 1),
                date(2025, 10, 1),
                date(2026, 1, 1),
            ]
        );
    }

    #[test]
    fn test_schedule_to_tenor() {
        let cal = Target;
        let settle = date(2025, 6, 16);
        let sched = Tenor::months(6)
            .schedule_to_tenor(
                settle,
                &Tenor::years(2),
                BusinessDayConvention::ModifiedFollowing,
                &cal,
            )
            .unwrap();
        assert_eq!(sched.len(), 5);
        assert_eq!(sched[0], settle);
        assert_eq!(*sched.last().unwrap(), date(2027, 6, 16));
    }

    #[test]
    fn test_zero_tenor_schedule_rejected() {
        let cal = WeekendCalendar;
        let result = Tenor::parse("").schedule(
            date(2025, 1, 1),
            date(2026, 1, 1),
            BusinessDayConvention::Unadjusted,
            &cal,
        );
        assert!(result.is_err());
    }
}
