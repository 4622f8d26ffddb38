//! Money market deposit helper.

use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::{Date, Tenor};

use super::{Quoted, RateHelper};
use crate::error::CurveResult;
use crate::quotes::SimpleQuote;
use crate::services::{CurveServices, DEPO_DAY_COUNT};
use crate::traits::Curve;

/// A deposit from settlement to `settlement + tenor`, quoted as a simple
/// ACT/360 rate.
#[derive(Debug, Clone)]
pub struct DepositHelper {
    tenor: Tenor,
    quote: SimpleQuote,
    calendar: CalendarId,
    convention: BusinessDayConvention,
    day_count: DayCountConvention,
}

impl DepositHelper {
    /// Creates a deposit helper on the TARGET calendar, modified following.
    #[must_use]
    pub fn new(tenor: Tenor, rate: f64) -> Self {
        Self {
            tenor,
            quote: SimpleQuote::new(rate),
            calendar: CalendarId::Target,
            convention: BusinessDayConvention::ModifiedFollowing,
            day_count: DEPO_DAY_COUNT,
        }
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }
}

impl Quoted for DepositHelper {
    fn quote(&self) -> &SimpleQuote {
        &self.quote
    }
}

impl RateHelper for DepositHelper {
    fn label(&self) -> String {
        self.tenor.to_string()
    }

    fn tenor(&self) -> Option<Tenor> {
        Some(self.tenor)
    }

    fn pillar_date(&self, settlement: Date) -> CurveResult<Date> {
        Ok(self
            .tenor
            .advance(settlement, self.convention, &self.calendar, false)?)
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let start = curve.reference_date();
        let end = self.pillar_date(start)?;
        curve.forward_depo(start, end, self.day_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::test_support::FlatCurve;
    use approx::assert_relative_eq;

    #[test]
    fn test_pillar_is_modified_following() {
        let helper = DepositHelper::new(Tenor::months(2), 0.05);
        // 2025-05-31 is a Saturday at month end: roll back to Friday
        let settle = Date::from_ymd(2025, 3, 31).unwrap();
        assert_eq!(
            helper.pillar_date(settle).unwrap(),
            Date::from_ymd(2025, 5, 30).unwrap()
        );
    }

    #[test]
    fn test_implied_quote_is_forward_depo() {
        let settle = Date::from_ymd(2025, 1, 15).unwrap();
        let curve = FlatCurve::new(settle, 0.05);
        let helper = DepositHelper::new(Tenor::months(6), 0.0);
        let end = helper.pillar_date(settle).unwrap();
        let df = curve.discount_factor_at(end).unwrap();
        let yf = DEPO_DAY_COUNT.year_fraction(settle, end);
        assert_relative_eq!(
            helper.implied_quote(&curve).unwrap(),
            (1.0 / df - 1.0) / yf,
            epsilon = 1e-14
        );
    }
}
