//! Par swap helper.

use parcurve_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use parcurve_core::types::TimeUnit;
use parcurve_core::{Date, Tenor};

use super::{Quoted, RateHelper};
use crate::error::{CurveError, CurveResult};
use crate::quotes::SimpleQuote;
use crate::services::par_swap_rate;
use crate::traits::Curve;

/// A spot-starting swap quoted at its par fixed rate.
///
/// Fixed leg semiannual 30/360 unadjusted; floating leg quarterly ACT/360
/// modified following on the 3M index.
#[derive(Debug, Clone)]
pub struct SwapHelper {
    tenor: Tenor,
    quote: SimpleQuote,
    calendar: CalendarId,
}

impl SwapHelper {
    /// Creates a swap helper on the TARGET calendar.
    #[must_use]
    pub fn new(tenor: Tenor, rate: f64) -> Self {
        Self {
            tenor,
            quote: SimpleQuote::new(rate),
            calendar: CalendarId::Target,
        }
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    fn years(&self) -> CurveResult<u32> {
        if self.tenor.is_years() && self.tenor.length() > 0 {
            Ok(self.tenor.length())
        } else {
            Err(CurveError::invalid_instrument(format!(
                "swap tenor must be whole years, got {}",
                self.tenor
            )))
        }
    }
}

impl Quoted for SwapHelper {
    fn quote(&self) -> &SimpleQuote {
        &self.quote
    }
}

impl RateHelper for SwapHelper {
    fn label(&self) -> String {
        self.tenor.to_string()
    }

    fn tenor(&self) -> Option<Tenor> {
        Some(self.tenor)
    }

    /// Last floating payment date.
    fn pillar_date(&self, settlement: Date) -> CurveResult<Date> {
        let months = self.years()? as i32 * 12;
        Ok(self.calendar.advance(
            settlement,
            months,
            TimeUnit::Months,
            BusinessDayConvention::ModifiedFollowing,
        )?)
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        par_swap_rate(curve, curve.reference_date(), self.years()?, &self.calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::test_support::FlatCurve;

    #[test]
    fn test_pillar_date() {
        let helper = SwapHelper::new(Tenor::years(2), 0.04);
        let settle = Date::from_ymd(2025, 1, 15).unwrap();
        assert_eq!(
            helper.pillar_date(settle).unwrap(),
            Date::from_ymd(2027, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_month_tenor_rejected() {
        let helper = SwapHelper::new(Tenor::months(18), 0.04);
        let curve = FlatCurve::new(Date::from_ymd(2025, 1, 15).unwrap(), 0.04);
        assert!(helper.implied_quote(&curve).is_err());
    }

    #[test]
    fn test_implied_quote_near_flat_rate() {
        let curve = FlatCurve::new(Date::from_ymd(2025, 1, 15).unwrap(), 0.04);
        let rate = SwapHelper::new(Tenor::years(5), 0.0)
            .implied_quote(&curve)
            .unwrap();
        assert!((rate - 0.0404).abs() < 5e-4);
    }
}
