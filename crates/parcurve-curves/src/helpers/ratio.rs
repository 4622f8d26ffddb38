//! Par basis ratio helper.

use parcurve_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::{Date, Frequency, Tenor};

use super::Quoted;
use crate::error::CurveResult;
use crate::quotes::SimpleQuote;

/// A par ratio quote (index rate over LIBOR) for a tenor, paid quarterly.
#[derive(Debug, Clone)]
pub struct RatioHelper {
    tenor: Tenor,
    quote: SimpleQuote,
    calendar: CalendarId,
}

impl RatioHelper {
    /// Spacing of basis payments.
    pub const BASIS_TENOR: Tenor = Tenor::months(3);

    /// Basis payment frequency.
    pub const BASIS_FREQUENCY: Frequency = Frequency::Quarterly;

    /// Day count used to accrue the ratio slope.
    pub const MUNI_LEG_DAY_COUNT: DayCountConvention = DayCountConvention::ActActIsda;

    /// Day count of the LIBOR leg.
    pub const LIBOR_LEG_DAY_COUNT: DayCountConvention = DayCountConvention::Act360;

    /// Payment date adjustment.
    pub const CONVENTION: BusinessDayConvention = BusinessDayConvention::ModifiedFollowing;

    /// Creates a ratio helper on the TARGET calendar.
    #[must_use]
    pub fn new(tenor: Tenor, ratio: f64) -> Self {
        Self {
            tenor,
            quote: SimpleQuote::new(ratio),
            calendar: CalendarId::Target,
        }
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// The instrument tenor.
    pub fn tenor(&self) -> Tenor {
        self.tenor
    }

    /// Approximate term in years.
    pub fn term(&self) -> f64 {
        self.tenor.term()
    }

    /// Whole basis periods to maturity.
    pub fn nterm(&self) -> u32 {
        self.tenor.number_of_periods(Self::BASIS_FREQUENCY)
    }

    /// Adjusted maturity for a settlement date.
    pub fn maturity(&self, settlement: Date) -> CurveResult<Date> {
        let unadjusted = self.unadjusted_maturity(settlement)?;
        Ok(self.calendar.adjust(unadjusted, Self::CONVENTION)?)
    }

    /// Quarterly payment dates from settlement to maturity, settlement first.
    pub fn schedule(&self, settlement: Date) -> CurveResult<Vec<Date>> {
        let maturity = self.unadjusted_maturity(settlement)?;
        Ok(Self::BASIS_TENOR.schedule(settlement, maturity, Self::CONVENTION, &self.calendar)?)
    }

    fn unadjusted_maturity(&self, settlement: Date) -> CurveResult<Date> {
        Ok(self
            .tenor
            .advance(settlement, BusinessDayConvention::Unadjusted, &self.calendar, false)?)
    }
}

impl Quoted for RatioHelper {
    fn quote(&self) -> &SimpleQuote {
        &self.quote
    }
}
