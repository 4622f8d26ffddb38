//! Fixed coupon bond helper.

use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::{Date, Frequency, Tenor};

use super::{Quoted, RateHelper};
use crate::error::{CurveError, CurveResult};
use crate::quotes::SimpleQuote;
use crate::services::TERM_DAY_COUNT;
use crate::traits::Curve;

/// A bullet bond quoted at a clean price per 100 face.
#[derive(Debug, Clone)]
pub struct BondHelper {
    maturity: Date,
    coupon: f64,
    issue_date: Option<Date>,
    quote: SimpleQuote,
    frequency: Frequency,
    day_count: DayCountConvention,
    calendar: CalendarId,
}

impl BondHelper {
    /// Creates a semiannual 30/360 bond helper.
    #[must_use]
    pub fn new(maturity: Date, coupon: f64, clean_price: f64) -> Self {
        Self {
            maturity,
            coupon,
            issue_date: None,
            quote: SimpleQuote::new(clean_price),
            frequency: Frequency::SemiAnnual,
            day_count: TERM_DAY_COUNT,
            calendar: CalendarId::Target,
        }
    }

    /// Bond maturing `tenor` after `today`.
    ///
    /// Year tenors mature on the first of the resulting month.
    pub fn from_tenor(
        tenor: &Tenor,
        today: Date,
        coupon: f64,
        clean_price: f64,
        calendar: CalendarId,
    ) -> CurveResult<Self> {
        let mut maturity = tenor.advance(today, BusinessDayConvention::Following, &calendar, false)?;
        if tenor.is_years() {
            maturity = Date::from_ymd(maturity.year(), maturity.month(), 1)?;
        }
        Ok(Self::new(maturity, coupon, clean_price).with_calendar(calendar))
    }

    /// Sets the issue date; accrual never starts before it.
    #[must_use]
    pub fn with_issue_date(mut self, issue_date: Date) -> Self {
        self.issue_date = Some(issue_date);
        self
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// Maturity date.
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Annual coupon rate.
    pub fn coupon(&self) -> f64 {
        self.coupon
    }
}

impl Quoted for BondHelper {
    fn quote(&self) -> &SimpleQuote {
        &self.quote
    }
}

impl RateHelper for BondHelper {
    fn label(&self) -> String {
        self.maturity.to_string()
    }

    fn pillar_date(&self, _settlement: Date) -> CurveResult<Date> {
        Ok(self.maturity)
    }

    /// Clean price per 100 implied by `curve`.
    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let settle = curve.reference_date();
        if self.maturity <= settle {
            return Err(CurveError::invalid_instrument(format!(
                "bond maturing {} has matured at {settle}",
                self.maturity
            )));
        }
        let period = self.frequency.tenor().ok_or_else(|| {
            CurveError::invalid_instrument("bond helper needs a periodic frequency")
        })?;

        let dates = period.schedule(settle, self.maturity, BusinessDayConvention::Unadjusted, &self.calendar)?;
        let mut accrual_start = period.advance(dates[1], BusinessDayConvention::Unadjusted, &self.calendar, true)?;
        if let Some(issue) = self.issue_date {
            accrual_start = accrual_start.max(issue);
        }

        let per_period = self.coupon / self.frequency.as_f64();
        let mut pv = 0.0;
        for date in &dates[1..] {
            pv += per_period * curve.discount_factor_at(*date)?;
        }
        pv += curve.discount_factor_at(self.maturity)?;

        let accrued = self.coupon * self.day_count.year_fraction(accrual_start, settle);
        Ok(100.0 * (pv - accrued))
    }
}
