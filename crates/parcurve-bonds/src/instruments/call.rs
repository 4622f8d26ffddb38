//! Call features and generated call schedules.
//!
//! A bond's call provision is described by a single [`CallFeature`]: the first
//! call date and price, and optionally the date from which the bond is
//! callable at par. The full schedule is synthesized from it by stepping at
//! the call frequency and stepping the price down linearly to par.

use serde::{Deserialize, Serialize};

use parcurve_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::{Frequency, TimeUnit};
use parcurve_core::Date;

use crate::error::{BondError, BondResult};

/// One date on which the bond can be redeemed, and the price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallEntry {
    /// Call date.
    pub date: Date,
    /// Clean redemption price per 100.
    pub price: f64,
}

impl CallEntry {
    /// Creates a call entry.
    #[must_use]
    pub fn new(date: Date, price: f64) -> Self {
        Self { date, price }
    }
}

/// An issuer call provision.
///
/// # Example
///
/// ```rust
/// use parcurve_bonds::instruments::CallFeature;
/// use parcurve_core::calendars::CalendarId;
/// use parcurve_core::daycounts::DayCountConvention;
/// use parcurve_core::Date;
///
/// let call = CallFeature::new(Date::from_ymd(2030, 6, 1).unwrap(), 102.0)
///     .with_par_call(Date::from_ymd(2032, 6, 1).unwrap());
/// let list = call
///     .call_list(
///         Date::from_ymd(2035, 6, 1).unwrap(),
///         100.0,
///         DayCountConvention::Thirty360,
///         CalendarId::UsGovernmentBond,
///     )
///     .unwrap();
///
/// assert_eq!(list[0].price, 102.0);
/// assert_eq!(list[2].price, 101.0);
/// assert_eq!(list[4].price, 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallFeature {
    /// First date the bond can be called.
    pub first_call: Date,
    /// Price at the first call.
    pub call_price: f64,
    /// Date from which the bond is callable at face.
    ///
    /// Without one, calls after the first are at face.
    #[serde(default)]
    pub par_call: Option<Date>,
    /// Spacing of call dates.
    #[serde(default)]
    pub frequency: Frequency,
}

impl CallFeature {
    /// Creates a semiannual call feature with no par call date.
    #[must_use]
    pub fn new(first_call: Date, call_price: f64) -> Self {
        Self {
            first_call,
            call_price,
            par_call: None,
            frequency: Frequency::SemiAnnual,
        }
    }

    /// Sets the par call date.
    #[must_use]
    pub fn with_par_call(mut self, par_call: Date) -> Self {
        self.par_call = Some(par_call);
        self
    }

    /// Sets the call frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Expands the feature into an ascending schedule of calls before `maturity`.
    ///
    /// When the first call is at a premium and a later par call date is given,
    /// the price steps down by `(call_price - face) / (f * years)` each period
    /// until the par call date, then stays at face.
    pub fn call_list(
        &self,
        maturity: Date,
        face: f64,
        day_count: DayCountConvention,
        calendar: CalendarId,
    ) -> BondResult<Vec<CallEntry>> {
        let months = self.frequency.months_per_period();
        if months == 0 {
            return Err(BondError::invalid_spec("call frequency must be periodic"));
        }
        let months = i32::try_from(months)
            .map_err(|_| BondError::invalid_spec("call frequency out of range"))?;

        let par_call = self.par_call.unwrap_or(self.first_call);
        let mut step_down = 0.0;
        if par_call > self.first_call && self.call_price > face {
            let years = day_count.year_fraction(self.first_call, par_call);
            if years > 0.0 {
                step_down = (self.call_price - face) / (self.frequency.as_f64() * years);
            }
        }

        let mut list = Vec::new();
        let mut price = self.call_price;
        let mut date = self.first_call;
        while date < maturity {
            list.push(CallEntry::new(date, price));
            date = calendar.advance(date, months, TimeUnit::Months, BusinessDayConvention::Unadjusted)?;
            price = if date >= par_call {
                face
            } else {
                price - step_down
            };
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn list(call: &CallFeature, maturity: Date) -> Vec<CallEntry> {
        call.call_list(maturity, 100.0, DayCountConvention::Thirty360, CalendarId::UsGovernmentBond)
            .unwrap()
    }

    #[test]
    fn test_step_down_to_par() {
        let call = CallFeature::new(d(2028, 1, 1), 103.0).with_par_call(d(2031, 1, 1));
        let calls = list(&call, d(2033, 1, 1));

        assert_eq!(calls.len(), 10);
        assert_eq!(calls[0], CallEntry::new(d(2028, 1, 1), 103.0));
        assert_relative_eq!(calls[1].price, 102.5, epsilon = 1e-12);
        assert_relative_eq!(calls[5].price, 100.5, epsilon = 1e-12);
        assert_eq!(calls[6], CallEntry::new(d(2031, 1, 1), 100.0));
        assert!(calls.iter().all(|c| c.date < d(2033, 1, 1)));
        assert!(calls.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_no_par_call_reverts_to_face() {
        let call = CallFeature::new(d(2028, 1, 1), 101.0);
        let calls = list(&call, d(2029, 7, 1));
        let prices: Vec<f64> = calls.iter().map(|c| c.price).collect();
        assert_eq!(prices, vec![101.0, 100.0, 100.0]);
    }

    #[test]
    fn test_par_call_feature() {
        let call = CallFeature::new(d(2028, 1, 1), 100.0).with_par_call(d(2030, 1, 1));
        assert!(list(&call, d(2030, 1, 1)).iter().all(|c| c.price == 100.0));
    }

    #[test]
    fn test_call_after_maturity_is_empty() {
        let call = CallFeature::new(d(2031, 1, 1), 100.0);
        assert!(list(&call, d(2030, 1, 1)).is_empty());
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let call = CallFeature::new(d(2028, 1, 1), 100.0).with_frequency(Frequency::Zero);
        assert!(call
            .call_list(d(2030, 1, 1), 100.0, DayCountConvention::Thirty360, CalendarId::Target)
            .is_err());
    }
}
