//! Municipal/LIBOR ratio curve.
//!
//! A [`RatioCurve`] stores the index-leg discount factors bootstrapped from
//! par ratio quotes against a reference [`TermStructureModel`]. Ratios are
//! read back by comparing its forward payments with the reference's.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use parcurve_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::TimeUnit;
use parcurve_core::{Date, Tenor};
use parcurve_math::MathError;

use crate::bootstrap::bootstrap_ratio;
use crate::curves::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::helpers::{HelperSet, RatioHelper};
use crate::services::CurveServices;
use crate::term_structure::{clean_quotes, TermStructureModel};
use crate::traits::{year_fraction_between, Curve};

const PAYMENT_DAY_COUNT: DayCountConvention = DayCountConvention::Act360;

fn ratio_of(numerator: f64, denominator: f64) -> CurveResult<f64> {
    if denominator.abs() <= f64::EPSILON {
        return Err(MathError::DivisionByZero { value: denominator }.into());
    }
    Ok(numerator / denominator)
}

/// Ratio (basis) curve bootstrapped against a reference model.
///
/// The curve remembers which calibration of the reference it was built on;
/// [`is_stale`](RatioCurve::is_stale) reports when the reference has been
/// rebuilt since.
#[derive(Debug)]
pub struct RatioCurve {
    label: String,
    data_divisor: f64,
    calendar: CalendarId,
    helpers: HelperSet<RatioHelper>,
    quotes: BTreeMap<String, f64>,
    curve: Option<Arc<DiscountCurve>>,
    reference: Option<(String, u64)>,
    settlement: Option<Date>,
}

impl RatioCurve {
    /// Creates an empty ratio curve. Ratios are quoted as decimals by default.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data_divisor: 1.0,
            calendar: CalendarId::Target,
            helpers: HelperSet::new(),
            quotes: BTreeMap::new(),
            curve: None,
            reference: None,
            settlement: None,
        }
    }

    /// Sets the divisor applied to incoming ratio quotes.
    #[must_use]
    pub fn with_data_divisor(mut self, divisor: f64) -> Self {
        self.data_divisor = divisor;
        self
    }

    /// Sets the calendar for payment dates.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// Bootstraps from `quotes` (`tenor -> ratio`) against `reference`.
    ///
    /// On failure the previous curve and quotes are kept.
    pub fn update(
        &mut self,
        reference: &TermStructureModel,
        quotes: &BTreeMap<String, f64>,
    ) -> CurveResult<()> {
        let settlement = reference
            .settlement()
            .filter(|_| reference.is_calibrated())
            .ok_or_else(|| CurveError::not_calibrated(reference.label()))?;
        let cleaned = clean_quotes(quotes, self.data_divisor);
        if cleaned.is_empty() {
            return Err(CurveError::InsufficientPoints {
                required: 1,
                got: 0,
            });
        }

        let snapshot = self.helpers.snapshot();
        let calendar = self.calendar;
        let built = self
            .helpers
            .update(&cleaned, |label, ratio| {
                Ok(RatioHelper::new(Tenor::parse(label), ratio).with_calendar(calendar))
            })
            .and_then(|()| {
                let active: Vec<&RatioHelper> = self.helpers.active().collect();
                let pvalues = bootstrap_ratio(reference, settlement, &active)?;
                DiscountCurve::new(settlement, &pvalues)
            });
        let curve = match built {
            Ok(curve) => curve,
            Err(err) => {
                self.helpers.restore(snapshot);
                return Err(err);
            }
        };
        debug!(
            "{}: bootstrapped {} ratio pillars against {} v{}",
            self.label,
            curve.len(),
            reference.label(),
            reference.version()
        );

        self.curve = Some(Arc::new(curve));
        self.reference = Some((reference.label().to_string(), reference.version()));
        self.settlement = Some(settlement);
        self.quotes = cleaned;
        Ok(())
    }

    /// Bootstraps again from the last quotes, e.g. after the reference moved.
    pub fn refresh(&mut self, reference: &TermStructureModel) -> CurveResult<()> {
        let quotes: BTreeMap<String, f64> = self
            .quotes
            .iter()
            .map(|(label, ratio)| (label.clone(), ratio * self.data_divisor))
            .collect();
        self.update(reference, &quotes)
    }

    /// True when `reference` has been rebuilt since this curve was bootstrapped
    /// against it, or when it was bootstrapped against a different model.
    pub fn is_stale(&self, reference: &TermStructureModel) -> bool {
        match &self.reference {
            Some((label, version)) => label != reference.label() || *version != reference.version(),
            None => true,
        }
    }

    /// Index forward payment over LIBOR forward payment between two dates.
    pub fn forward_ratio<C: Curve + ?Sized>(
        &self,
        reference: &C,
        begin: Date,
        end: Date,
    ) -> CurveResult<f64> {
        let muni = self.forward_payment(begin, end, PAYMENT_DAY_COUNT, 0.0)?;
        let libor = reference.forward_payment(begin, end, PAYMENT_DAY_COUNT, 0.0)?;
        ratio_of(muni, libor)
    }

    /// Par ratio for a tenor.
    ///
    /// Money-market tenors compare deposit rates. Year tenors weight the
    /// quarterly forward ratios by LIBOR payment and discount factor.
    pub fn par_ratio<C: Curve + ?Sized>(&self, reference: &C, tenor: &Tenor) -> CurveResult<f64> {
        let settlement = self.settlement()?;
        let convention = BusinessDayConvention::ModifiedFollowing;

        if !tenor.is_years() {
            let end = tenor.advance(settlement, convention, &self.calendar, false)?;
            let muni = self.forward_depo(settlement, end, PAYMENT_DAY_COUNT)?;
            let libor = reference.forward_depo(settlement, end, PAYMENT_DAY_COUNT)?;
            return ratio_of(muni, libor);
        }

        let months = i32::try_from(tenor.length() * 12)
            .map_err(|_| CurveError::invalid_instrument(format!("tenor {tenor} out of range")))?;
        let dates = (0..=months)
            .step_by(3)
            .map(|m| self.calendar.advance(settlement, m, TimeUnit::Months, convention))
            .collect::<Result<Vec<_>, _>>()?;

        let mut libor_leg = 0.0;
        let mut muni_leg = 0.0;
        for pair in dates.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let df = reference.discount(end, true)?;
            libor_leg += df * reference.forward_payment(start, end, PAYMENT_DAY_COUNT, 0.0)?;
            muni_leg += df * self.forward_payment(start, end, PAYMENT_DAY_COUNT, 0.0)?;
        }
        ratio_of(muni_leg, libor_leg)
    }

    /// Par ratio at a maturity date, linear in ACT/ACT time between the
    /// whole-year tenors either side (1W stands in for 0Y).
    pub fn maturity_ratio<C: Curve + ?Sized>(&self, reference: &C, maturity: Date) -> CurveResult<f64> {
        let years = year_fraction_between(self.settlement()?, maturity).max(0.0);
        let y0 = years.floor() as u32;
        let weight = years - f64::from(y0);

        let r0 = if y0 > 0 {
            self.par_ratio(reference, &Tenor::years(y0))?
        } else {
            self.par_ratio(reference, &Tenor::parse("1W"))?
        };
        let r1 = self.par_ratio(reference, &Tenor::years(y0 + 1))?;
        Ok(r0 * (1.0 - weight) + r1 * weight)
    }

    /// The bootstrapped index-leg curve.
    pub fn curve(&self) -> CurveResult<&Arc<DiscountCurve>> {
        self.curve
            .as_ref()
            .ok_or_else(|| CurveError::not_calibrated(&self.label))
    }

    /// Settlement of the last bootstrap.
    pub fn settlement(&self) -> CurveResult<Date> {
        self.settlement
            .ok_or_else(|| CurveError::not_calibrated(&self.label))
    }

    /// True once bootstrapped.
    pub fn is_calibrated(&self) -> bool {
        self.curve.is_some()
    }

    /// Label of the curve.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cleaned ratio quotes of the last update.
    pub fn quotes(&self) -> &BTreeMap<String, f64> {
        &self.quotes
    }

    /// Label and version of the reference used by the last bootstrap.
    pub fn reference(&self) -> Option<(&str, u64)> {
        self.reference
            .as_ref()
            .map(|(label, version)| (label.as_str(), *version))
    }
}

impl Curve for RatioCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        self.curve()?.discount_factor(t)
    }

    fn reference_date(&self) -> Date {
        self.settlement.unwrap_or_else(Date::today)
    }

    fn max_date(&self) -> Date {
        self.curve
            .as_ref()
            .map_or_else(|| self.reference_date(), |c| c.max_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn libor() -> TermStructureModel {
        let quotes = BTreeMap::from([
            ("3M".to_string(), 4.50),
            ("6M".to_string(), 4.45),
            ("1Y".to_string(), 4.35),
            ("2Y".to_string(), 4.20),
            ("5Y".to_string(), 4.05),
            ("10Y".to_string(), 4.10),
        ]);
        let mut model = TermStructureModel::new("LIBOR");
        model
            .update(&quotes, Some(Date::from_ymd(2025, 1, 13).unwrap()))
            .unwrap();
        model
    }

    fn flat_quotes(ratio: f64) -> BTreeMap<String, f64> {
        ["1W", "3M", "1Y", "2Y", "5Y", "10Y"]
            .iter()
            .map(|t| ((*t).to_string(), ratio))
            .collect()
    }

    #[test]
    fn test_uncalibrated() {
        let curve = RatioCurve::new("MUNI");
        assert!(!curve.is_calibrated());
        assert!(curve.is_stale(&libor()));
        assert!(curve.discount_factor(1.0).is_err());

        let mut curve = RatioCurve::new("MUNI");
        let empty = TermStructureModel::new("LIBOR");
        assert!(matches!(
            curve.update(&empty, &flat_quotes(0.7)),
            Err(CurveError::NotCalibrated { .. })
        ));
    }

    #[test]
    fn test_flat_ratio_round_trip() {
        let reference = libor();
        let mut curve = RatioCurve::new("MUNI");
        curve.update(&reference, &flat_quotes(0.7)).unwrap();

        for tenor in ["1Y", "2Y", "5Y", "7Y", "10Y"] {
            let ratio = curve.par_ratio(&reference, &Tenor::parse(tenor)).unwrap();
            assert_relative_eq!(ratio, 0.7, epsilon = 1e-9);
        }
        let settle = curve.settlement().unwrap();
        let begin = settle.add_months(12).unwrap();
        let end = settle.add_months(15).unwrap();
        let fwd = curve.forward_ratio(&reference, begin, end).unwrap();
        assert_relative_eq!(fwd, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_failed_update_keeps_previous_curve() {
        let reference = libor();
        let mut curve = RatioCurve::new("MUNI");
        curve.update(&reference, &flat_quotes(0.7)).unwrap();
        let quotes_before = curve.quotes().clone();
        let ratio_before = curve.par_ratio(&reference, &Tenor::parse("5Y")).unwrap();

        let clashing = BTreeMap::from([("1Y".to_string(), 0.75), ("12M".to_string(), 0.75)]);
        assert!(matches!(
            curve.update(&reference, &clashing),
            Err(CurveError::Construction { .. })
        ));

        assert_eq!(curve.quotes(), &quotes_before);
        assert!(!curve.is_stale(&reference));
        assert_relative_eq!(
            curve.par_ratio(&reference, &Tenor::parse("5Y")).unwrap(),
            ratio_before,
            epsilon = 1e-12
        );
        curve.refresh(&reference).unwrap();
        assert_relative_eq!(
            curve.par_ratio(&reference, &Tenor::parse("1Y")).unwrap(),
            0.7,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_sloped_quotes_reprice() {
        let reference = libor();
        let quotes = BTreeMap::from([
            ("3M".to_string(), 0.62),
            ("1Y".to_string(), 0.66),
            ("2Y".to_string(), 0.70),
            ("5Y".to_string(), 0.78),
            ("10Y".to_string(), 0.85),
        ]);
        let mut curve = RatioCurve::new("MUNI");
        curve.update(&reference, &quotes).unwrap();

        for (tenor, quote) in [("2Y", 0.70), ("5Y", 0.78), ("10Y", 0.85)] {
            let ratio = curve.par_ratio(&reference, &Tenor::parse(tenor)).unwrap();
            assert_relative_eq!(ratio, quote, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_maturity_ratio_interpolates() {
        let reference = libor();
        let quotes = BTreeMap::from([
            ("1W".to_string(), 0.60),
            ("3M".to_string(), 0.62),
            ("1Y".to_string(), 0.66),
            ("2Y".to_string(), 0.70),
            ("5Y".to_string(), 0.78),
        ]);
        let mut curve = RatioCurve::new("MUNI");
        curve.update(&reference, &quotes).unwrap();

        let settle = curve.settlement().unwrap();
        let r1 = curve.par_ratio(&reference, &Tenor::years(1)).unwrap();
        let r2 = curve.par_ratio(&reference, &Tenor::years(2)).unwrap();
        let mid = curve
            .maturity_ratio(&reference, settle.add_months(18).unwrap())
            .unwrap();
        assert!(mid > r1.min(r2) && mid < r1.max(r2));
    }

    #[test]
    fn test_staleness_tracks_reference_version() {
        let mut reference = libor();
        let mut curve = RatioCurve::new("MUNI");
        curve.update(&reference, &flat_quotes(0.7)).unwrap();
        assert!(!curve.is_stale(&reference));

        reference.rebuild().unwrap();
        assert!(curve.is_stale(&reference));
        curve.refresh(&reference).unwrap();
        assert!(!curve.is_stale(&reference));
    }
}
