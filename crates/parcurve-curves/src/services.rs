//! Rate services every curve provides: deposit forwards, floating payments
//! and par rates.
//!
//! [`CurveServices`] is implemented for every [`Curve`], so a discount curve,
//! a spreaded view or a calibrated model all answer the same questions.

use parcurve_core::calendars::{BusinessDayConvention, Calendar};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::TimeUnit;
use parcurve_core::{Date, Frequency, Tenor};
use parcurve_math::solvers::{secant, SolverConfig};

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Day count for deposit rates and floating payments.
pub const DEPO_DAY_COUNT: DayCountConvention = DayCountConvention::Act360;

/// Day count for fixed legs and par bond coupons.
pub const TERM_DAY_COUNT: DayCountConvention = DayCountConvention::Thirty360;

/// Months between fixed swap payments.
const FIXED_LEG_MONTHS: i32 = 6;

/// Months between floating swap payments.
const FLOAT_LEG_MONTHS: i32 = 3;

/// Deposit, payment and par-rate queries against a curve.
pub trait CurveServices: Curve {
    /// Discount factor for a date.
    ///
    /// With `extrapolate` false, dates past [`Curve::max_date`] are an error.
    fn discount(&self, date: Date, extrapolate: bool) -> CurveResult<f64> {
        let max_date = self.max_date();
        if !extrapolate && date > max_date {
            return Err(CurveError::ExtrapolationNotAllowed { date, max_date });
        }
        self.discount_factor_at(date)
    }

    /// Simple forward deposit rate: `(DF(begin) / DF(end) - 1) / yf`.
    ///
    /// Returns 0 when the year fraction is not positive.
    fn forward_depo(&self, begin: Date, end: Date, day_count: DayCountConvention) -> CurveResult<f64> {
        let yf = day_count.year_fraction(begin, end);
        if yf <= 0.0 {
            return Ok(0.0);
        }
        let df_begin = self.discount(begin, true)?;
        let df_end = self.discount(end, true)?;
        Ok((df_begin / df_end - 1.0) / yf)
    }

    /// Floating leg payment per unit notional: `(forward + spread) * yf`.
    fn forward_payment(
        &self,
        begin: Date,
        end: Date,
        day_count: DayCountConvention,
        spread: f64,
    ) -> CurveResult<f64> {
        let yf = day_count.year_fraction(begin, end);
        Ok((self.forward_depo(begin, end, day_count)? + spread) * yf)
    }

    /// Coupon that prices a bullet bond maturing at `maturity` to par.
    ///
    /// Coupons fall at `(k + frac) / f` years for `k = 0..=nper`. Without a
    /// stub the closed form applies; with one, the clean-price equation is
    /// solved by secant, seeded with the accrued-adjusted closed form.
    fn bondpar(
        &self,
        maturity: Date,
        day_count: DayCountConvention,
        frequency: Frequency,
    ) -> CurveResult<f64> {
        let settle = self.reference_date();
        let f = frequency.as_f64();
        if f <= 0.0 {
            return Err(CurveError::invalid_instrument(
                "par coupon needs a periodic frequency",
            ));
        }
        let term = f * day_count.year_fraction(settle, maturity);
        if term <= 0.0 {
            return Err(CurveError::invalid_instrument(format!(
                "maturity {maturity} is not after {settle}"
            )));
        }

        let nper = term.floor() as u32;
        let frac = term - f64::from(nper);
        let dfs = (0..=nper)
            .map(|k| self.discount_factor((f64::from(k) + frac) / f))
            .collect::<CurveResult<Vec<f64>>>()?;
        let df_n = dfs[dfs.len() - 1];

        if frac <= f64::EPSILON {
            let annuity: f64 = dfs[1..].iter().sum();
            if annuity <= 0.0 {
                return Err(CurveError::construction("non-positive par annuity"));
            }
            return Ok(f * (1.0 - df_n) / annuity);
        }

        let sum: f64 = dfs.iter().sum();
        let stub = 1.0 - frac;
        let denom = sum - stub;
        if denom <= 0.0 {
            return Err(CurveError::construction("non-positive par annuity"));
        }
        let seed = f * (1.0 - df_n) / denom;

        let clean = |c: f64| c / f * sum + df_n - stub * c / f;
        let result = secant(clean, seed, seed + 1e-4, 1.0, &SolverConfig::default())?;
        Ok(result.root)
    }

    /// Par rate for a tenor from the reference date.
    ///
    /// Sub-year tenors give the ACT/360 deposit rate; year tenors give the
    /// par swap rate (see [`par_swap_rate`]).
    fn tenorpar(&self, tenor: &Tenor, calendar: &dyn Calendar) -> CurveResult<f64> {
        let settle = self.reference_date();
        if tenor.is_years() {
            return par_swap_rate(self, settle, tenor.length(), calendar);
        }
        let end = tenor.advance(settle, BusinessDayConvention::ModifiedFollowing, calendar, false)?;
        self.forward_depo(settle, end, DEPO_DAY_COUNT)
    }
}

impl<C: Curve + ?Sized> CurveServices for C {}

/// Par rate of a spot-starting swap: semiannual 30/360 unadjusted fixed leg
/// against quarterly ACT/360 modified-following floating payments.
pub fn par_swap_rate<C: Curve + ?Sized>(
    curve: &C,
    start: Date,
    years: u32,
    calendar: &dyn Calendar,
) -> CurveResult<f64> {
    if years == 0 {
        return Err(CurveError::invalid_instrument("zero-length swap"));
    }
    let months = i32::try_from(years)
        .ok()
        .and_then(|y| y.checked_mul(12))
        .ok_or_else(|| CurveError::invalid_instrument(format!("{years}Y swap is too long")))?;

    let mut annuity = 0.0;
    let mut prev = start;
    for m in (FIXED_LEG_MONTHS..=months).step_by(FIXED_LEG_MONTHS as usize) {
        let pay = start.add_months(m)?;
        annuity += TERM_DAY_COUNT.year_fraction(prev, pay) * curve.discount(pay, true)?;
        prev = pay;
    }

    let mut floating = 0.0;
    let mut prev = start;
    for m in (FLOAT_LEG_MONTHS..=months).step_by(FLOAT_LEG_MONTHS as usize) {
        let pay = calendar.advance(start, m, TimeUnit::Months, BusinessDayConvention::ModifiedFollowing)?;
        floating += curve.discount(pay, true)? * curve.forward_payment(prev, pay, DEPO_DAY_COUNT, 0.0)?;
        prev = pay;
    }

    if annuity <= 0.0 {
        return Err(CurveError::construction("non-positive fixed leg annuity"));
    }
    Ok(floating / annuity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::test_support::FlatCurve;
    use approx::assert_relative_eq;
    use parcurve_core::calendars::Target;

    fn settle() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_forward_depo_matches_discount_ratio() {
        let curve = FlatCurve::new(settle(), 0.05);
        let begin = Date::from_ymd(2025, 4, 15).unwrap();
        let end = Date::from_ymd(2025, 7, 15).unwrap();
        let yf = DEPO_DAY_COUNT.year_fraction(begin, end);
        let expected = (curve.discount(begin, true).unwrap() / curve.discount(end, true).unwrap()
            - 1.0)
            / yf;
        assert_relative_eq!(
            curve.forward_depo(begin, end, DEPO_DAY_COUNT).unwrap(),
            expected,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_forward_depo_same_day_is_zero() {
        let curve = FlatCurve::new(settle(), 0.05);
        assert_eq!(curve.forward_depo(settle(), settle(), DEPO_DAY_COUNT).unwrap(), 0.0);
    }

    #[test]
    fn test_forward_payment_adds_spread() {
        let curve = FlatCurve::new(settle(), 0.05);
        let end = Date::from_ymd(2025, 4, 15).unwrap();
        let yf = DEPO_DAY_COUNT.year_fraction(settle(), end);
        let base = curve.forward_payment(settle(), end, DEPO_DAY_COUNT, 0.0).unwrap();
        let spread = curve.forward_payment(settle(), end, DEPO_DAY_COUNT, 0.01).unwrap();
        assert_relative_eq!(spread - base, 0.01 * yf, epsilon = 1e-14);
    }

    #[test]
    fn test_discount_without_extrapolation() {
        let curve = FlatCurve::new(settle(), 0.05);
        let past_end = curve.max_date().add_days(1);
        assert!(matches!(
            curve.discount(past_end, false),
            Err(CurveError::ExtrapolationNotAllowed { .. })
        ));
        assert!(curve.discount(past_end, true).is_ok());
    }

    #[test]
    fn test_bondpar_whole_periods() {
        let curve = FlatCurve::new(settle(), 0.05);
        let maturity = Date::from_ymd(2035, 1, 15).unwrap();
        let par = curve
            .bondpar(maturity, TERM_DAY_COUNT, Frequency::SemiAnnual)
            .unwrap();
        // Semiannual equivalent of 5% continuous
        let expected = 2.0 * ((0.05_f64 / 2.0).exp() - 1.0);
        assert_relative_eq!(par, expected, epsilon = 1e-10);
    }

    #[test]
    fn test_bondpar_with_stub_prices_to_par() {
        let curve = FlatCurve::new(settle(), 0.05);
        let maturity = Date::from_ymd(2034, 11, 15).unwrap();
        let c = curve
            .bondpar(maturity, TERM_DAY_COUNT, Frequency::SemiAnnual)
            .unwrap();

        let term = 2.0 * TERM_DAY_COUNT.year_fraction(settle(), maturity);
        let nper = term.floor();
        let frac = term - nper;
        assert!(frac > 0.0);
        let mut pv = 0.0;
        let mut k = 0.0;
        while k <= nper {
            pv += c / 2.0 * curve.discount_factor((k + frac) / 2.0).unwrap();
            k += 1.0;
        }
        pv += curve.discount_factor((nper + frac) / 2.0).unwrap();
        let clean = pv - (1.0 - frac) * c / 2.0;
        assert_relative_eq!(clean, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bondpar_rejects_past_maturity() {
        let curve = FlatCurve::new(settle(), 0.05);
        assert!(curve
            .bondpar(settle(), TERM_DAY_COUNT, Frequency::SemiAnnual)
            .is_err());
    }

    #[test]
    fn test_tenorpar_short_and_long() {
        let curve = FlatCurve::new(settle(), 0.03);
        let depo = curve.tenorpar(&Tenor::parse("3M"), &Target).unwrap();
        assert!((depo - 0.03).abs() < 5e-4);

        let swap = curve.tenorpar(&Tenor::parse("10Y"), &Target).unwrap();
        // Semiannual 30/360 par rate on a 3% continuous curve
        assert!((swap - 0.0302).abs() < 5e-4);
    }

    #[test]
    fn test_zero_year_swap_rejected() {
        let curve = FlatCurve::new(settle(), 0.03);
        assert!(par_swap_rate(&curve, settle(), 0, &Target).is_err());
    }
}
