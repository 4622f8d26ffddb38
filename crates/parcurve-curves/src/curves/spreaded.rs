//! Zero-spread view over another curve.

use parcurve_core::Date;

use crate::error::CurveResult;
use crate::quotes::SimpleQuote;
use crate::traits::Curve;

/// A curve shifted by a continuously compounded zero spread.
///
/// `DF'(t) = DF(t) * exp(-s * t)`. For continuous compounding a zero spread
/// and a forward spread give the same curve, so this serves both uses.
///
/// The spread lives in a [`SimpleQuote`]; clones of the curve share it.
#[derive(Debug, Clone)]
pub struct SpreadedCurve<C> {
    base: C,
    spread: SimpleQuote,
}

impl<C: Curve> SpreadedCurve<C> {
    /// Creates a view of `base` shifted by `spread`.
    pub fn new(base: C, spread: f64) -> Self {
        Self {
            base,
            spread: SimpleQuote::new(spread),
        }
    }

    /// Creates a view whose spread tracks an existing quote.
    pub fn with_quote(base: C, spread: SimpleQuote) -> Self {
        Self { base, spread }
    }

    /// Current spread.
    pub fn spread(&self) -> f64 {
        self.spread.value()
    }

    /// Changes the spread seen by every clone of this view.
    pub fn set_spread(&self, spread: f64) {
        self.spread.set_value(spread);
    }

    /// The unshifted curve.
    pub fn base(&self) -> &C {
        &self.base
    }
}

impl<C: Curve> Curve for SpreadedCurve<C> {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        let df = self.base.discount_factor(t)?;
        Ok(df * (-self.spread() * t).exp())
    }

    fn reference_date(&self) -> Date {
        self.base.reference_date()
    }

    fn max_date(&self) -> Date {
        self.base.max_date()
    }

    fn year_fraction(&self, date: Date) -> f64 {
        self.base.year_fraction(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::test_support::FlatCurve;
    use approx::assert_relative_eq;

    fn base() -> FlatCurve {
        FlatCurve::new(Date::from_ymd(2025, 1, 15).unwrap(), 0.04)
    }

    #[test]
    fn test_zero_rate_shifts_by_spread() {
        let curve = SpreadedCurve::new(base(), 0.0025);
        assert_relative_eq!(curve.zero_rate(5.0).unwrap(), 0.0425, epsilon = 1e-14);
        assert_eq!(curve.reference_date(), base().reference_date());
    }

    #[test]
    fn test_zero_spread_is_identity() {
        let curve = SpreadedCurve::new(base(), 0.0);
        for t in [0.5, 1.0, 7.0, 30.0] {
            assert_eq!(curve.discount_factor(t).unwrap(), base().discount_factor(t).unwrap());
        }
    }

    #[test]
    fn test_set_spread_visible_through_clones() {
        let curve = SpreadedCurve::new(base(), 0.0);
        let view = curve.clone();
        curve.set_spread(0.01);
        assert_relative_eq!(view.zero_rate(2.0).unwrap(), 0.05, epsilon = 1e-14);
    }

    #[test]
    fn test_borrowed_base() {
        let b = base();
        let curve = SpreadedCurve::new(&b, -0.01);
        assert_relative_eq!(curve.zero_rate(1.0).unwrap(), 0.03, epsilon = 1e-14);
    }
}
