//! Core traits for yield curve operations.
//!
//! This module defines the [`Curve`] trait that every discount curve, spread
//! view and calibrated model satisfies. Time is measured in ACT/ACT ISDA years
//! from the curve's reference date.

use std::sync::Arc;

use parcurve_core::daycounts::{ActActIsda, DayCount};
use parcurve_core::Date;

use crate::error::CurveResult;

/// Horizon used to read a short rate off the curve when `t` is at the origin.
const SHORT_END: f64 = 1.0 / 365.0;

/// Curve time between two dates.
pub(crate) fn year_fraction_between(start: Date, end: Date) -> f64 {
    ActActIsda.year_fraction_f64(start, end)
}

/// The core trait for yield curves.
///
/// Implementations provide [`discount_factor`](Curve::discount_factor),
/// [`reference_date`](Curve::reference_date) and [`max_date`](Curve::max_date);
/// dates, zero rates and forwards are derived from those.
///
/// # Example
///
/// ```rust
/// use parcurve_core::Date;
/// use parcurve_curves::{Curve, CurveResult};
///
/// struct Flat(Date);
///
/// impl Curve for Flat {
///     fn discount_factor(&self, t: f64) -> CurveResult<f64> {
///         Ok((-0.05 * t).exp())
///     }
///     fn reference_date(&self) -> Date {
///         self.0
///     }
///     fn max_date(&self) -> Date {
///         self.0.add_years(50).unwrap()
///     }
/// }
///
/// let curve = Flat(Date::from_ymd(2025, 1, 15).unwrap());
/// assert!((curve.zero_rate(2.0).unwrap() - 0.05).abs() < 1e-12);
/// ```
pub trait Curve: Send + Sync {
    /// Returns the discount factor from the reference date to time `t` (years).
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Returns the reference date (discount factor 1.0).
    fn reference_date(&self) -> Date;

    /// Returns the last date backed by market data.
    fn max_date(&self) -> Date;

    /// ACT/ACT ISDA time from the reference date to `date`.
    fn year_fraction(&self, date: Date) -> f64 {
        year_fraction_between(self.reference_date(), date)
    }

    /// Discount factor for a date.
    fn discount_factor_at(&self, date: Date) -> CurveResult<f64> {
        self.discount_factor(self.year_fraction(date))
    }

    /// Continuously compounded zero rate to time `t`.
    ///
    /// At the origin the rate to one day is returned.
    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        let t = if t.abs() < SHORT_END { SHORT_END } else { t };
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Continuously compounded zero rate to a date.
    fn zero_rate_at(&self, date: Date) -> CurveResult<f64> {
        self.zero_rate(self.year_fraction(date))
    }

    /// Simply compounded forward rate between `t1` and `t2`.
    ///
    /// `F(t1, t2) = (DF(t1) / DF(t2) - 1) / (t2 - t1)`; zero when `t2 <= t1`.
    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Ok(0.0);
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1 / df2 - 1.0) / (t2 - t1))
    }
}

macro_rules! forward_curve_impl {
    ($($ty:ty),*) => {$(
        impl<C: Curve + ?Sized> Curve for $ty {
            fn discount_factor(&self, t: f64) -> CurveResult<f64> {
                (**self).discount_factor(t)
            }

            fn reference_date(&self) -> Date {
                (**self).reference_date()
            }

            fn max_date(&self) -> Date {
                (**self).max_date()
            }

            fn year_fraction(&self, date: Date) -> f64 {
                (**self).year_fraction(date)
            }

            fn discount_factor_at(&self, date: Date) -> CurveResult<f64> {
                (**self).discount_factor_at(date)
            }

            fn zero_rate(&self, t: f64) -> CurveResult<f64> {
                (**self).zero_rate(t)
            }

            fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
                (**self).forward_rate(t1, t2)
            }
        }
    )*};
}

forward_curve_impl!(&C, Box<C>, Arc<C>);

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Continuously compounded flat curve.
    #[derive(Debug, Clone, Copy)]
    pub struct FlatCurve {
        pub reference: Date,
        pub rate: f64,
    }

    impl FlatCurve {
        pub fn new(reference: Date, rate: f64) -> Self {
            Self { reference, rate }
        }
    }

    impl Curve for FlatCurve {
        fn discount_factor(&self, t: f64) -> CurveResult<f64> {
            Ok((-self.rate * t).exp())
        }

        fn reference_date(&self) -> Date {
            self.reference
        }

        fn max_date(&self) -> Date {
            self.reference.add_days(365 * 60)
        }
    }
}
