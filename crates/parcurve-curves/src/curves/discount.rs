//! Discount factor curve.

use std::collections::BTreeMap;

use parcurve_core::daycounts::{ActActIsda, DayCount};
use parcurve_core::Date;
use parcurve_math::interpolation::{Interpolator, LogLinearInterpolator};

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Discount factors at pillar dates, interpolated log-linearly.
///
/// The reference date carries a discount factor of exactly 1. Between
/// pillars forwards are flat; past the last pillar the last forward is
/// extended.
///
/// ```rust
/// use std::collections::BTreeMap;
/// use parcurve_core::Date;
/// use parcurve_curves::{Curve, DiscountCurve};
///
/// let reference = Date::from_ymd(2025, 1, 15).unwrap();
/// let mut pillars = BTreeMap::new();
/// pillars.insert(Date::from_ymd(2026, 1, 15).unwrap(), 0.96);
///
/// let curve = DiscountCurve::new(reference, &pillars).unwrap();
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
/// assert!((curve.discount_factor(1.0).unwrap() - 0.96).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct DiscountCurve {
    reference_date: Date,
    dates: Vec<Date>,
    interpolator: LogLinearInterpolator,
}

impl DiscountCurve {
    /// Builds a curve from `{date: discount factor}`.
    ///
    /// A pillar at the reference date is added when absent.
    ///
    /// # Errors
    ///
    /// `Construction` for pillars before the reference date, a reference
    /// discount factor other than 1, or non-positive discount factors;
    /// `InsufficientPoints` when no pillar lies after the reference date.
    pub fn new(reference_date: Date, pillars: &BTreeMap<Date, f64>) -> CurveResult<Self> {
        let mut nodes = pillars.clone();
        match nodes.get(&reference_date) {
            Some(df) if (df - 1.0).abs() > 1e-12 => {
                return Err(CurveError::construction(format!(
                    "discount factor at reference date {reference_date} is {df}, expected 1"
                )));
            }
            Some(_) => {}
            None => {
                nodes.insert(reference_date, 1.0);
            }
        }

        if let Some(first) = nodes.keys().next() {
            if *first < reference_date {
                return Err(CurveError::construction(format!(
                    "pillar {first} precedes reference date {reference_date}"
                )));
            }
        }
        if let Some((date, df)) = nodes.iter().find(|(_, df)| !(**df > 0.0 && df.is_finite())) {
            return Err(CurveError::construction(format!(
                "discount factor {df} at {date} is not positive"
            )));
        }
        if nodes.len() < 2 {
            return Err(CurveError::InsufficientPoints {
                required: 2,
                got: nodes.len(),
            });
        }

        let dates: Vec<Date> = nodes.keys().copied().collect();
        let times = dates
            .iter()
            .map(|d| ActActIsda.year_fraction_f64(reference_date, *d))
            .collect();
        let dfs = nodes.values().copied().collect();
        let interpolator = LogLinearInterpolator::new(times, dfs)?.with_extrapolation();

        Ok(Self {
            reference_date,
            dates,
            interpolator,
        })
    }

    /// Builds a curve from `(date, discount factor)` pairs.
    ///
    /// # Errors
    ///
    /// As [`DiscountCurve::new`], plus `Construction` for a repeated date.
    pub fn from_pillars<I>(reference_date: Date, pillars: I) -> CurveResult<Self>
    where
        I: IntoIterator<Item = (Date, f64)>,
    {
        let mut nodes = BTreeMap::new();
        for (date, df) in pillars {
            if nodes.insert(date, df).is_some() && date != reference_date {
                return Err(CurveError::construction(format!("duplicate pillar {date}")));
            }
        }
        Self::new(reference_date, &nodes)
    }

    /// Pillar dates, reference date first.
    pub fn pillar_dates(&self) -> &[Date] {
        &self.dates
    }

    /// `(date, discount factor)` for every pillar.
    pub fn pillars(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates
            .iter()
            .copied()
            .zip(self.interpolator.y_values().iter().copied())
    }

    /// Number of pillars including the reference date.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false: a curve has at least two pillars.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl Curve for DiscountCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.interpolate(t)?)
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }
}
