//! Volatility by final maturity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use parcurve_bonds::{Bond, CallFeature};
use parcurve_core::calendars::BusinessDayConvention;
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::{Date, Tenor};
use parcurve_curves::{Curve, TermStructureModel};
use parcurve_math::interpolation::{Interpolator, LinearInterpolator};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::spreads::{AssetSwap, AswTerms};

/// Call tenor used for scale bonds when none is given.
pub const DEFAULT_CALL_TENOR: &str = "10Y";

/// Volatility keyed by final maturity ("30Y non-call 10Y"), interpolated
/// linearly in years and held flat beyond the ends.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use parcurve_analytics::options::VolCurve;
/// use parcurve_core::Tenor;
///
/// let quotes = BTreeMap::from([("10Y".to_string(), 20.0), ("30Y".to_string(), 30.0)]);
/// let curve = VolCurve::from_quotes(&quotes, 100.0).unwrap();
/// assert!((curve.vol(&Tenor::parse("20Y")).unwrap() - 0.25).abs() < 1e-12);
/// assert!((curve.vol(&Tenor::parse("5Y")).unwrap() - 0.20).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct VolCurve {
    expiry: Tenor,
    points: Vec<(Tenor, f64)>,
    interpolator: LinearInterpolator,
}

impl VolCurve {
    /// Builds a curve from `(tenor, vol)` points for the default expiry.
    pub fn new(points: Vec<(Tenor, f64)>) -> AnalyticsResult<Self> {
        Self::with_expiry(points, Tenor::parse(DEFAULT_CALL_TENOR))
    }

    /// Builds a curve whose points are for bonds callable after `expiry`.
    pub fn with_expiry(mut points: Vec<(Tenor, f64)>, expiry: Tenor) -> AnalyticsResult<Self> {
        points.retain(|(_, vol)| vol.is_finite());
        if points.is_empty() {
            return Err(AnalyticsError::InsufficientVolPoints {
                required: 1,
                got: 0,
            });
        }
        points.sort_by(|a, b| a.0.cmp_term(&b.0));
        points.dedup_by(|a, b| a.0.term() == b.0.term());

        let xs = points.iter().map(|(t, _)| t.term()).collect();
        let ys = points.iter().map(|(_, v)| *v).collect();
        let interpolator = LinearInterpolator::new(xs, ys)?.with_extrapolation();
        Ok(Self {
            expiry,
            points,
            interpolator,
        })
    }

    /// Builds a curve from `tenor -> quote` text, dividing each quote by
    /// `data_divisor` (100 for quotes in percent).
    pub fn from_quotes(quotes: &BTreeMap<String, f64>, data_divisor: f64) -> AnalyticsResult<Self> {
        if data_divisor == 0.0 {
            return Err(AnalyticsError::invalid_input("data divisor must be non-zero"));
        }
        let points = quotes
            .iter()
            .map(|(tenor, quote)| (Tenor::parse(tenor), quote / data_divisor))
            .collect();
        Self::new(points)
    }

    /// Volatility at `years` to final maturity.
    pub fn vol_at(&self, years: f64) -> AnalyticsResult<f64> {
        Ok(self.interpolator.interpolate(years)?)
    }

    /// Volatility at a tenor.
    pub fn vol(&self, tenor: &Tenor) -> AnalyticsResult<f64> {
        self.vol_at(tenor.term())
    }

    /// Volatility for a bond settling `settle` and maturing `maturity`,
    /// measured ACT/ACT.
    pub fn vol_between(&self, settle: Date, maturity: Date) -> AnalyticsResult<f64> {
        self.vol_at(DayCountConvention::ActActIsda.year_fraction(settle, maturity))
    }

    /// Call tenor the volatilities refer to.
    pub fn expiry(&self) -> &Tenor {
        &self.expiry
    }

    /// Points in tenor order.
    pub fn points(&self) -> &[(Tenor, f64)] {
        &self.points
    }
}

/// A scale point: a par-callable bond's coupon and yield at a tenor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalePoint {
    /// Coupon (decimal).
    pub coupon: f64,
    /// Yield to worst (decimal).
    pub bond_yield: f64,
}

/// Implied volatility by tenor from a scale of callable bonds.
///
/// Each point becomes a municipal bond maturing at its tenor and callable at
/// par after `call`; its implied volatility against `curve` at zero spread
/// and unit ratio becomes the curve point. Points maturing inside the call
/// carry the minimal volatility.
pub fn implied_vol_curve(
    curve: &TermStructureModel,
    scale: &BTreeMap<String, ScalePoint>,
    call: &Tenor,
    terms: &AswTerms,
) -> AnalyticsResult<VolCurve> {
    let settle = curve.reference_date();
    let calendar = curve.calendar();
    let first_call = call.advance(settle, BusinessDayConvention::Unadjusted, &calendar, false)?;
    let base = terms.with_spread(0.0).with_ratio(1.0);

    let mut points = Vec::with_capacity(scale.len());
    for (label, point) in scale {
        let tenor = Tenor::parse(label);
        let maturity = tenor.advance(settle, BusinessDayConvention::Unadjusted, &calendar, false)?;
        let call_feature = (first_call < maturity).then(|| CallFeature::new(first_call, 100.0));
        let bond = Bond::builder()
            .coupon(point.coupon)
            .maturity(maturity)
            .settlement(settle)
            .maybe_call(call_feature)
            .municipal()
            .build()?;

        let price = bond.to_price(point.bond_yield)?;
        let vol = AssetSwap::new(bond).solve_implied_vol(curve, price, &base)?;
        log::debug!("implied vol {label}: {vol:.6}");
        points.push((tenor, vol));
    }
    VolCurve::with_expiry(points, *call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreads::MIN_VOL;
    use crate::test_support::flat_model;
    use approx::assert_relative_eq;

    fn curve() -> VolCurve {
        VolCurve::new(vec![
            (Tenor::parse("30Y"), 0.30),
            (Tenor::parse("10Y"), 0.20),
            (Tenor::parse("15Y"), 0.22),
        ])
        .unwrap()
    }

    #[test]
    fn test_interpolation_and_flat_ends() {
        let vols = curve();
        assert_relative_eq!(vols.vol(&Tenor::parse("10Y")).unwrap(), 0.20);
        assert_relative_eq!(vols.vol_at(12.5).unwrap(), 0.21, epsilon = 1e-12);
        assert_relative_eq!(vols.vol_at(1.0).unwrap(), 0.20);
        assert_relative_eq!(vols.vol_at(40.0).unwrap(), 0.30);
        assert_eq!(vols.points()[0].0, Tenor::parse("10Y"));
    }

    #[test]
    fn test_vol_between_dates() {
        let vols = curve();
        let settle = Date::from_ymd(2025, 1, 15).unwrap();
        let maturity = Date::from_ymd(2045, 1, 15).unwrap();
        let expected = vols.vol_at(DayCountConvention::ActActIsda.year_fraction(settle, maturity)).unwrap();
        assert_relative_eq!(vols.vol_between(settle, maturity).unwrap(), expected);
    }

    #[test]
    fn test_empty_curve() {
        assert!(matches!(
            VolCurve::new(Vec::new()),
            Err(AnalyticsError::InsufficientVolPoints { .. })
        ));
        assert!(VolCurve::from_quotes(&BTreeMap::new(), 100.0).is_err());
    }

    #[test]
    fn test_implied_vol_curve_short_points_are_minimal() {
        let model = flat_model(0.04);
        let scale = BTreeMap::from([(
            "5Y".to_string(),
            ScalePoint {
                coupon: 0.04,
                bond_yield: 0.035,
            },
        )]);
        let vols = implied_vol_curve(&model, &scale, &Tenor::parse("10Y"), &AswTerms::default()).unwrap();
        assert_eq!(vols.vol(&Tenor::parse("5Y")).unwrap(), MIN_VOL);
        assert_eq!(vols.expiry(), &Tenor::parse("10Y"));
    }
}
