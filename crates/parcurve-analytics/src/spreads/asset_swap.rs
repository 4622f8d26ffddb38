//! Bonds as asset swaps: spread, ratio, OAS and implied volatility.
//!
//! A bond is decomposed into a payer swap of its coupon (scaled by `1/ratio`)
//! against LIBOR plus spread, and, when callable, a receiver Bermudan
//! swaption from the first call to maturity standing in for the call. The
//! price is `100 - premium`, where the premium is the swap's value plus the
//! swaption's, geared by the ratio.
//!
//! Swaps are rebuilt from the curve passed to every call, so a rebuilt curve
//! is always seen in full.

use log::debug;

use parcurve_bonds::options::DEFAULT_MEAN_REVERSION;
use parcurve_bonds::{Bond, CalcInput, ModelKind};
use parcurve_core::{Date, Frequency};
use parcurve_curves::services::TERM_DAY_COUNT;
use parcurve_curves::{Curve, CurveServices, FixingStore, RatioCurve, SpreadedCurve, TermStructureModel};
use parcurve_math::solvers::{try_secant, SolverConfig};

use super::values::{AswTerms, BondValues, OasRequest, SpreadType, MAX_VOL, MIN_VOL};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::swaps::{BermudanSwaption, InterestRateSwap, SwapDirection, SWAP_NOTIONAL};

/// Seeds for the implied volatility search.
const VOL_SEEDS: (f64, f64) = (0.09, 0.10);

/// Offset used when two secant seeds coincide.
const SEED_BUMP: f64 = 1e-4;

/// Model price split into its parts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Valued {
    price: f64,
    call_value: f64,
}

/// A bond viewed as an asset swap package.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use parcurve_analytics::spreads::{AssetSwap, AswTerms, SpreadType};
/// use parcurve_bonds::Bond;
/// use parcurve_core::Date;
/// use parcurve_curves::TermStructureModel;
///
/// let settle = Date::from_ymd(2025, 1, 15).unwrap();
/// let dfs: BTreeMap<Date, f64> = (0..=30)
///     .map(|y| (settle.add_years(y).unwrap(), (-0.04 * f64::from(y)).exp()))
///     .collect();
/// let curve = TermStructureModel::from_discount_factors("LIBOR", settle, &dfs).unwrap();
///
/// let bond = Bond::new(0.05, settle.add_years(10).unwrap(), settle).unwrap();
/// let asw = AssetSwap::new(bond);
/// let terms = AswTerms::new(SpreadType::AssetSwap);
/// let price = asw.asw_value(&curve, terms.spread, terms.ratio, terms.vol, terms.model).unwrap();
/// assert!(price > 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct AssetSwap {
    bond: Bond,
    fixings: FixingStore,
    mean_reversion: f64,
}

impl AssetSwap {
    /// Wraps a bond.
    #[must_use]
    pub fn new(bond: Bond) -> Self {
        Self {
            bond,
            fixings: FixingStore::new(),
            mean_reversion: DEFAULT_MEAN_REVERSION,
        }
    }

    /// Uses `fixings` for floating periods already under way.
    #[must_use]
    pub fn with_fixings(mut self, fixings: FixingStore) -> Self {
        self.fixings = fixings;
        self
    }

    /// Sets the short rate mean reversion.
    #[must_use]
    pub fn with_mean_reversion(mut self, mean_reversion: f64) -> Self {
        self.mean_reversion = mean_reversion;
        self
    }

    /// The underlying bond.
    pub fn bond(&self) -> &Bond {
        &self.bond
    }

    /// Fixings used for seasoned floating periods.
    pub fn fixings(&self) -> &FixingStore {
        &self.fixings
    }

    /// Semiannual 30/360 par coupon to the bond's maturity.
    pub fn fair_swap_rate(&self, curve: &dyn Curve) -> AnalyticsResult<f64> {
        Ok(curve.bondpar(self.bond.maturity(), TERM_DAY_COUNT, Frequency::SemiAnnual)?)
    }

    fn check_ratio(ratio: f64) -> AnalyticsResult<()> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(AnalyticsError::invalid_input(format!("ratio must be positive, got {ratio}")));
        }
        Ok(())
    }

    /// Payer swap of the bond's coupon (over `ratio`) from the curve date.
    pub fn base_swap(&self, curve: &dyn Curve, spread: f64, ratio: f64) -> AnalyticsResult<InterestRateSwap> {
        Self::check_ratio(ratio)?;
        InterestRateSwap::new(
            curve.reference_date(),
            self.bond.maturity(),
            self.bond.coupon() / ratio,
            spread,
            SwapDirection::Payer,
        )
    }

    /// Receiver swaption replicating the call, if the bond has one.
    pub fn swaption(&self, spread: f64, ratio: f64) -> AnalyticsResult<Option<BermudanSwaption>> {
        Self::check_ratio(ratio)?;
        let Some(first_call) = self.first_call() else {
            return Ok(None);
        };
        BermudanSwaption::new(
            first_call,
            self.bond.maturity(),
            self.bond.coupon() / ratio,
            spread,
            SwapDirection::Receiver,
        )
        .map(Some)
    }

    fn first_call(&self) -> Option<Date> {
        self.bond
            .call_list()
            .first()
            .map(|c| c.date)
            .filter(|d| *d < self.bond.maturity())
    }

    /// Swap and swaption values, before gearing by the ratio.
    fn premium(&self, curve: &dyn Curve, spread: f64, terms: &AswTerms) -> AnalyticsResult<(f64, f64)> {
        let swap_npv = self.base_swap(curve, spread, terms.ratio)?.npv(curve, &self.fixings)?;
        let call_value = match self.swaption(spread, terms.ratio)? {
            Some(swaption) => {
                let model = terms.model.build(terms.vol, self.mean_reversion);
                swaption.npv(curve, model.as_ref())?
            }
            None => 0.0,
        };
        Ok((swap_npv, call_value))
    }

    fn asw_valued(&self, curve: &dyn Curve, terms: &AswTerms) -> AnalyticsResult<Valued> {
        let (swap_npv, call_value) = self.premium(curve, terms.spread, terms)?;
        Ok(Valued {
            price: SWAP_NOTIONAL - (swap_npv + call_value) * terms.ratio,
            call_value: call_value * terms.ratio,
        })
    }

    fn oas_valued(&self, curve: &dyn Curve, terms: &AswTerms) -> AnalyticsResult<Valued> {
        let shifted = SpreadedCurve::new(curve, terms.spread);
        let (swap_npv, call_value) = self.premium(&shifted, 0.0, terms)?;
        Ok(Valued {
            price: SWAP_NOTIONAL - (swap_npv + call_value),
            call_value,
        })
    }

    fn valued(&self, curve: &dyn Curve, terms: &AswTerms) -> AnalyticsResult<Valued> {
        match terms.spread_type {
            SpreadType::AssetSwap => self.asw_valued(curve, terms),
            SpreadType::Oas => self.oas_valued(curve, terms),
        }
    }

    /// Asset swap price: `100 - (swap + swaption) * ratio`.
    pub fn asw_value(
        &self,
        curve: &dyn Curve,
        spread: f64,
        ratio: f64,
        vol: f64,
        model: ModelKind,
    ) -> AnalyticsResult<f64> {
        let terms = AswTerms {
            spread,
            ratio,
            vol,
            spread_type: SpreadType::AssetSwap,
            model,
        };
        Ok(self.asw_valued(curve, &terms)?.price)
    }

    /// OAS price: the curve is shifted by `spread` and the swap carries none.
    pub fn oas_value(
        &self,
        curve: &dyn Curve,
        spread: f64,
        ratio: f64,
        vol: f64,
        model: ModelKind,
    ) -> AnalyticsResult<f64> {
        let terms = AswTerms {
            spread,
            ratio,
            vol,
            spread_type: SpreadType::Oas,
            model,
        };
        Ok(self.oas_valued(curve, &terms)?.price)
    }

    /// Price under `terms`, by asset swap or OAS as the terms say.
    pub fn price(&self, curve: &dyn Curve, terms: &AswTerms) -> AnalyticsResult<f64> {
        Ok(self.valued(curve, terms)?.price)
    }

    /// Value of the call under `terms`, in points.
    pub fn call_value(&self, curve: &dyn Curve, terms: &AswTerms) -> AnalyticsResult<f64> {
        Ok(self.valued(curve, terms)?.call_value)
    }

    /// Solves the spread (added to `terms.spread`) or, with `solve_ratio`,
    /// the ratio that prices the bond at `price`.
    ///
    /// Returns the solved terms.
    pub fn solve_spread(
        &self,
        curve: &dyn Curve,
        price: f64,
        terms: &AswTerms,
        solve_ratio: bool,
    ) -> AnalyticsResult<AswTerms> {
        let ytm = self.bond.to_ytm(price)?;
        let fair = self.fair_swap_rate(curve)?;
        let config = SolverConfig::default();

        if solve_ratio {
            if fair.abs() < f64::EPSILON {
                return Err(AnalyticsError::invalid_input("zero par swap rate, cannot seed a ratio"));
            }
            let (x0, x1) = distinct_seeds(1.0, ytm / fair);
            let objective = |ratio: f64| self.price(curve, &terms.with_ratio(ratio));
            let solved = try_secant(objective, x0, x1, price, &config)?;
            debug!("solved ratio {:.6} in {} iterations", solved.root, solved.iterations);
            Ok(terms.with_ratio(solved.root))
        } else {
            let base = terms.spread;
            let (x0, x1) = distinct_seeds(0.0, ytm - fair);
            let objective = |spread: f64| self.price(curve, &terms.with_spread(base + spread));
            let solved = try_secant(objective, x0, x1, price, &config)?;
            debug!("solved spread {:.8} in {} iterations", solved.root, solved.iterations);
            Ok(terms.with_spread(base + solved.root))
        }
    }

    /// Solves the ratio that prices the bond at `price`, keeping `terms.spread`.
    pub fn solve_ratio(&self, curve: &dyn Curve, price: f64, terms: &AswTerms) -> AnalyticsResult<AswTerms> {
        self.solve_spread(curve, price, &terms.with_ratio(1.0), true)
    }

    /// Volatility that prices the bond at `price`.
    ///
    /// Non-callable bonds and prices above the minimal-volatility price give
    /// [`MIN_VOL`]; prices below the [`MAX_VOL`] price give `MAX_VOL`.
    pub fn solve_implied_vol(&self, curve: &dyn Curve, price: f64, terms: &AswTerms) -> AnalyticsResult<f64> {
        if self.first_call().is_none() {
            return Ok(MIN_VOL);
        }
        if price > self.price(curve, &terms.with_vol(MIN_VOL))? {
            return Ok(MIN_VOL);
        }
        match self.price(curve, &terms.with_vol(MAX_VOL)) {
            Ok(floor) if price < floor => return Ok(MAX_VOL),
            Ok(_) => {}
            Err(err) => debug!("no price at maximum volatility, searching unbounded: {err}"),
        }

        let objective = |vol: f64| self.price(curve, &terms.with_vol(vol));
        let solved = try_secant(objective, VOL_SEEDS.0, VOL_SEEDS.1, price, &SolverConfig::default())?;
        debug!("implied vol {:.6} in {} iterations", solved.root, solved.iterations);
        Ok(solved.root)
    }

    /// Half the price difference between the model's up and down scenarios.
    pub fn sensitivity(&self, model: &TermStructureModel, terms: &AswTerms) -> AnalyticsResult<f64> {
        let up = self.price(model.shift_up()?, terms)?;
        let dn = self.price(model.shift_dn()?, terms)?;
        Ok((up - dn) / 2.0)
    }

    /// Full values at `terms`, with DV01 from the model's scenarios when asked.
    pub fn value(&self, model: &TermStructureModel, terms: &AswTerms, with_dv01: bool) -> AnalyticsResult<BondValues> {
        let valued = self.valued(model, terms)?;
        let dv01 = if with_dv01 {
            Some(self.sensitivity(model, terms)?)
        } else {
            None
        };

        let calc = self.bond.calc(CalcInput::Price(valued.price))?;
        let oas_price = valued.price + valued.call_value;
        let oas_yield = self.bond.to_ytm(oas_price)?;

        Ok(BondValues {
            bond_yield: calc.bond_yield,
            price: valued.price,
            oas_yield,
            call_value: valued.call_value,
            oas_price,
            spread: terms.spread,
            ratio: terms.ratio,
            geared_spread: terms.spread * terms.ratio,
            vol: terms.vol,
            spread_type: terms.spread_type,
            model: terms.model,
            dv01,
        })
    }

    /// Values a request holding two of price-or-yield, spread-or-ratio and vol.
    ///
    /// With a market price and a vol, the spread is solved, or the ratio when
    /// only a spread is given. With a market price and no vol, the implied
    /// vol is solved. Without a market price the bond is valued directly.
    pub fn evaluate(&self, model: &TermStructureModel, request: &OasRequest) -> AnalyticsResult<BondValues> {
        let given = [request.has_market(), request.has_spread(), request.vol.is_some()]
            .into_iter()
            .filter(|g| *g)
            .count();
        if given < 2 {
            return Err(AnalyticsError::invalid_input(
                "need two of: price or yield, spread or ratio, vol",
            ));
        }

        let terms = request.terms();
        if !request.has_market() {
            return self.value(model, &terms, true);
        }

        let price = self.bond.calc_from(request.price, request.bond_yield)?.price;
        let solved = if request.vol.is_some() {
            let solve_ratio = request.ratio.is_none() && request.spread.is_some();
            self.solve_spread(model, price, &terms, solve_ratio)?
        } else {
            let vol = self.solve_implied_vol(model, price, &terms)?;
            terms.with_vol(vol)
        };
        self.value(model, &solved, true)
    }

    /// Asset swap spread over the ratio the basis curve gives at the bond's maturity.
    pub fn basis_swap_spread(
        &self,
        reference: &TermStructureModel,
        ratio_curve: &RatioCurve,
        price: f64,
        terms: &AswTerms,
    ) -> AnalyticsResult<BondValues> {
        let ratio = ratio_curve.maturity_ratio(reference, self.bond.maturity())?;
        let base = terms.with_ratio(ratio);
        let solved = self.solve_spread(reference, price, &base, false)?;
        self.value(reference, &solved, true)
    }
}

fn distinct_seeds(x0: f64, x1: f64) -> (f64, f64) {
    if (x1 - x0).abs() < f64::EPSILON || !x1.is_finite() {
        (x0, x0 + SEED_BUMP)
    } else {
        (x0, x1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flat_model, settle};
    use approx::assert_relative_eq;
    use parcurve_bonds::CallFeature;

    fn bullet(coupon: f64) -> AssetSwap {
        AssetSwap::new(Bond::new(coupon, settle().add_years(10).unwrap(), settle()).unwrap())
    }

    fn callable(coupon: f64) -> AssetSwap {
        let bond = Bond::builder()
            .coupon(coupon)
            .maturity(settle().add_years(10).unwrap())
            .settlement(settle())
            .call(CallFeature::new(settle().add_years(5).unwrap(), 100.0))
            .build()
            .unwrap();
        AssetSwap::new(bond)
    }

    #[test]
    fn test_par_coupon_prices_near_par() {
        let curve = flat_model(0.04);
        let fair = bullet(0.05).fair_swap_rate(&curve).unwrap();
        let asw = bullet(fair);
        let price = asw.asw_value(&curve, 0.0, 1.0, MIN_VOL, ModelKind::BlackKarasinski).unwrap();
        assert_relative_eq!(price, 100.0, epsilon = 0.05);
    }

    #[test]
    fn test_spread_lowers_price() {
        let curve = flat_model(0.04);
        let asw = bullet(0.05);
        let p0 = asw.asw_value(&curve, 0.0, 1.0, MIN_VOL, ModelKind::BlackKarasinski).unwrap();
        let p1 = asw.asw_value(&curve, 0.01, 1.0, MIN_VOL, ModelKind::BlackKarasinski).unwrap();
        assert!(p1 < p0);
        let o1 = asw.oas_value(&curve, 0.01, 1.0, MIN_VOL, ModelKind::BlackKarasinski).unwrap();
        assert!(o1 < p0);
    }

    #[test]
    fn test_solve_spread_round_trip() {
        let curve = flat_model(0.04);
        let asw = bullet(0.05);
        for spread_type in [SpreadType::AssetSwap, SpreadType::Oas] {
            let terms = AswTerms::new(spread_type).with_spread(0.0025);
            let price = asw.price(&curve, &terms).unwrap();
            let solved = asw.solve_spread(&curve, price, &AswTerms::new(spread_type), false).unwrap();
            assert_relative_eq!(solved.spread, 0.0025, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_solve_ratio_round_trip() {
        let curve = flat_model(0.04);
        let asw = bullet(0.035);
        let terms = AswTerms::default().with_ratio(0.8);
        let price = asw.price(&curve, &terms).unwrap();
        let solved = asw.solve_ratio(&curve, price, &AswTerms::default()).unwrap();
        assert_relative_eq!(solved.ratio, 0.8, epsilon = 1e-8);
    }

    #[test]
    fn test_call_value_and_oas_price() {
        let curve = flat_model(0.04);
        let asw = callable(0.05);
        let terms = AswTerms::default().with_vol(0.15);
        let values = asw.value(&curve, &terms, true).unwrap();
        assert!(values.call_value > 0.0);
        assert_relative_eq!(values.oas_price, values.price + values.call_value, epsilon = 1e-12);
        assert!(values.oas_yield < values.bond_yield + 0.01);
        assert!(values.dv01.unwrap() < 0.0);
    }

    #[test]
    fn test_implied_vol_round_trip() {
        let curve = flat_model(0.04);
        let asw = callable(0.05);
        let terms = AswTerms::default().with_vol(0.12);
        let price = asw.price(&curve, &terms).unwrap();
        let vol = asw.solve_implied_vol(&curve, price, &AswTerms::default()).unwrap();
        assert_relative_eq!(vol, 0.12, epsilon = 1e-6);
    }

    #[test]
    fn test_implied_vol_limits() {
        let curve = flat_model(0.04);
        assert_eq!(bullet(0.05).solve_implied_vol(&curve, 101.0, &AswTerms::default()).unwrap(), MIN_VOL);

        let asw = callable(0.05);
        let ceiling = asw.price(&curve, &AswTerms::default()).unwrap();
        assert_eq!(asw.solve_implied_vol(&curve, ceiling + 1.0, &AswTerms::default()).unwrap(), MIN_VOL);
    }

    #[test]
    fn test_dv01_matches_manual_shift() {
        let curve = flat_model(0.04);
        let asw = bullet(0.05);
        let terms = AswTerms::default();
        let up = asw.price(curve.shift_up().unwrap(), &terms).unwrap();
        let dn = asw.price(curve.shift_dn().unwrap(), &terms).unwrap();
        let dv01 = asw.sensitivity(&curve, &terms).unwrap();
        assert_relative_eq!(dv01, (up - dn) / 2.0, epsilon = 1e-12);
        assert!(dv01 < 0.0);
    }

    #[test]
    fn test_evaluate_needs_two_inputs() {
        let curve = flat_model(0.04);
        let request = OasRequest {
            price: Some(101.0),
            ..OasRequest::default()
        };
        assert!(matches!(
            bullet(0.05).evaluate(&curve, &request),
            Err(AnalyticsError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_evaluate_dispatch() {
        let curve = flat_model(0.04);
        let asw = bullet(0.05);

        let by_spread = asw
            .evaluate(
                &curve,
                &OasRequest {
                    spread: Some(0.003),
                    vol: Some(MIN_VOL),
                    ..OasRequest::default()
                },
            )
            .unwrap();
        let solved = asw
            .evaluate(
                &curve,
                &OasRequest {
                    price: Some(by_spread.price),
                    vol: Some(MIN_VOL),
                    ..OasRequest::default()
                },
            )
            .unwrap();
        assert_relative_eq!(solved.spread, 0.003, epsilon = 1e-8);
        assert_relative_eq!(solved.geared_spread, 0.003, epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_ratio() {
        let curve = flat_model(0.04);
        assert!(bullet(0.05).asw_value(&curve, 0.0, 0.0, MIN_VOL, ModelKind::HullWhite).is_err());
    }
}
