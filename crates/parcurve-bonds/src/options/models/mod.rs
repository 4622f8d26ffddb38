//! Short rate models and lattice calibration.
//!
//! Every model here maps a per-step drift `alpha` and a lattice state `x` to
//! a short rate. The drift at each step is solved so the tree reprices the
//! curve's discount factor to the end of the step (forward induction on
//! Arrow-Debreu prices); the state grid is symmetric with spacing matching
//! the variance of a mean-reverting process over one step.

mod black_karasinski;
mod hull_white;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use parcurve_curves::Curve;
use parcurve_math::solvers::{try_secant, SolverConfig};

use super::BinomialTree;
use crate::error::{BondError, BondResult};

pub use black_karasinski::BlackKarasinski;
pub use hull_white::HullWhite;

/// Mean reversion used when none is given: effectively none.
pub const DEFAULT_MEAN_REVERSION: f64 = 1e-7;

/// Time steps used for lattice valuation.
pub const DEFAULT_TREE_STEPS: usize = 50;

/// Floor on seed rates for models that need a positive rate.
const MIN_SEED_RATE: f64 = 1e-6;

/// A one-factor short rate model that can be fitted to a curve on a lattice.
pub trait ShortRateModel: fmt::Debug + Send + Sync {
    /// Model name.
    fn name(&self) -> &'static str;

    /// Short rate volatility.
    fn volatility(&self) -> f64;

    /// Mean reversion speed.
    fn mean_reversion(&self) -> f64;

    /// Short rate for drift `alpha` at lattice state `x`.
    fn short_rate(&self, alpha: f64, x: f64) -> f64;

    /// Drift giving short rate `rate` at the centre of the lattice.
    fn alpha_seed(&self, rate: f64) -> f64;

    /// Spacing between adjacent states over a step of `dt` years.
    fn state_step(&self, dt: f64) -> f64 {
        let a = self.mean_reversion();
        let variance = if a.abs() < 1e-12 {
            dt
        } else {
            (1.0 - (-2.0 * a * dt).exp()) / (2.0 * a)
        };
        self.volatility() * variance.sqrt()
    }

    /// Builds a tree of `steps` periods out to `horizon` years that reprices
    /// the curve's discount factors at every step.
    fn build_tree(&self, curve: &dyn Curve, horizon: f64, steps: usize) -> BondResult<BinomialTree> {
        if steps == 0 || !horizon.is_finite() || horizon <= 0.0 {
            return Err(BondError::invalid_input(format!(
                "lattice needs a positive horizon and steps, got {horizon} and {steps}"
            )));
        }
        let dt = horizon / steps as f64;
        let dx = self.state_step(dt);
        let config = SolverConfig::default();

        let mut tree = BinomialTree::new(steps, dt);
        let mut state_prices = vec![1.0];
        let mut df_prev = 1.0;
        let mut alpha = 0.0;

        for i in 0..steps {
            let df_next = curve.discount_factor((i + 1) as f64 * dt)?;
            let forward = (df_prev / df_next).ln() / dt;
            let states: Vec<f64> = (0..=i).map(|j| (2.0 * j as f64 - i as f64) * dx).collect();

            let reprice = |alpha: f64| -> BondResult<f64> {
                Ok(state_prices
                    .iter()
                    .zip(&states)
                    .map(|(q, x)| q * (-self.short_rate(alpha, *x) * dt).exp())
                    .sum())
            };
            let seed = self.alpha_seed(forward.max(MIN_SEED_RATE));
            alpha = try_secant(reprice, seed, seed + 1e-3, df_next, &config)?.root;

            let mut next = vec![0.0; i + 2];
            for (j, (q, x)) in state_prices.iter().zip(&states).enumerate() {
                let rate = self.short_rate(alpha, *x);
                tree.set_rate(i, j, rate);
                let df = (-rate * dt).exp();
                next[j + 1] += q * tree.prob_up(i, j) * df;
                next[j] += q * tree.prob_down(i, j) * df;
            }
            state_prices = next;
            df_prev = df_next;
        }

        // Terminal rates are not used for discounting; they carry the last drift.
        for j in 0..=steps {
            let x = (2.0 * j as f64 - steps as f64) * dx;
            tree.set_rate(steps, j, self.short_rate(alpha, x));
        }
        Ok(tree)
    }
}

/// Selects a short rate model by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelKind {
    /// Lognormal short rate.
    #[default]
    #[serde(alias = "BK", alias = "bk")]
    BlackKarasinski,
    /// Normal short rate.
    #[serde(alias = "HW", alias = "hw")]
    HullWhite,
}

impl ModelKind {
    /// Builds the model with the given volatility and mean reversion.
    #[must_use]
    pub fn build(self, volatility: f64, mean_reversion: f64) -> Box<dyn ShortRateModel> {
        match self {
            Self::BlackKarasinski => Box::new(BlackKarasinski::new(mean_reversion, volatility)),
            Self::HullWhite => Box::new(HullWhite::new(mean_reversion, volatility)),
        }
    }

    /// Model name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BlackKarasinski => "Black-Karasinski",
            Self::HullWhite => "Hull-White",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = BondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "bk" | "blackkarasinski" => Ok(Self::BlackKarasinski),
            "hw" | "hullwhite" => Ok(Self::HullWhite),
            _ => Err(BondError::invalid_input(format!("unknown short rate model: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use parcurve_core::Date;
    use parcurve_curves::{CurveResult, DiscountCurve};
    use std::collections::BTreeMap;

    struct Flat(f64);

    impl Curve for Flat {
        fn discount_factor(&self, t: f64) -> CurveResult<f64> {
            Ok((-self.0 * t).exp())
        }
        fn reference_date(&self) -> Date {
            Date::from_ymd(2025, 1, 15).unwrap()
        }
        fn max_date(&self) -> Date {
            Date::from_ymd(2075, 1, 15).unwrap()
        }
    }

    fn sloped() -> DiscountCurve {
        let reference = Date::from_ymd(2025, 1, 15).unwrap();
        let pillars: BTreeMap<Date, f64> = [(0, 1.0), (2, 0.93), (5, 0.82), (10, 0.64)]
            .into_iter()
            .map(|(y, df)| (reference.add_years(y).unwrap(), df))
            .collect();
        DiscountCurve::new(reference, &pillars).unwrap()
    }

    fn assert_reprices(model: &dyn ShortRateModel, curve: &dyn Curve) {
        let tree = model.build_tree(curve, 10.0, 40).unwrap();
        let prices = tree.state_prices();
        for i in [1, 10, 25, 40] {
            let total: f64 = prices[i].iter().sum();
            let expected = curve.discount_factor(tree.time_at_step(i)).unwrap();
            assert_relative_eq!(total, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_trees_reprice_curve() {
        let curve = sloped();
        assert_reprices(&BlackKarasinski::new(DEFAULT_MEAN_REVERSION, 0.15), &curve);
        assert_reprices(&HullWhite::new(0.03, 0.01), &curve);
        assert_reprices(&BlackKarasinski::new(0.05, 1e-7), &Flat(0.04));
    }

    #[test]
    fn test_zero_vol_tree_is_flat_on_flat_curve() {
        let model = HullWhite::new(DEFAULT_MEAN_REVERSION, 1e-9);
        let tree = model.build_tree(&Flat(0.05), 5.0, 10).unwrap();
        for j in 0..=7 {
            assert_relative_eq!(tree.rate_at(7, j), 0.05, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_lognormal_rates_stay_positive() {
        let model = BlackKarasinski::new(DEFAULT_MEAN_REVERSION, 0.5);
        let tree = model.build_tree(&Flat(0.01), 10.0, 50).unwrap();
        assert!(tree.rates.iter().flatten().all(|r| *r > 0.0));
        assert!(tree.rate_at(50, 50) > tree.rate_at(50, 0));
    }

    #[test]
    fn test_state_step() {
        let model = HullWhite::new(DEFAULT_MEAN_REVERSION, 0.01);
        assert_relative_eq!(model.state_step(0.25), 0.005, epsilon = 1e-9);
        let reverting = HullWhite::new(0.5, 0.01);
        assert!(reverting.state_step(1.0) < 0.01);
    }

    #[test]
    fn test_invalid_tree_inputs() {
        let model = HullWhite::new(0.03, 0.01);
        assert!(model.build_tree(&Flat(0.05), 0.0, 10).is_err());
        assert!(model.build_tree(&Flat(0.05), 5.0, 0).is_err());
    }

    #[test]
    fn test_model_kind() {
        assert_eq!(ModelKind::default(), ModelKind::BlackKarasinski);
        assert_eq!("hull-white".parse::<ModelKind>().unwrap(), ModelKind::HullWhite);
        assert_eq!("BK".parse::<ModelKind>().unwrap(), ModelKind::BlackKarasinski);
        assert!("cir".parse::<ModelKind>().is_err());

        let model = ModelKind::HullWhite.build(0.01, DEFAULT_MEAN_REVERSION);
        assert_eq!(model.name(), "Hull-White");
        assert_eq!(model.volatility(), 0.01);
    }
}
