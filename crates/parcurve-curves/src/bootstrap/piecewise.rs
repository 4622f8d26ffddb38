//! Piecewise discount factor bootstrap.
//!
//! Solves each pillar discount factor in turn so that the helper's implied
//! quote, priced on the partial curve, matches its market quote.

use log::{debug, warn};

use parcurve_core::Date;
use parcurve_math::solvers::{try_secant, SolverConfig};

use crate::curves::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::helpers::RateHelper;
use crate::traits::Curve;

/// Rate used to seed the first pillar when nothing has been solved yet.
const SEED_RATE: f64 = 0.03;

/// Sequential bootstrapper over rate helpers.
///
/// 1. Sort helpers by pillar date
/// 2. Start from DF = 1.0 at settlement
/// 3. Solve each pillar by secant on the partial log-linear curve
/// 4. Return the final [`DiscountCurve`]
#[derive(Debug, Clone, Copy)]
pub struct PiecewiseBootstrap {
    settlement: Date,
    config: SolverConfig,
}

impl PiecewiseBootstrap {
    /// Creates a bootstrapper anchored at `settlement`.
    #[must_use]
    pub fn new(settlement: Date) -> Self {
        Self {
            settlement,
            config: SolverConfig::default(),
        }
    }

    /// Overrides the pillar solver settings.
    #[must_use]
    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Bootstraps a discount curve from `helpers`.
    ///
    /// # Errors
    ///
    /// - `InsufficientPoints` with no helpers
    /// - `Construction` for a pillar on or before settlement, two helpers
    ///   sharing a pillar, or a non-positive solved discount factor
    /// - solver errors from the pillar search, unchanged
    pub fn bootstrap(&self, helpers: &[&dyn RateHelper]) -> CurveResult<DiscountCurve> {
        if helpers.is_empty() {
            return Err(CurveError::InsufficientPoints {
                required: 1,
                got: 0,
            });
        }

        let mut ordered = helpers
            .iter()
            .map(|h| Ok((h.pillar_date(self.settlement)?, *h)))
            .collect::<CurveResult<Vec<(Date, &dyn RateHelper)>>>()?;
        ordered.sort_by_key(|(pillar, _)| *pillar);

        for pair in ordered.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(CurveError::construction(format!(
                    "{} and {} share pillar {}",
                    pair[0].1.label(),
                    pair[1].1.label(),
                    pair[0].0
                )));
            }
        }

        let mut pillars: Vec<(Date, f64)> = vec![(self.settlement, 1.0)];
        let mut last_rate = SEED_RATE;

        for (pillar, helper) in ordered {
            if pillar <= self.settlement {
                return Err(CurveError::construction(format!(
                    "{} matures on {pillar}, not after settlement {}",
                    helper.label(),
                    self.settlement
                )));
            }

            let (prev_date, prev_df) = pillars[pillars.len() - 1];
            let dt = crate::traits::year_fraction_between(prev_date, pillar);
            let guess = prev_df * (-last_rate * dt).exp();

            let target = helper.quote_value();
            let objective = |df: f64| -> CurveResult<f64> {
                let partial = DiscountCurve::from_pillars(
                    self.settlement,
                    pillars.iter().copied().chain(std::iter::once((pillar, df))),
                )?;
                helper.implied_quote(&partial)
            };

            let solved = try_secant(objective, guess, guess * 0.999, target, &self.config)
                .map_err(|e: CurveError| {
                    warn!("bootstrap failed at {}: {e}", helper.description());
                    e
                })?;
            let df = solved.root;
            if !(df > 0.0 && df.is_finite()) {
                return Err(CurveError::construction(format!(
                    "{} solved to discount factor {df}",
                    helper.description()
                )));
            }

            debug!(
                "pillar {pillar} ({}) df {df:.10} after {} iterations",
                helper.label(),
                solved.iterations
            );

            let t = crate::traits::year_fraction_between(self.settlement, pillar);
            last_rate = -df.ln() / t;
            pillars.push((pillar, df));
        }

        DiscountCurve::from_pillars(self.settlement, pillars)
    }

    /// Largest absolute gap between implied and market quotes on `curve`.
    pub fn max_residual(curve: &dyn Curve, helpers: &[&dyn RateHelper]) -> CurveResult<f64> {
        helpers.iter().try_fold(0.0_f64, |worst, h| {
            Ok(worst.max((h.implied_quote(curve)? - h.quote_value()).abs()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{BondHelper, DepositHelper, SwapHelper};
    use parcurve_core::Tenor;

    fn settle() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_single_deposit() {
        let depo = DepositHelper::new(Tenor::months(3), 0.05);
        let curve = PiecewiseBootstrap::new(settle()).bootstrap(&[&depo]).unwrap();
        assert_eq!(curve.len(), 2);
        assert!((depo.implied_quote(&curve).unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_deposits_and_swaps_reprice() {
        let d3 = DepositHelper::new(Tenor::months(3), 0.045);
        let d6 = DepositHelper::new(Tenor::months(6), 0.046);
        let s2 = SwapHelper::new(Tenor::years(2), 0.042);
        let s5 = SwapHelper::new(Tenor::years(5), 0.040);
        let s10 = SwapHelper::new(Tenor::years(10), 0.041);
        let helpers: Vec<&dyn RateHelper> = vec![&s10, &d3, &s2, &d6, &s5];

        let curve = PiecewiseBootstrap::new(settle()).bootstrap(&helpers).unwrap();
        assert_eq!(curve.len(), 6);
        assert!(PiecewiseBootstrap::max_residual(&curve, &helpers).unwrap() < 1e-10);

        let dfs: Vec<f64> = curve.pillars().map(|(_, df)| df).collect();
        assert!(dfs.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_bond_helper_reprices() {
        let d6 = DepositHelper::new(Tenor::months(6), 0.04);
        let bond = BondHelper::new(Date::from_ymd(2030, 1, 15).unwrap(), 0.045, 101.0);
        let helpers: Vec<&dyn RateHelper> = vec![&d6, &bond];
        let curve = PiecewiseBootstrap::new(settle()).bootstrap(&helpers).unwrap();
        assert!((bond.implied_quote(&curve).unwrap() - 101.0).abs() < 1e-8);
    }

    #[test]
    fn test_empty_and_duplicate_pillars() {
        assert!(matches!(
            PiecewiseBootstrap::new(settle()).bootstrap(&[]),
            Err(CurveError::InsufficientPoints { .. })
        ));

        let a = DepositHelper::new(Tenor::months(12), 0.04);
        let b = SwapHelper::new(Tenor::years(1), 0.04);
        assert!(matches!(
            PiecewiseBootstrap::new(settle()).bootstrap(&[&a, &b]),
            Err(CurveError::Construction { .. })
        ));
    }
}
