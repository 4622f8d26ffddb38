//! Hull-White one-factor short rate model.
//!
//! The Hull-White model is defined by:
//!
//! ```text
//! dr = (θ(t) - a*r)dt + σ*dW
//! ```
//!
//! Where:
//! - `a` = mean reversion speed
//! - `σ` = volatility
//! - `θ(t)` = time-dependent drift calibrated to fit the yield curve
//!
//! On the lattice the drift is the per-step `alpha` and the short rate is
//! `alpha + x`. Rates can go negative.

use super::ShortRateModel;

/// Hull-White one-factor short rate model (normal rates).
///
/// # Example
///
/// ```rust
/// use parcurve_bonds::options::{HullWhite, ShortRateModel};
///
/// // 3% mean reversion, 100bp normal vol
/// let model = HullWhite::new(0.03, 0.01);
/// assert_eq!(model.short_rate(0.04, 0.005), 0.045);
/// ```
///
/// # Parameters
///
/// - **Mean Reversion (a)**: Speed at which rates revert to long-term level.
///   Higher values mean less rate dispersion at long horizons.
///
/// - **Volatility (σ)**: Instantaneous volatility of the short rate in rate
///   units (0.01 = 100bp per year).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullWhite {
    /// Mean reversion speed (a).
    mean_reversion: f64,

    /// Short rate volatility (σ).
    volatility: f64,
}

impl HullWhite {
    /// Creates a new Hull-White model with the given parameters.
    #[must_use]
    pub fn new(mean_reversion: f64, volatility: f64) -> Self {
        Self {
            mean_reversion: mean_reversion.max(0.0),
            volatility: volatility.abs(),
        }
    }

    /// B(t,T) = (1 - exp(-a*(T-t))) / a, the bond price sensitivity to the short rate.
    #[must_use]
    pub fn b_factor(&self, t: f64, big_t: f64) -> f64 {
        let a = self.mean_reversion;
        let tau = big_t - t;
        if tau <= 0.0 {
            return 0.0;
        }
        if a < 1e-12 {
            return tau;
        }
        (1.0 - (-a * tau).exp()) / a
    }
}

impl ShortRateModel for HullWhite {
    fn name(&self) -> &'static str {
        "Hull-White"
    }

    fn volatility(&self) -> f64 {
        self.volatility
    }

    fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    fn short_rate(&self, alpha: f64, x: f64) -> f64 {
        alpha + x
    }

    fn alpha_seed(&self, rate: f64) -> f64 {
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hull_white_creation() {
        let model = HullWhite::new(0.03, -0.01);
        assert_relative_eq!(model.mean_reversion(), 0.03);
        assert_relative_eq!(model.volatility(), 0.01);
        assert_eq!(model.name(), "Hull-White");
    }

    #[test]
    fn test_b_factor() {
        let model = HullWhite::new(0.05, 0.01);

        // B(0, 1) = (1 - exp(-0.05)) / 0.05 ≈ 0.975
        assert_relative_eq!(model.b_factor(0.0, 1.0), 0.975_4, epsilon = 1e-4);
        assert_eq!(model.b_factor(1.0, 1.0), 0.0);
        assert_relative_eq!(HullWhite::new(0.0, 0.01).b_factor(0.0, 2.0), 2.0);
    }

    #[test]
    fn test_rates_can_go_negative() {
        let model = HullWhite::new(0.03, 0.01);
        assert!(model.short_rate(0.002, -0.01) < 0.0);
    }
}
