//! Black-Karasinski lognormal short rate model.
//!
//! ```text
//! d ln r = (θ(t) - a ln r)dt + σ dW
//! ```
//!
//! On the lattice the short rate is `exp(alpha + x)`, so rates stay positive
//! and `σ` is a proportional volatility (0.10 = 10%).

use super::ShortRateModel;

/// Black-Karasinski short rate model.
///
/// # Example
///
/// ```rust
/// use parcurve_bonds::options::{BlackKarasinski, ShortRateModel};
///
/// let model = BlackKarasinski::new(1e-7, 0.10);
/// let alpha = model.alpha_seed(0.04);
/// assert!((model.short_rate(alpha, 0.0) - 0.04).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackKarasinski {
    mean_reversion: f64,
    volatility: f64,
}

impl BlackKarasinski {
    /// Creates a model with mean reversion `a` and lognormal volatility `σ`.
    #[must_use]
    pub fn new(mean_reversion: f64, volatility: f64) -> Self {
        Self {
            mean_reversion: mean_reversion.max(0.0),
            volatility: volatility.abs(),
        }
    }
}

impl ShortRateModel for BlackKarasinski {
    fn name(&self) -> &'static str {
        "Black-Karasinski"
    }

    fn volatility(&self) -> f64 {
        self.volatility
    }

    fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    fn short_rate(&self, alpha: f64, x: f64) -> f64 {
        (alpha + x).exp()
    }

    fn alpha_seed(&self, rate: f64) -> f64 {
        rate.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lognormal_spacing() {
        let model = BlackKarasinski::new(1e-7, 0.2);
        let dx = model.state_step(0.25);
        let alpha = model.alpha_seed(0.05);
        let ratio = model.short_rate(alpha, dx) / model.short_rate(alpha, 0.0);
        assert_relative_eq!(ratio, (0.2 * 0.5_f64).exp(), epsilon = 1e-8);
    }
}
