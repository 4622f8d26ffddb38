//! Linear interpolation.

use super::{segment, validate, Interpolator};
use crate::error::{MathError, MathResult};

/// Piecewise-linear interpolation.
///
/// Extrapolation, when enabled, is flat: values beyond the end nodes are the
/// end values. A single node gives a constant function.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator from strictly increasing `xs`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate(&xs, &ys, 1)?;
        Ok(Self {
            xs,
            ys,
            allow_extrapolation: false,
        })
    }

    /// Enables flat extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    fn check_range(&self, x: f64) -> MathResult<()> {
        if !self.allow_extrapolation && !self.in_range(x) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            });
        }
        Ok(())
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let n = self.xs.len();
        if n == 1 || x <= self.xs[0] {
            return Ok(self.ys[0]);
        }
        if x >= self.xs[n - 1] {
            return Ok(self.ys[n - 1]);
        }

        let i = segment(&self.xs, x);
        let w = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(self.ys[i] + w * (self.ys[i + 1] - self.ys[i]))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let n = self.xs.len();
        if n == 1 || x < self.xs[0] || x > self.xs[n - 1] {
            return Ok(0.0);
        }
        let i = segment(&self.xs, x);
        Ok((self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_basic() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 3.0], vec![0.0, 1.0, 2.0]).unwrap();
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 0.5);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 1.5);
        assert_relative_eq!(interp.derivative(2.0).unwrap(), 0.5);
    }

    #[test]
    fn test_flat_extrapolation() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.2, 0.3])
            .unwrap()
            .with_extrapolation();
        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.2);
        assert_relative_eq!(interp.interpolate(10.0).unwrap(), 0.3);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.2, 0.3]).unwrap();
        assert!(matches!(
            interp.interpolate(2.5),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
    }
}
