//! Log-linear interpolation.
//!
//! Interpolates `ln(y)` linearly. On discount factors this is piecewise
//! constant continuously-compounded forwards; extrapolation continues the
//! last segment's forward (flat-forward).

use super::{segment, validate, Interpolator};
use crate::error::{MathError, MathResult};

/// Log-linear interpolation between strictly positive values.
///
/// ```rust
/// use parcurve_math::interpolation::{Interpolator, LogLinearInterpolator};
///
/// let interp = LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.95]).unwrap();
/// let df = interp.interpolate(0.5).unwrap();
/// assert!((df - 0.95_f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// Requires at least two nodes, strictly increasing `xs` and positive `ys`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate(&xs, &ys, 2)?;

        let mut log_ys = Vec::with_capacity(ys.len());
        for (i, &y) in ys.iter().enumerate() {
            if y <= 0.0 || !y.is_finite() {
                return Err(MathError::invalid_input(format!(
                    "y[{i}] = {y} is not positive; log-linear requires positive values"
                )));
            }
            log_ys.push(y.ln());
        }

        Ok(Self {
            xs,
            ys,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables flat-forward extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Returns the node values.
    #[must_use]
    pub fn y_values(&self) -> &[f64] {
        &self.ys
    }

    /// Returns the node abscissae.
    #[must_use]
    pub fn x_values(&self) -> &[f64] {
        &self.xs
    }

    fn slope(&self, i: usize) -> f64 {
        (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        if !self.allow_extrapolation && !self.in_range(x) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            });
        }

        let i = segment(&self.xs, x);
        Ok((self.log_ys[i] + self.slope(i) * (x - self.xs[i])).exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let y = self.interpolate(x)?;
        Ok(y * self.slope(segment(&self.xs, x)))
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
