//! Error types for the analytics engine.
//!
//! Swap, asset swap and volatility failures are reported through
//! [`AnalyticsError`]. Errors from the lower crates convert in unchanged, so
//! a solver that runs out of iterations still reports its last iterate.

use parcurve_bonds::BondError;
use parcurve_core::CoreError;
use parcurve_curves::CurveError;
use parcurve_math::MathError;
use thiserror::Error;

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Error type for analytics operations.
#[derive(Debug, Clone, Error)]
pub enum AnalyticsError {
    /// Invalid input parameter or combination of inputs.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of what's invalid.
        reason: String,
    },

    /// Swap or swaption could not be constructed.
    #[error("invalid swap: {reason}")]
    InvalidSwap {
        /// Description of what's invalid.
        reason: String,
    },

    /// Not enough points for a volatility curve.
    #[error("volatility curve needs at least {required} points, got {got}")]
    InsufficientVolPoints {
        /// Minimum number of points.
        required: usize,
        /// Points supplied.
        got: usize,
    },

    /// Bond error.
    #[error("bond error: {0}")]
    Bond(#[from] BondError),

    /// Curve error.
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),

    /// Math/solver error, including non-convergence with the last iterate.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Date or calendar error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl AnalyticsError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an invalid swap error.
    #[must_use]
    pub fn invalid_swap(reason: impl Into<String>) -> Self {
        Self::InvalidSwap {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::invalid_input("need two of price, spread and vol");
        assert!(err.to_string().contains("two of price"));

        let err = AnalyticsError::InsufficientVolPoints {
            required: 1,
            got: 0,
        };
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_solver_error_keeps_last_iterate() {
        let err: AnalyticsError = MathError::convergence_failed(24, 0.0123, 1e-3).into();
        match err {
            AnalyticsError::Math(inner) => assert_eq!(inner.last_iterate(), Some(0.0123)),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
