//! Error types for bond operations.

use parcurve_core::{CoreError, Date};
use parcurve_curves::CurveError;
use parcurve_math::MathError;
use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur during bond operations.
#[derive(Error, Debug, Clone)]
pub enum BondError {
    /// Invalid bond specification.
    #[error("Invalid bond specification: {reason}")]
    InvalidSpec {
        /// Description of what's invalid.
        reason: String,
    },

    /// Invalid combination of calculation inputs.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of what's invalid.
        reason: String,
    },

    /// Pricing calculation failed.
    #[error("Pricing failed: {reason}")]
    PricingFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Settlement date is after maturity.
    #[error("Settlement date {settlement} is after maturity {maturity}")]
    SettlementAfterMaturity {
        /// Settlement date.
        settlement: Date,
        /// Maturity date.
        maturity: Date,
    },

    /// Solver failure, including non-convergence with the last iterate.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Curve error.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),
}

impl BondError {
    /// Creates an invalid specification error.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a pricing failed error.
    #[must_use]
    pub fn pricing_failed(reason: impl Into<String>) -> Self {
        Self::PricingFailed {
            reason: reason.into(),
        }
    }

    /// The last iterate of a solver that failed to converge.
    pub fn last_iterate(&self) -> Option<f64> {
        match self {
            Self::Math(e) => e.last_iterate(),
            Self::Curve(CurveError::Math(e)) => e.last_iterate(),
            _ => None,
        }
    }
}
