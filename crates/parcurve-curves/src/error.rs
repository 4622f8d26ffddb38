//! Error types for curve operations.
//!
//! Construction, calibration and lookup failures are reported through
//! [`CurveError`]. Solver and date errors from the lower crates convert in
//! unchanged.

use parcurve_core::{CoreError, Date};
use parcurve_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// The curve inputs cannot produce a sensible curve.
    #[error("Curve construction error: {reason}")]
    Construction {
        /// Description of the degenerate input.
        reason: String,
    },

    /// The curve has not been calibrated yet (or was reset).
    #[error("Curve '{label}' is not calibrated")]
    NotCalibrated {
        /// Label of the curve.
        label: String,
    },

    /// Invalid calibration instrument.
    #[error("Invalid instrument: {reason}")]
    InvalidInstrument {
        /// Description of what's wrong with the instrument.
        reason: String,
    },

    /// A quote required for the operation is absent.
    #[error("Missing quote for tenor {tenor}")]
    MissingQuote {
        /// The tenor label.
        tenor: String,
    },

    /// A pillar could not be solved.
    #[error("Calibration failed for {instrument}: {reason}")]
    CalibrationFailure {
        /// Description of the instrument being solved.
        instrument: String,
        /// Description of failure.
        reason: String,
    },

    /// Not enough data points to build a curve.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// No curve registered under the key.
    #[error("Curve not found: {key}")]
    CurveNotFound {
        /// The registry key.
        key: String,
    },

    /// A query past the last pillar with extrapolation disabled.
    #[error("Extrapolation not allowed: {date} is beyond the last pillar {max_date}")]
    ExtrapolationNotAllowed {
        /// The requested date.
        date: Date,
        /// Last pillar date.
        max_date: Date,
    },

    /// Numerical failure in a solver or interpolator.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Date, tenor or calendar failure.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates a construction error.
    #[must_use]
    pub fn construction(reason: impl Into<String>) -> Self {
        Self::Construction {
            reason: reason.into(),
        }
    }

    /// Creates a not-calibrated error.
    #[must_use]
    pub fn not_calibrated(label: impl Into<String>) -> Self {
        Self::NotCalibrated {
            label: label.into(),
        }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            reason: reason.into(),
        }
    }

    /// Creates a calibration failure error.
    #[must_use]
    pub fn calibration_failed(instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CalibrationFailure {
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// Creates a curve-not-found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::CurveNotFound { key: key.into() }
    }
}
