//! Error types for the core crate.
//!
//! Dates, tenors and calendars report failures through [`CoreError`].

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for date, tenor and calendar operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A period expression that cannot be used for the requested operation.
    #[error("Invalid tenor '{tenor}': {reason}")]
    InvalidTenor {
        /// The tenor text.
        tenor: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Day count calculation error.
    #[error("Day count error: {reason}")]
    DayCountError {
        /// Description of the error.
        reason: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },

    /// A value that cannot be parsed into a convention or identifier.
    #[error("Cannot parse '{value}' as {kind}")]
    ParseError {
        /// The rejected input.
        value: String,
        /// What the input was expected to be.
        kind: &'static str,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(tenor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTenor {
            tenor: tenor.into(),
            reason: reason.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(value: impl Into<String>, kind: &'static str) -> Self {
        Self::ParseError {
            value: value.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = CoreError::parse("ACT/999", "day count convention");
        assert_eq!(
            err.to_string(),
            "Cannot parse 'ACT/999' as day count convention"
        );
    }
}
