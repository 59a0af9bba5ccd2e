//! Error types for probability ramp construction.

use thiserror::Error;

/// Result type alias for ramp construction.
pub type RampResult<T> = Result<T, RampError>;

/// Errors raised while building a [`ProbabilityRamp`](crate::ProbabilityRamp).
///
/// A ramp that was built successfully never fails afterwards, so every
/// variant here describes a bad argument at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RampError {
    #[error("{name} out of range: {value}")]
    OutOfRange { name: &'static str, value: String },

    #[error("minimum chance {minimum} is greater than maximum chance {maximum}")]
    InvalidConfiguration { minimum: f64, maximum: f64 },

    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
}

impl RampError {
    pub(crate) fn out_of_range(name: &'static str, value: impl ToString) -> Self {
        Self::OutOfRange {
            name,
            value: value.to_string(),
        }
    }

    /// Whether this error reports an argument outside its allowed range.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}
