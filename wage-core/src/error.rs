use thiserror::Error;

/// Errors that can occur while building or editing a [`WageModel`](crate::WageModel).
///
/// Every fallible operation validates its input before touching the model, so
/// an `Err` always leaves the model in the state it had before the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WageModelError {
    /// An unrecognised level name, rate track, or override year.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A rate could not be parsed as a number, or is outside the usable range.
    #[error("invalid rate '{rate}': {reason}")]
    InvalidRate { rate: String, reason: String },

    /// An inflation override supplied a different number of years and rates.
    #[error("number of years ({years}) and rates ({rates}) to update must be the same")]
    LengthMismatch { years: usize, rates: usize },

    /// The source tables are malformed or inconsistent with each other.
    #[error("data format error: {0}")]
    DataFormat(String),
}
