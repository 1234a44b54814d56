//! Error types for value conversions in mycontroller-types.

use thiserror::Error;

use crate::units::TimeUnit;

/// Errors raised when converting between display values and stored values.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// The display value is NaN or infinite.
    #[error("Value is not a finite number: {0}")]
    NotFinite(f64),

    /// The display value is below zero.
    #[error("Value must not be negative: {0}")]
    Negative(f64),

    /// The display value is too large for the stored representation.
    #[error("Value out of range: {0}")]
    OutOfRange(f64),

    /// The converted value does not fit the stored representation.
    #[error("Value {value} {unit} is too large to store")]
    Overflow {
        /// The value that was being converted.
        value: u64,
        /// The unit of that value.
        unit: TimeUnit,
    },

    /// A duration string could not be parsed.
    #[error("Invalid duration '{0}' (expected e.g. 500ms, 30s, 15m, 12h, 7d)")]
    InvalidDuration(String),
}

/// Result type alias using mycontroller-types' ConversionError type.
pub type ConversionResult<T> = std::result::Result<T, ConversionError>;
