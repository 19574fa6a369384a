//! Compressor validation errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building a compressor at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaError {
    /// Bit width outside `1..=32`.
    InvalidBitWidth { bits: u8 },

    /// Range bounds are not finite or `min >= max`.
    InvalidRange { min: f32, max: f32 },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitWidth { bits } => {
                write!(f, "invalid compressor bit width {bits}, expected 1..=32")
            }
            Self::InvalidRange { min, max } => {
                write!(f, "invalid compressor range [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
