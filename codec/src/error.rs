//! Error types for codec operations.

use std::fmt;

use bitstream::BitError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding physics packets.
///
/// Every decode failure means "drop this packet"; none of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// Bitstream error inside a snapshot body.
    Bitstream(BitError),

    /// Wire framing error while decoding.
    Wire(wire::DecodeError),

    /// Wire framing error while encoding.
    Encode(wire::EncodeError),

    /// Whole bytes were left over after the last list.
    TrailingData { remaining_bits: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(err) => write!(f, "bitstream error: {err}"),
            Self::Wire(err) => write!(f, "wire decode error: {err}"),
            Self::Encode(err) => write!(f, "wire encode error: {err}"),
            Self::TrailingData { remaining_bits } => {
                write!(f, "trailing data after packet: {remaining_bits} bits")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(err) => Some(err),
            Self::Wire(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::TrailingData { .. } => None,
        }
    }
}

impl From<BitError> for CodecError {
    fn from(err: BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::Encode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_trailing() {
        let err = CodecError::TrailingData { remaining_bits: 16 };
        assert!(err.to_string().contains("16 bits"));
    }

    #[test]
    fn error_from_bit_error() {
        let err: CodecError = BitError::UnexpectedEof {
            requested: 12,
            available: 3,
        }
        .into();
        assert!(matches!(err, CodecError::Bitstream(_)));
        assert!(err.to_string().contains("bitstream"));
    }

    #[test]
    fn error_from_wire() {
        let err: CodecError = wire::DecodeError::LimitsExceeded {
            kind: wire::LimitKind::PacketBytes,
            limit: 8,
            actual: 9,
        }
        .into();
        assert!(matches!(err, CodecError::Wire(_)));
    }
}
