//! Core types for the codec.

use bitstream::{BitReader, BitResult, BitWriter};

/// Index of a synchronized game object.
///
/// Assigned by the game at level load and stable for the lifetime of the
/// object. Sound events carry it as 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObjectIndex(u16);

impl ObjectIndex {
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for ObjectIndex {
    fn from(index: u16) -> Self {
        Self(index)
    }
}

impl From<ObjectIndex> for u16 {
    fn from(index: ObjectIndex) -> Self {
        index.0
    }
}

impl std::fmt::Display for ObjectIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team ownership of a body.
///
/// Encoded with a variable-length code: `0` for no team, `11` for team A,
/// `10` for team B. Most bodies belong to no team, so the common case costs
/// one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    #[default]
    None,
    TeamA,
    TeamB,
}

impl Team {
    /// Bits this team takes on the wire.
    #[must_use]
    pub const fn encoded_bits(self) -> usize {
        match self {
            Self::None => 1,
            Self::TeamA | Self::TeamB => 2,
        }
    }

    pub fn encode(self, writer: &mut BitWriter) {
        match self {
            Self::None => writer.write_bool(false),
            Self::TeamA => {
                writer.write_bool(true);
                writer.write_bool(true);
            }
            Self::TeamB => {
                writer.write_bool(true);
                writer.write_bool(false);
            }
        }
    }

    pub fn decode(reader: &mut BitReader<'_>) -> BitResult<Self> {
        if !reader.read_bool()? {
            return Ok(Self::None);
        }
        if reader.read_bool()? {
            Ok(Self::TeamA)
        } else {
            Ok(Self::TeamB)
        }
    }
}
