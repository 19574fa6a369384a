//! Packet numbers and their wraparound ordering.

use std::fmt;

use bitstream::{BitReader, BitWriter};

use crate::error::{EncodeResult, WireResult};

/// Width of the packet number field.
pub const PACKET_NUMBER_BITS: u8 = 12;

/// Packet numbers count modulo this value.
pub const MODULUS: u16 = 1 << PACKET_NUMBER_BITS;

/// A gap larger than this is read as wraparound rather than staleness.
pub const HALF_RANGE: u16 = MODULUS / 2;

/// A 12-bit wrapping packet counter.
///
/// Used for ordering and discard only. It is not a reliable sequence id: there
/// is no retransmission, and a gap of more than [`HALF_RANGE`] between two valid
/// packets is misread as staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PacketNumber(u16);

impl PacketNumber {
    /// Creates a packet number, reducing `value` modulo [`MODULUS`].
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value % MODULUS)
    }

    /// Packet number for a simulation frame.
    #[must_use]
    pub const fn from_frame(frame: u64) -> Self {
        Self((frame % MODULUS as u64) as u16)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Returns `true` if `self` should be applied after `last`.
    ///
    /// Exactly `self > last || last - self > HALF_RANGE`. Equal numbers are
    /// never newer.
    #[must_use]
    pub const fn is_newer_than(self, last: Self) -> bool {
        self.0 > last.0 || (last.0 - self.0) > HALF_RANGE
    }
}

impl fmt::Display for PacketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub fn write_packet_number(writer: &mut BitWriter, number: PacketNumber) -> EncodeResult<()> {
    writer.write_bits(u64::from(number.0), PACKET_NUMBER_BITS)?;
    Ok(())
}

pub fn read_packet_number(reader: &mut BitReader<'_>) -> WireResult<PacketNumber> {
    let raw = reader.read_bits(PACKET_NUMBER_BITS)?;
    Ok(PacketNumber(raw as u16))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeError;
    use proptest::prelude::*;

    fn n(value: u16) -> PacketNumber {
        PacketNumber::new(value)
    }

    fn successor(number: PacketNumber) -> PacketNumber {
        n(number.get() + 1)
    }

    #[test]
    fn constants() {
        assert_eq!(MODULUS, 4096);
        assert_eq!(HALF_RANGE, 2048);
    }

    #[test]
    fn new_reduces_modulo() {
        assert_eq!(n(4096).get(), 0);
        assert_eq!(n(4097).get(), 1);
    }

    #[test]
    fn from_frame_wraps() {
        assert_eq!(PacketNumber::from_frame(0).get(), 0);
        assert_eq!(PacketNumber::from_frame(4095).get(), 4095);
        assert_eq!(PacketNumber::from_frame(4096).get(), 0);
        assert_eq!(PacketNumber::from_frame(u64::MAX).get(), 4095);
    }

    #[test]
    fn successor_wraps() {
        assert_eq!(successor(n(4095)), n(0));
        assert_eq!(successor(n(10)), n(11));
    }

    #[test]
    fn stale_and_duplicate_are_not_newer() {
        let last = n(4);
        assert!(n(5).is_newer_than(last));
        assert!(!n(3).is_newer_than(last));
        assert!(!n(4).is_newer_than(last));
        assert!(n(7).is_newer_than(last));
        assert!(n(6).is_newer_than(last));
    }

    #[test]
    fn wraparound_sequence_is_monotonic() {
        assert!(n(0).is_newer_than(n(4095)));
        assert!(n(1).is_newer_than(n(0)));
        // a forward gap of 4095 is larger, not wrapped; only the backward
        // direction is tested against HALF_RANGE
        assert!(n(4095).is_newer_than(n(0)));
    }

    #[test]
    fn half_range_boundary() {
        // gap of exactly 2048 reads as stale, 2049 as wrapped
        assert!(!n(0).is_newer_than(n(2048)));
        assert!(n(0).is_newer_than(n(2049)));
    }

    #[test]
    fn any_larger_number_is_newer() {
        // a big forward jump still counts as newer
        assert!(n(4000).is_newer_than(n(1)));
    }

    #[test]
    fn packet_number_roundtrip() {
        let mut writer = BitWriter::new();
        write_packet_number(&mut writer, n(0xABC)).unwrap();
        assert_eq!(writer.bits_written(), 12);
        let bytes = writer.finish();
        assert_eq!(bytes, vec![0xAB, 0xC0]);
        let mut reader = BitReader::new(&bytes);
        assert_eq!(read_packet_number(&mut reader).unwrap(), n(0xABC));
    }

    #[test]
    fn packet_number_truncated() {
        let mut reader = BitReader::new(&[0xFF]);
        assert!(matches!(
            read_packet_number(&mut reader),
            Err(DecodeError::Bits(_))
        ));
    }

    #[test]
    fn display() {
        assert_eq!(n(42).to_string(), "#42");
    }

    proptest! {
        #[test]
        fn prop_successor_is_newer(value in 0u16..MODULUS) {
            let current = n(value);
            prop_assert!(successor(current).is_newer_than(current));
            prop_assert!(!current.is_newer_than(successor(current)) || value == MODULUS - 1);
        }
    }
}
