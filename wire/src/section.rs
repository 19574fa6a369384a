//! List sections and their 9-bit counts.

use std::fmt;

use bitstream::{BitReader, BitWriter};

use crate::error::{DecodeError, EncodeError, EncodeResult, LimitKind, WireResult};
use crate::Limits;

/// Width of every list count.
pub const COUNT_BITS: u8 = 9;

/// Largest list a packet can carry.
pub const MAX_COUNT: usize = (1 << COUNT_BITS) - 1;

/// The three lists of a packet, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Nodes,
    Projectiles,
    Sounds,
}

impl Section {
    /// All sections in the order they appear on the wire.
    pub const ALL: [Self; 3] = [Self::Nodes, Self::Projectiles, Self::Sounds];

    /// The decode limit configured for this section.
    #[must_use]
    pub const fn limit(self, limits: &Limits) -> usize {
        match self {
            Self::Nodes => limits.max_nodes,
            Self::Projectiles => limits.max_projectiles,
            Self::Sounds => limits.max_sounds,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Projectiles => "projectiles",
            Self::Sounds => "sounds",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Writes the element count that precedes a list.
pub fn write_count(writer: &mut BitWriter, section: Section, count: usize) -> EncodeResult<()> {
    if count > MAX_COUNT {
        return Err(EncodeError::CountOverflow { section, count });
    }
    writer.write_bits(count as u64, COUNT_BITS)?;
    Ok(())
}

/// Reads a list count, rejecting it if it exceeds the section limit.
pub fn read_count(
    reader: &mut BitReader<'_>,
    section: Section,
    limits: &Limits,
) -> WireResult<usize> {
    let count = reader.read_bits(COUNT_BITS)? as usize;
    let limit = section.limit(limits);
    if count > limit {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::SectionCount(section),
            limit,
            actual: count,
        });
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_count_is_511() {
        assert_eq!(MAX_COUNT, 511);
    }

    #[test]
    fn wire_order() {
        assert_eq!(
            Section::ALL,
            [Section::Nodes, Section::Projectiles, Section::Sounds]
        );
    }

    #[test]
    fn count_roundtrip_at_max() {
        let mut writer = BitWriter::new();
        write_count(&mut writer, Section::Nodes, MAX_COUNT).unwrap();
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        let count = read_count(&mut reader, Section::Nodes, &Limits::default()).unwrap();
        assert_eq!(count, MAX_COUNT);
    }

    #[test]
    fn count_overflow_rejected() {
        let mut writer = BitWriter::new();
        let err = write_count(&mut writer, Section::Sounds, 512).unwrap_err();
        assert_eq!(
            err,
            EncodeError::CountOverflow {
                section: Section::Sounds,
                count: 512
            }
        );
        assert_eq!(writer.bits_written(), 0);
    }

    #[test]
    fn count_above_limit_rejected() {
        let mut writer = BitWriter::new();
        write_count(&mut writer, Section::Projectiles, 20).unwrap();
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        let limits = Limits {
            max_projectiles: 10,
            ..Limits::default()
        };
        let err = read_count(&mut reader, Section::Projectiles, &limits).unwrap_err();
        assert_eq!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::SectionCount(Section::Projectiles),
                limit: 10,
                actual: 20,
            }
        );
    }

    #[test]
    fn section_limit_lookup() {
        let limits = Limits::for_testing();
        assert_eq!(Section::Nodes.limit(&limits), limits.max_nodes);
        assert_eq!(Section::Projectiles.limit(&limits), limits.max_projectiles);
        assert_eq!(Section::Sounds.limit(&limits), limits.max_sounds);
    }
}
