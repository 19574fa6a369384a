//! The physics sync packet container.

use bitstream::{BitReader, BitWriter};
use wire::{
    read_count, read_packet_number, write_count, write_packet_number, DecodeError, LimitKind,
    Limits, PacketNumber, Section, COUNT_BITS, PACKET_NUMBER_BITS,
};

use crate::error::{CodecError, CodecResult};
use crate::{CollisionSoundData, PhysicsNodeData};

/// One network message: a packet number and three lists of snapshots.
///
/// ```text
/// packet_number(12) node_count(9) nodes.. projectile_count(9) projectiles.. sound_count(9) sounds..
/// ```
///
/// There is no whole-packet length; the transport delivers whole datagrams.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicsSyncData {
    pub packet_number: PacketNumber,
    pub nodes: Vec<PhysicsNodeData>,
    pub projectiles: Vec<PhysicsNodeData>,
    pub sounds: Vec<CollisionSoundData>,
}

impl PhysicsSyncData {
    /// A packet with no snapshots.
    #[must_use]
    pub const fn empty(packet_number: PacketNumber) -> Self {
        Self {
            packet_number,
            nodes: Vec::new(),
            projectiles: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// Exact number of bits [`encode`](Self::encode) writes, before padding.
    #[must_use]
    pub fn encoded_bits(&self) -> usize {
        PACKET_NUMBER_BITS as usize
            + 3 * COUNT_BITS as usize
            + self
                .nodes
                .iter()
                .chain(&self.projectiles)
                .map(PhysicsNodeData::encoded_bits)
                .sum::<usize>()
            + self.sounds.len() * CollisionSoundData::ENCODED_BITS
    }

    /// Encodes the packet into a fresh byte buffer.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_bits().div_ceil(8));
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Appends the encoded packet to `out`, returning the number of bytes written.
    ///
    /// On error `out` is left unchanged.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> CodecResult<usize> {
        let mut writer = BitWriter::with_capacity(self.encoded_bits().div_ceil(8));
        write_packet_number(&mut writer, self.packet_number)?;

        write_count(&mut writer, Section::Nodes, self.nodes.len())?;
        for node in &self.nodes {
            node.encode(&mut writer)?;
        }
        write_count(&mut writer, Section::Projectiles, self.projectiles.len())?;
        for projectile in &self.projectiles {
            projectile.encode(&mut writer)?;
        }
        write_count(&mut writer, Section::Sounds, self.sounds.len())?;
        for sound in &self.sounds {
            sound.encode(&mut writer)?;
        }

        let start = out.len();
        writer.finish_into(out);
        Ok(out.len() - start)
    }

    /// Decodes a packet with [`Limits::default`].
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Self::decode_with_limits(bytes, &Limits::default())
    }

    /// Decodes a packet, enforcing `limits` before any list is read.
    ///
    /// Up to seven bits of zero padding may follow the last list; anything
    /// longer is [`CodecError::TrailingData`].
    pub fn decode_with_limits(bytes: &[u8], limits: &Limits) -> CodecResult<Self> {
        if bytes.len() > limits.max_packet_bytes {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::PacketBytes,
                limit: limits.max_packet_bytes,
                actual: bytes.len(),
            }
            .into());
        }

        let mut reader = BitReader::new(bytes);
        let packet_number = read_packet_number(&mut reader)?;

        let count = read_count(&mut reader, Section::Nodes, limits)?;
        let mut nodes = Vec::with_capacity(count);
        for _ in 0..count {
            nodes.push(PhysicsNodeData::decode(&mut reader)?);
        }
        let count = read_count(&mut reader, Section::Projectiles, limits)?;
        let mut projectiles = Vec::with_capacity(count);
        for _ in 0..count {
            projectiles.push(PhysicsNodeData::decode(&mut reader)?);
        }
        let count = read_count(&mut reader, Section::Sounds, limits)?;
        let mut sounds = Vec::with_capacity(count);
        for _ in 0..count {
            sounds.push(CollisionSoundData::decode(&mut reader)?);
        }

        let remaining_bits = reader.bits_remaining();
        if remaining_bits >= 8 {
            return Err(CodecError::TrailingData { remaining_bits });
        }

        Ok(Self {
            packet_number,
            nodes,
            projectiles,
            sounds,
        })
    }
}
