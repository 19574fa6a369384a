//! One-shot collision sound events.

use bitstream::{BitReader, BitResult, BitWriter};
use schema::protocol::{MIDI_BITS, MIDI_MAX, MOD_WHEEL, OBJECT_INDEX_BITS};

use crate::ObjectIndex;

/// A sampler trigger produced by a physics collision.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionEvent {
    /// MIDI note, `0..=127`.
    pub note: u8,
    /// MIDI velocity, `0..=127`.
    pub velocity: u8,
    /// Modulation amount in `0.0..=1.0`.
    pub mod_wheel: f32,
}

impl CollisionEvent {
    #[must_use]
    pub const fn new(note: u8, velocity: u8, mod_wheel: f32) -> Self {
        Self {
            note,
            velocity,
            mod_wheel,
        }
    }
}

/// A collision sound attached to the object that made it.
///
/// Edge-triggered: it is delivered in exactly one packet and cleared from
/// every buffer once played.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionSoundData {
    pub object_index: ObjectIndex,
    pub event: CollisionEvent,
}

impl CollisionSoundData {
    /// Bits every sound event takes on the wire.
    pub const ENCODED_BITS: usize =
        OBJECT_INDEX_BITS as usize + 2 * MIDI_BITS as usize + MOD_WHEEL.bits() as usize;

    #[must_use]
    pub const fn new(object_index: ObjectIndex, event: CollisionEvent) -> Self {
        Self {
            object_index,
            event,
        }
    }

    /// Writes the event. Note and velocity above 127 are clamped.
    pub fn encode(&self, writer: &mut BitWriter) -> BitResult<()> {
        writer.write_bits(u64::from(self.object_index.raw()), OBJECT_INDEX_BITS)?;
        writer.write_bits(u64::from(self.event.note.min(MIDI_MAX)), MIDI_BITS)?;
        writer.write_bits(u64::from(self.event.velocity.min(MIDI_MAX)), MIDI_BITS)?;
        MOD_WHEEL.write(self.event.mod_wheel, writer)
    }

    pub fn decode(reader: &mut BitReader<'_>) -> BitResult<Self> {
        let object_index = ObjectIndex::new(reader.read_bits(OBJECT_INDEX_BITS)? as u16);
        let note = reader.read_bits(MIDI_BITS)? as u8;
        let velocity = reader.read_bits(MIDI_BITS)? as u8;
        let mod_wheel = MOD_WHEEL.read(reader)?;
        Ok(Self::new(
            object_index,
            CollisionEvent::new(note, velocity, mod_wheel),
        ))
    }
}
