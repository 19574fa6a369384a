//! Physics snapshot and packet encoding/decoding for shotsync.
//!
//! This is the main codec crate that ties together bitstream, wire, and schema
//! to turn replicated physics state into packets and back.
//!
//! # Features
//!
//! - Per-body snapshots ([`PhysicsNodeData`]) with smallest-three orientation
//! - One-shot collision sound events ([`CollisionSoundData`])
//! - The packet container ([`PhysicsSyncData`]) with bounded decoding
//!
//! # Design Principles
//!
//! - **Symmetric** - Every `encode` has a `decode` reading the same fields in the same order.
//! - **Never panics on input** - Malformed packets fail with a [`CodecError`].
//! - **Lossy but bounded** - Floats are clamped by the protocol compressors.

mod error;
mod node;
mod packet;
mod sound;
mod types;

pub use error::{CodecError, CodecResult};
pub use node::PhysicsNodeData;
pub use packet::PhysicsSyncData;
pub use sound::{CollisionEvent, CollisionSoundData};
pub use types::{ObjectIndex, Team};
pub use wire::{Limits, PacketNumber};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = ObjectIndex::new(0);
        let _ = Team::None;
        let _ = PhysicsNodeData::dead();
        let _ = PhysicsSyncData::empty(PacketNumber::new(0));
        let _ = Limits::default();
        let _: CodecResult<()> = Ok(());
    }

    #[test]
    fn limits_reexported() {
        let limits = Limits::default();
        assert!(limits.max_packet_bytes > 0);
    }
}
