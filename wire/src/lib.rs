//! Packet numbering and list framing for shotsync physics packets.
//!
//! This crate handles the structural parts of the wire format: the wrapping
//! 12-bit packet number, the 9-bit list counts, and limit enforcement. It does
//! not know about physics snapshots, only the shape of a packet.
//!
//! ```text
//! packet_number  : 12 bits (mod 4096)
//! node_count     :  9 bits, then node_count snapshots
//! proj_count     :  9 bits, then proj_count snapshots
//! sound_count    :  9 bits, then sound_count events
//! ```
//!
//! # Design Principles
//!
//! - **Datagram framing** - No whole-packet length; the transport delivers whole packets.
//! - **Bounded decoding** - Counts are validated against [`Limits`] before iteration.
//! - **No domain knowledge** - This crate handles framing, not physics.

mod error;
mod header;
mod limits;
mod section;

pub use error::{DecodeError, EncodeError, EncodeResult, LimitKind, WireResult};
pub use header::{
    read_packet_number, write_packet_number, PacketNumber, HALF_RANGE, MODULUS,
    PACKET_NUMBER_BITS,
};
pub use limits::Limits;
pub use section::{read_count, write_count, Section, COUNT_BITS, MAX_COUNT};
