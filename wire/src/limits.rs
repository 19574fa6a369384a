//! Configurable limits for bounded decoding.

use crate::section::MAX_COUNT;

/// Wire-level limits for packet decoding.
///
/// Enforced during decoding so a hostile count cannot drive a long decode
/// loop. The 9-bit counts already cap every list at 511; these limits can
/// only tighten that.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Maximum packet size in bytes.
    pub max_packet_bytes: usize,

    /// Maximum number of object snapshots in a packet.
    pub max_nodes: usize,

    /// Maximum number of projectile snapshots in a packet.
    pub max_projectiles: usize,

    /// Maximum number of sound events in a packet.
    pub max_sounds: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // a full packet of moving nodes is well under this
            max_packet_bytes: 64 * 1024,
            max_nodes: MAX_COUNT,
            max_projectiles: MAX_COUNT,
            max_sounds: MAX_COUNT,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_packet_bytes: 4096,
            max_nodes: 64,
            max_projectiles: 16,
            max_sounds: 32,
        }
    }

    /// Creates limits with no restrictions beyond the wire format itself.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_packet_bytes: usize::MAX,
            max_nodes: usize::MAX,
            max_projectiles: usize::MAX,
            max_sounds: usize::MAX,
        }
    }
}
