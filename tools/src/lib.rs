//! Introspection and debugging tools for shotsync physics packets.
//!
//! This crate provides utilities for inspecting captured packets:
//!
//! - Summarize a packet by list: counts, liveness, and bit cost
//! - Decode a packet into JSON or a readable listing
//! - Print the protocol fingerprint and field contract
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see where the bits go.

use std::fmt::Write as _;

use codec::{CodecResult, CollisionSoundData, Limits, PhysicsNodeData, PhysicsSyncData};
use serde::Serialize;
use wire::Section;

/// Size and liveness summary of one packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub packet_number: u16,
    pub byte_len: usize,
    pub bit_len: usize,
    pub sections: Vec<SectionReport>,
}

/// One list of a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    pub section: &'static str,
    pub count: usize,
    /// Entries with the alive bit set; equals `count` for sounds.
    pub alive: usize,
    /// Entries carrying velocities.
    pub moving: usize,
    /// Bits spent on entries, excluding the count.
    pub bits: usize,
}

/// A decoded packet with its captured size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPacket {
    pub byte_len: usize,
    #[serde(flatten)]
    pub packet: PhysicsSyncData,
}

pub fn inspect_packet(bytes: &[u8], limits: &Limits) -> CodecResult<InspectReport> {
    let packet = PhysicsSyncData::decode_with_limits(bytes, limits)?;
    let sections = Section::ALL
        .into_iter()
        .map(|section| match section {
            Section::Nodes => node_section(section, &packet.nodes),
            Section::Projectiles => node_section(section, &packet.projectiles),
            Section::Sounds => SectionReport {
                section: section.name(),
                count: packet.sounds.len(),
                alive: packet.sounds.len(),
                moving: 0,
                bits: packet.sounds.len() * CollisionSoundData::ENCODED_BITS,
            },
        })
        .collect();
    Ok(InspectReport {
        packet_number: packet.packet_number.get(),
        byte_len: bytes.len(),
        bit_len: packet.encoded_bits(),
        sections,
    })
}

fn node_section(section: Section, nodes: &[PhysicsNodeData]) -> SectionReport {
    SectionReport {
        section: section.name(),
        count: nodes.len(),
        alive: nodes.iter().filter(|node| node.is_alive).count(),
        moving: nodes
            .iter()
            .filter(|node| node.is_alive && node.is_moving)
            .count(),
        bits: nodes.iter().map(PhysicsNodeData::encoded_bits).sum(),
    }
}

pub fn decode_packet_json(bytes: &[u8], limits: &Limits) -> CodecResult<DecodedPacket> {
    let packet = PhysicsSyncData::decode_with_limits(bytes, limits)?;
    Ok(DecodedPacket {
        byte_len: bytes.len(),
        packet,
    })
}

#[must_use]
pub fn format_inspect_report(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "packet #{}: {} bytes ({} bits)",
        report.packet_number, report.byte_len, report.bit_len
    );
    for section in &report.sections {
        let _ = writeln!(
            out,
            "  {}: {} entries, {} alive, {} moving ({} bits)",
            section.section, section.count, section.alive, section.moving, section.bits
        );
    }
    out
}

#[must_use]
pub fn format_decode_pretty(decoded: &DecodedPacket) -> String {
    let packet = &decoded.packet;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "packet {} ({} bytes)",
        packet.packet_number, decoded.byte_len
    );
    for (label, nodes) in [("nodes", &packet.nodes), ("projectiles", &packet.projectiles)] {
        let _ = writeln!(out, "{label}: {}", nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            let _ = writeln!(out, "  [{slot}] {}", describe_node(node));
        }
    }
    let _ = writeln!(out, "sounds: {}", packet.sounds.len());
    for sound in &packet.sounds {
        let _ = writeln!(
            out,
            "  object {} note {} velocity {} mod {:.3}",
            sound.object_index, sound.event.note, sound.event.velocity, sound.event.mod_wheel
        );
    }
    out
}

fn describe_node(node: &PhysicsNodeData) -> String {
    if !node.is_alive {
        return "dead".to_owned();
    }
    let p = node.position;
    let q = node.orientation;
    let mut line = format!(
        "{:?} pos ({:.3}, {:.3}, {:.3}) rot ({:.3}, {:.3}, {:.3}, {:.3})",
        node.team, p.x, p.y, p.z, q.x, q.y, q.z, q.w
    );
    if node.is_moving {
        let v = node.velocity;
        let w = node.angular_velocity;
        let _ = write!(
            line,
            " vel ({:.3}, {:.3}, {:.3}) ang ({:.3}, {:.3}, {:.3}; {:.3})",
            v.x, v.y, v.z, w.x, w.y, w.z, w.w
        );
    } else {
        line.push_str(" at rest");
    }
    line
}

/// The protocol fingerprint followed by every compressor and field width.
#[must_use]
pub fn format_fingerprint() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "protocol hash: 0x{:016x}", schema::protocol_hash());
    for (name, compressor) in schema::protocol::COMPRESSORS {
        let _ = writeln!(
            out,
            "  {name}: [{}, {}] @ {} bits",
            compressor.min(),
            compressor.max(),
            compressor.bits()
        );
    }
    for (name, bits) in schema::protocol::INTEGER_FIELDS {
        let _ = writeln!(out, "  {name}: {bits} bits");
    }
    out
}
