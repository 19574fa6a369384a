//! The field contract shared by every peer.
//!
//! Both ends of a session must use these exact values; a mismatch decodes
//! without error into wrong numbers. Compare [`protocol_hash`](crate::protocol_hash)
//! values when in doubt.

use std::f32::consts::FRAC_1_SQRT_2;

use crate::FloatCompressor;

/// World-space position, per axis.
pub const POSITION: FloatCompressor = FloatCompressor::new(-80.0, 80.0, 16);

/// The three smallest components of a unit quaternion lie within ±1/√2.
pub const ORIENTATION: FloatCompressor = FloatCompressor::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2, 12);

/// Linear velocity, per axis. Observed magnitudes rarely exceed 50.
pub const VELOCITY: FloatCompressor = FloatCompressor::new(-200.0, 200.0, 16);

/// Normalized angular velocity axis, per component.
pub const ANGULAR_VELOCITY_AXIS: FloatCompressor = FloatCompressor::new(-1.0, 1.0, 12);

/// Angular velocity magnitude. Observed magnitudes rarely exceed 100.
pub const ANGULAR_VELOCITY_MAGNITUDE: FloatCompressor = FloatCompressor::new(-200.0, 200.0, 16);

/// Sampler mod wheel; 7-bit accuracy is all the audio side can use.
pub const MOD_WHEEL: FloatCompressor = FloatCompressor::new(0.0, 1.0, 7);

/// Index of the omitted (largest) quaternion component.
pub const MAX_COMPONENT_BITS: u8 = 2;

/// Game object index carried by sound events.
pub const OBJECT_INDEX_BITS: u8 = 16;

/// MIDI note and velocity.
pub const MIDI_BITS: u8 = 7;

/// Largest MIDI note or velocity value.
pub const MIDI_MAX: u8 = 127;

/// Every compressor in the contract, in a fixed order.
pub const COMPRESSORS: [(&str, FloatCompressor); 6] = [
    ("position", POSITION),
    ("orientation", ORIENTATION),
    ("velocity", VELOCITY),
    ("angular_velocity_axis", ANGULAR_VELOCITY_AXIS),
    ("angular_velocity_magnitude", ANGULAR_VELOCITY_MAGNITUDE),
    ("mod_wheel", MOD_WHEEL),
];

/// Every fixed-width integer field in the contract, in a fixed order.
pub const INTEGER_FIELDS: [(&str, u8); 3] = [
    ("max_component", MAX_COMPONENT_BITS),
    ("object_index", OBJECT_INDEX_BITS),
    ("midi", MIDI_BITS),
];
