//! Float quantization and the fixed field contract for shotsync physics packets.
//!
//! This crate defines how continuous physics values become bits:
//! - [`FloatCompressor`] maps a bounded float range onto an N-bit integer
//! - [`protocol`] holds the hard-coded ranges and widths both peers must share
//! - [`protocol_hash`] fingerprints that contract so peers can compare it
//!
//! # Design Principles
//!
//! - **Lossy but bounded** - Out-of-range input is clamped, never rejected.
//! - **Compile-time contract** - Protocol compressors are `const` values.
//! - **Deterministic hashing** - The fingerprint is stable given the same constants.

mod compressor;
mod error;
mod hash;
pub mod protocol;

pub use compressor::FloatCompressor;
pub use error::{SchemaError, SchemaResult};
pub use hash::protocol_hash;
