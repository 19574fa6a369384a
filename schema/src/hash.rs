//! Deterministic protocol fingerprinting.

use blake3::Hasher;

use crate::protocol::{COMPRESSORS, INTEGER_FIELDS};
use crate::FloatCompressor;

/// Computes a deterministic fingerprint of the field contract in [`protocol`](crate::protocol).
#[must_use]
pub fn protocol_hash() -> u64 {
    hash_contract(&COMPRESSORS, &INTEGER_FIELDS)
}

fn hash_contract(compressors: &[(&str, FloatCompressor)], integers: &[(&str, u8)]) -> u64 {
    let mut hasher = Hasher::new();
    write_u32(&mut hasher, compressors.len() as u32);
    for (name, compressor) in compressors {
        write_str(&mut hasher, name);
        write_f32(&mut hasher, compressor.min());
        write_f32(&mut hasher, compressor.max());
        write_u8(&mut hasher, compressor.bits());
    }
    write_u32(&mut hasher, integers.len() as u32);
    for (name, bits) in integers {
        write_str(&mut hasher, name);
        write_u8(&mut hasher, *bits);
    }

    let hash = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(prefix)
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_f32(hasher: &mut Hasher, value: f32) {
    hasher.update(&value.to_bits().to_le_bytes());
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol;

    #[test]
    fn protocol_hash_is_stable() {
        assert_eq!(protocol_hash(), protocol_hash());
    }

    #[test]
    fn hash_changes_with_range() {
        let mut compressors = COMPRESSORS;
        compressors[0].1 = FloatCompressor::new(-100.0, 100.0, 16);
        assert_ne!(
            hash_contract(&compressors, &INTEGER_FIELDS),
            protocol_hash()
        );
    }

    #[test]
    fn hash_changes_with_width() {
        let mut integers = INTEGER_FIELDS;
        integers[1].1 = protocol::OBJECT_INDEX_BITS + 1;
        assert_ne!(hash_contract(&COMPRESSORS, &integers), protocol_hash());
    }

    #[test]
    fn hash_changes_with_order() {
        let mut compressors = COMPRESSORS;
        compressors.swap(2, 4);
        assert_ne!(
            hash_contract(&compressors, &INTEGER_FIELDS),
            protocol_hash()
        );
    }
}
