//! Linear float quantization.

use bitstream::{BitReader, BitResult, BitWriter};
use glam::Vec3;

use crate::error::{SchemaError, SchemaResult};

/// Maps floats in `[min, max]` linearly onto the integers `0..=2^bits - 1`.
///
/// Encoding clamps out-of-range input to the nearest bound and rounds to the
/// nearest step, so it never fails on a value. NaN encodes as `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatCompressor {
    min: f32,
    max: f32,
    bits: u8,
    max_bit_value: u32,
}

impl FloatCompressor {
    /// Creates a compressor for a protocol constant.
    ///
    /// Panics at compile time when used in a `const` with `min >= max` or a
    /// width outside `1..=32`. Use [`try_new`](Self::try_new) for runtime input.
    #[must_use]
    pub const fn new(min: f32, max: f32, bits: u8) -> Self {
        assert!(bits >= 1 && bits <= 32, "compressor width must be 1..=32");
        assert!(min < max, "compressor range must be non-empty");
        Self {
            min,
            max,
            bits,
            max_bit_value: ((1u64 << bits) - 1) as u32,
        }
    }

    /// Creates a compressor, validating the range and width.
    pub fn try_new(min: f32, max: f32, bits: u8) -> SchemaResult<Self> {
        if !(1..=32).contains(&bits) {
            return Err(SchemaError::InvalidBitWidth { bits });
        }
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(SchemaError::InvalidRange { min, max });
        }
        Ok(Self::new(min, max, bits))
    }

    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Number of bits written per scalar.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Distance between two adjacent representable values.
    #[must_use]
    pub fn step(&self) -> f32 {
        ((f64::from(self.max) - f64::from(self.min)) / f64::from(self.max_bit_value)) as f32
    }

    /// Returns the integer code for `value`, clamped into range.
    #[must_use]
    pub fn quantize(&self, value: f32) -> u32 {
        let min = f64::from(self.min);
        let ratio = (f64::from(value) - min) / (f64::from(self.max) - min);
        if ratio.is_nan() {
            return 0;
        }
        let clamped = ratio.clamp(0.0, 1.0);
        (clamped * f64::from(self.max_bit_value)).round() as u32
    }

    /// Returns the float an integer code stands for.
    ///
    /// Codes above the maximum (impossible from a well-formed stream) saturate.
    #[must_use]
    pub fn dequantize(&self, code: u32) -> f32 {
        let ratio = f64::from(code.min(self.max_bit_value)) / f64::from(self.max_bit_value);
        let min = f64::from(self.min);
        (ratio * (f64::from(self.max) - min) + min) as f32
    }

    pub fn write(&self, value: f32, writer: &mut BitWriter) -> BitResult<()> {
        writer.write_bits(u64::from(self.quantize(value)), self.bits)
    }

    pub fn read(&self, reader: &mut BitReader<'_>) -> BitResult<f32> {
        let code = reader.read_bits(self.bits)?;
        Ok(self.dequantize(code as u32))
    }

    /// Writes `x`, `y`, `z` in that order.
    pub fn write_vec3(&self, value: Vec3, writer: &mut BitWriter) -> BitResult<()> {
        self.write(value.x, writer)?;
        self.write(value.y, writer)?;
        self.write(value.z, writer)
    }

    pub fn read_vec3(&self, reader: &mut BitReader<'_>) -> BitResult<Vec3> {
        let x = self.read(reader)?;
        let y = self.read(reader)?;
        let z = self.read(reader)?;
        Ok(Vec3::new(x, y, z))
    }
}
