//! Pixel sample types
//!
//! Maps the BitsPerSample / SampleFormat pair of a TIFF onto a closed set of
//! numeric types, and converts single samples between their little-endian
//! byte form and `f64`.

use std::fmt;

use crate::errors::{GeoError, GeoResult};
use crate::tiff::constants::sample_format;

/// Numeric type of every sample in a band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl DataType {
    /// Resolves the data type from TIFF tag values
    pub fn from_tags(bits_per_sample: u16, format: u16) -> GeoResult<Self> {
        let data_type = match (format, bits_per_sample) {
            (sample_format::UNSIGNED, 8) => DataType::U8,
            (sample_format::UNSIGNED, 16) => DataType::U16,
            (sample_format::UNSIGNED, 32) => DataType::U32,
            (sample_format::SIGNED, 8) => DataType::I8,
            (sample_format::SIGNED, 16) => DataType::I16,
            (sample_format::SIGNED, 32) => DataType::I32,
            (sample_format::IEEEFP, 32) => DataType::F32,
            (sample_format::IEEEFP, 64) => DataType::F64,
            _ => {
                return Err(GeoError::UnsupportedSampleLayout {
                    bits_per_sample,
                    sample_format: format,
                })
            }
        };
        Ok(data_type)
    }

    /// Bits per sample as written to the BitsPerSample tag
    pub fn bits_per_sample(&self) -> u16 {
        (self.size() * 8) as u16
    }

    /// SampleFormat tag value
    pub fn sample_format(&self) -> u16 {
        match self {
            DataType::U8 | DataType::U16 | DataType::U32 => sample_format::UNSIGNED,
            DataType::I8 | DataType::I16 | DataType::I32 => sample_format::SIGNED,
            DataType::F32 | DataType::F64 => sample_format::IEEEFP,
        }
    }

    /// Size of one sample in bytes
    pub fn size(&self) -> usize {
        match self {
            DataType::U8 | DataType::I8 => 1,
            DataType::U16 | DataType::I16 => 2,
            DataType::U32 | DataType::I32 | DataType::F32 => 4,
            DataType::F64 => 8,
        }
    }

    /// Decodes one little-endian sample; `bytes` must hold at least `size()` bytes
    pub fn decode(&self, bytes: &[u8]) -> f64 {
        match self {
            DataType::U8 => bytes[0] as f64,
            DataType::I8 => bytes[0] as i8 as f64,
            DataType::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            DataType::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            DataType::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            DataType::I32 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            DataType::F32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            DataType::F64 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[..8]);
                f64::from_le_bytes(raw)
            }
        }
    }

    /// Appends `value` as a little-endian sample, saturating integer types
    pub fn encode(&self, value: f64, out: &mut Vec<u8>) {
        match self {
            DataType::U8 => out.push(value as u8),
            DataType::I8 => out.push(value as i8 as u8),
            DataType::U16 => out.extend_from_slice(&(value as u16).to_le_bytes()),
            DataType::I16 => out.extend_from_slice(&(value as i16).to_le_bytes()),
            DataType::U32 => out.extend_from_slice(&(value as u32).to_le_bytes()),
            DataType::I32 => out.extend_from_slice(&(value as i32).to_le_bytes()),
            DataType::F32 => out.extend_from_slice(&(value as f32).to_le_bytes()),
            DataType::F64 => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::U8 => "uint8",
            DataType::I8 => "int8",
            DataType::U16 => "uint16",
            DataType::I16 => "int16",
            DataType::U32 => "uint32",
            DataType::I32 => "int32",
            DataType::F32 => "float32",
            DataType::F64 => "float64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
