//! Byte codec for values crossing the node boundary.
//!
//! Numbers use an exact-width little-endian layout so that every producer and
//! consumer agrees on the encoding regardless of platform. Text is UTF-8
//! followed by a single `0x00` terminator (see [`text`]).

pub mod text;

pub use text::{decode_text, encode_text, Terminator, TERMINATOR};

use crate::core::{CodecError, Data};

/// A value with a fixed-width little-endian encoding.
pub trait FixedWidth: Sized + Copy {
    /// Encoded length in bytes.
    const WIDTH: usize;

    fn write_le(&self, out: &mut Vec<u8>);

    /// Reads from a slice of exactly [`Self::WIDTH`] bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_fixed_width {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_le(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_fixed_width!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

/// Encodes `value` in exactly `T::WIDTH` little-endian bytes.
///
/// Floats round-trip bit for bit (`to_bits` equality), so NaN payloads and
/// signed zeros survive even though `NaN != NaN`.
pub fn encode<T: FixedWidth>(value: T) -> Data {
    let mut out = Vec::with_capacity(T::WIDTH);
    value.write_le(&mut out);
    Data::from(out)
}

/// Decodes a value, requiring the payload length to equal `T::WIDTH` exactly.
pub fn decode<T: FixedWidth>(bytes: &[u8]) -> Result<T, CodecError> {
    if bytes.len() != T::WIDTH {
        return Err(CodecError::LengthMismatch {
            type_name: std::any::type_name::<T>(),
            expected: T::WIDTH,
            actual: bytes.len(),
        });
    }
    Ok(T::read_le(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_is_little_endian() {
        let data = encode(4u64);
        assert_eq!(data.as_bytes(), &[4, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decode::<u64>(data.as_bytes()).unwrap(), 4);
    }

    #[test]
    fn test_round_trip_extremes() {
        for v in [0u64, 1, u64::MAX, 0x0102_0304_0506_0708] {
            assert_eq!(decode::<u64>(encode(v).as_bytes()).unwrap(), v);
        }
        for v in [i32::MIN, -1, 0, i32::MAX] {
            assert_eq!(decode::<i32>(encode(v).as_bytes()).unwrap(), v);
        }
        for v in [0.0f64, -1.5, f64::MAX, f64::MIN_POSITIVE] {
            assert_eq!(decode::<f64>(encode(v).as_bytes()).unwrap(), v);
        }
        assert_eq!(decode::<u8>(encode(255u8).as_bytes()).unwrap(), 255);
        assert_eq!(decode::<i128>(encode(i128::MIN).as_bytes()).unwrap(), i128::MIN);
    }

    #[test]
    fn test_width_is_fixed_by_type() {
        assert_eq!(encode(0u16).len(), 2);
        assert_eq!(encode(u32::MAX).len(), 4);
        assert_eq!(encode(1.0f32).len(), 4);
        assert_eq!(encode(0u128).len(), 16);
    }

    #[test]
    fn test_length_mismatch() {
        let err = decode::<u64>(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            CodecError::LengthMismatch {
                type_name: "u64",
                expected: 8,
                actual: 3,
            }
        );
        assert!(decode::<u32>(&[0; 8]).is_err());
    }
}
