use flowplug::codec::{decode, decode_text, encode, encode_text, FixedWidth, Terminator};
use flowplug::core::CodecError;

fn assert_round_trip<T>(values: &[T])
where
    T: FixedWidth + PartialEq + std::fmt::Debug,
{
    for &value in values {
        let data = encode(value);
        assert_eq!(data.len(), T::WIDTH);
        assert_eq!(decode::<T>(data.as_bytes()).unwrap(), value);
    }
}

#[test]
fn test_unsigned_round_trip() {
    assert_round_trip(&[0u8, 1, 0x7f, u8::MAX]);
    assert_round_trip(&[0u16, 0x0102, u16::MAX]);
    assert_round_trip(&[0u32, 0xdead_beef, u32::MAX]);
    let spread: Vec<u64> = (0..1024u64)
        .map(|i| i.wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .collect();
    assert_round_trip(&spread);
    assert_round_trip(&[0u128, u128::MAX]);
}

#[test]
fn test_signed_round_trip() {
    assert_round_trip(&[i8::MIN, -1, 0, i8::MAX]);
    assert_round_trip(&[i16::MIN, -1, 0, i16::MAX]);
    let spread: Vec<i32> = (-512..512i32).map(|i| i * 4_000_000).collect();
    assert_round_trip(&spread);
    assert_round_trip(&[i64::MIN, -1, 0, i64::MAX]);
    assert_round_trip(&[i128::MIN, i128::MAX]);
}

#[test]
fn test_float_round_trip() {
    assert_round_trip(&[0.0f32, -1.5, f32::MIN, f32::MAX, f32::EPSILON]);
    assert_round_trip(&[0.0f64, 1e-300, -2.5e300, f64::INFINITY]);

    let nan = decode::<f64>(encode(f64::NAN).as_bytes()).unwrap();
    assert!(nan.is_nan());
}

#[test]
fn test_float_round_trip_is_bitwise() {
    for bits in [0x7ff8_0000_0000_0001u64, 0xfff4_0000_dead_beef, 0x8000_0000_0000_0000] {
        let value = f64::from_bits(bits);
        assert_eq!(decode::<f64>(encode(value).as_bytes()).unwrap().to_bits(), bits);
    }
    for bits in [0x7fc0_0001u32, 0xff80_0001, 0x8000_0000] {
        let value = f32::from_bits(bits);
        assert_eq!(decode::<f32>(encode(value).as_bytes()).unwrap().to_bits(), bits);
    }
}

#[test]
fn test_layout_is_little_endian() {
    assert_eq!(encode(0x0102_0304u32).as_bytes(), &[4, 3, 2, 1]);
    assert_eq!(encode(-2i16).as_bytes(), &[0xfe, 0xff]);
    assert_eq!(encode(1.0f32).as_bytes(), &[0, 0, 0x80, 0x3f]);
}

#[test]
fn test_decode_requires_exact_length() {
    let err = decode::<u64>(&[1, 2, 3]).unwrap_err();
    assert!(matches!(
        err,
        CodecError::LengthMismatch { expected: 8, actual: 3, .. }
    ));
    assert!(decode::<u32>(&[0; 8]).is_err());
    assert!(decode::<u8>(&[]).is_err());
}

#[test]
fn test_text_terminator_policy() {
    let data = encode_text("(X) fizz");
    assert_eq!(decode_text(data.as_bytes(), Terminator::Strip).unwrap(), "(X) fizz");
    assert_eq!(decode_text(data.as_bytes(), Terminator::Keep).unwrap(), "(X) fizz\0");

    assert_eq!(
        decode_text(b"fizz", Terminator::Strip).unwrap_err(),
        CodecError::MissingTerminator
    );
    assert!(matches!(
        decode_text(&[0xc3, 0x28, 0], Terminator::Strip),
        Err(CodecError::InvalidUtf8(_))
    ));
}

#[test]
fn test_text_round_trip_unicode() {
    for text in ["", "fizz", "ünïcødé", "line\nbreak"] {
        let data = encode_text(text);
        assert_eq!(data.len(), text.len() + 1);
        assert_eq!(decode_text(data.as_bytes(), Terminator::Strip).unwrap(), text);
    }
}
