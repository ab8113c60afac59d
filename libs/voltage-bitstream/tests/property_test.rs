//! Property-based tests for the bit stream

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use proptest::prelude::*;
use voltage_bitstream::{sign_extend, BitStream};

/// (value, width, signed)
fn field() -> impl Strategy<Value = (u64, u8, bool)> {
    (any::<u64>(), 1u8..=64, any::<bool>())
}

fn low_bits(value: u64, width: u8) -> u64 {
    if width >= 64 {
        value
    } else {
        value & ((1u64 << width) - 1)
    }
}

proptest! {
    #[test]
    fn prop_mixed_fields_roundtrip(
        fields in prop::collection::vec(field(), 1..40),
        stale in any::<u8>(),
    ) {
        let total_bits: usize = fields.iter().map(|&(_, width, _)| width as usize).sum();
        let mut storage = vec![stale; total_bits.div_ceil(8)];
        let mut stream = BitStream::new(&mut storage);

        for &(value, width, signed) in &fields {
            if signed {
                stream.put_signed_bits(value as i64, width).unwrap();
            } else {
                stream.put_unsigned_bits(value, width).unwrap();
            }
        }
        prop_assert_eq!(stream.bits_remaining(), storage_len_bits(&stream) - total_bits);

        stream.restart();
        for &(value, width, signed) in &fields {
            if signed {
                let expected = sign_extend(low_bits(value, width), u32::from(width)) as i64;
                prop_assert_eq!(stream.get_signed_bits::<i64>(width).unwrap(), expected);
            } else {
                prop_assert_eq!(stream.get_unsigned_bits::<u64>(width).unwrap(), low_bits(value, width));
            }
        }
    }

    #[test]
    fn prop_failed_put_leaves_stream_untouched(
        len in 1usize..8,
        prefix in prop::collection::vec(any::<bool>(), 0..64),
        value in any::<u64>(),
    ) {
        let mut storage = vec![0u8; len];
        let mut stream = BitStream::new(&mut storage);
        for bit in prefix {
            if stream.put_bit(bit).is_err() {
                break;
            }
        }

        let remaining = stream.bits_remaining();
        prop_assume!(remaining < 64);

        let before = stream.position();
        let bytes = stream.as_bytes().to_vec();
        let width = remaining as u8 + 1;

        prop_assert!(stream.put_unsigned_bits(value, width).is_err());
        prop_assert_eq!(stream.position(), before);
        prop_assert_eq!(stream.as_bytes(), bytes.as_slice());

        prop_assert!(stream.get_signed_bits::<i64>(width).is_err());
        prop_assert_eq!(stream.position(), before);
    }

    #[test]
    fn prop_floats_roundtrip_bit_exact(
        lead in 0u8..8,
        single in any::<u32>(),
        double in any::<u64>(),
    ) {
        let single = f32::from_bits(single);
        let double = f64::from_bits(double);

        let mut storage = [0u8; 13];
        let mut stream = BitStream::new(&mut storage);
        stream.put_unsigned_bits(0u8, lead).unwrap();
        stream.put_f32(single).unwrap();
        stream.put_f64(double).unwrap();

        stream.restart();
        prop_assert_eq!(stream.get_unsigned_bits::<u8>(lead).unwrap(), 0);
        prop_assert_eq!(stream.get_f32().unwrap().to_bits(), single.to_bits());
        prop_assert_eq!(stream.get_f64().unwrap().to_bits(), double.to_bits());
    }

    #[test]
    fn prop_aligned_float_matches_be_bytes(value in any::<u64>()) {
        let value = f64::from_bits(value);
        let mut storage = [0u8; 8];
        let mut stream = BitStream::new(&mut storage);

        stream.put_f64(value).unwrap();
        let expected = value.to_be_bytes();
        prop_assert_eq!(stream.as_bytes(), &expected[..]);
    }
}

fn storage_len_bits(stream: &BitStream<'_>) -> usize {
    stream.buffer_len() * 8
}
