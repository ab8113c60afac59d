//! Integer field types accepted by the bit stream
//!
//! Every integer put/get goes through a single `u64` bit-packing core. The
//! traits here describe how a concrete integer type maps to and from that raw
//! representation:
//! - Unsigned types zero-extend on the way in and truncate on the way out
//! - Signed types sign-extend on the way in and truncate on the way out, with
//!   narrow fields sign-extended from their top bit by the stream after reading
//!
//! Both traits are sealed; they are implemented for the 8/16/32/64-bit
//! primitives only.

mod sealed {
    pub trait Sealed {}
}

/// Unsigned integer usable as a bit field (`u8`, `u16`, `u32`, `u64`)
pub trait UnsignedField: sealed::Sealed + Copy {
    /// Natural width of the type in bits
    const BITS: u32;

    /// Zero-extend into the raw accumulator
    fn to_raw(self) -> u64;

    /// Truncate the raw accumulator to the type
    fn from_raw(raw: u64) -> Self;
}

/// Signed integer usable as a bit field (`i8`, `i16`, `i32`, `i64`)
pub trait SignedField: sealed::Sealed + Copy {
    /// Natural width of the type in bits
    const BITS: u32;

    /// Two's-complement bits, sign-extended to 64 bits
    fn to_raw(self) -> u64;

    /// Truncate the raw accumulator to the type
    fn from_raw(raw: u64) -> Self;
}

macro_rules! unsigned_field {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}

            impl UnsignedField for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn to_raw(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_raw(raw: u64) -> Self {
                    raw as $t
                }
            }
        )*
    };
}

macro_rules! signed_field {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}

            impl SignedField for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn to_raw(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_raw(raw: u64) -> Self {
                    raw as $t
                }
            }
        )*
    };
}

unsigned_field!(u8, u16, u32, u64);
signed_field!(i8, i16, i32, i64);

/// Mask covering the low `width` bits (all ones for 64 and above)
#[inline]
pub(crate) fn low_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Sign-extend a `width`-bit two's-complement field held in the low bits of `raw`
///
/// Bits above `width` are replaced: set to one when bit `width - 1` is set,
/// cleared otherwise. Widths of 0 and 64 return `raw` unchanged.
#[inline]
pub fn sign_extend(raw: u64, width: u32) -> u64 {
    if width == 0 || width >= u64::BITS {
        return raw;
    }

    let mask = low_mask(width);
    if raw & (1u64 << (width - 1)) != 0 {
        raw | !mask
    } else {
        raw & mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_mask() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(1), 0b1);
        assert_eq!(low_mask(5), 0b1_1111);
        assert_eq!(low_mask(63), u64::MAX >> 1);
        assert_eq!(low_mask(64), u64::MAX);
    }

    #[test]
    fn test_sign_extend() {
        // 0x15 as a 5-bit field is -11
        assert_eq!(sign_extend(0x15, 5) as i8, -11);
        assert_eq!(sign_extend(0x15, 5) as i8 as u8, 0xF5);

        // Positive 5-bit field stays put
        assert_eq!(sign_extend(0x05, 5), 0x05);

        // 10-bit 0x2A5 -> 0xFEA5 as i16
        assert_eq!(sign_extend(0x2A5, 10) as i16 as u16, 0xFEA5);

        // 22-bit 0x255AA5 -> 0xFFE55AA5 as i32
        assert_eq!(sign_extend(0x25_5AA5, 22) as i32 as u32, 0xFFE5_5AA5);
    }

    #[test]
    fn test_sign_extend_edges() {
        assert_eq!(sign_extend(0xDEAD, 0), 0xDEAD);
        assert_eq!(sign_extend(u64::MAX, 64), u64::MAX);
        assert_eq!(sign_extend(1, 1), u64::MAX);
        assert_eq!(sign_extend(0, 1), 0);
    }

    #[test]
    fn test_raw_conversions() {
        assert_eq!(<i8 as SignedField>::to_raw(-1), u64::MAX);
        assert_eq!(<i16 as SignedField>::to_raw(-2), u64::MAX - 1);
        assert_eq!(<i32 as SignedField>::from_raw(0xFFFF_FFFF_8000_0000), i32::MIN);
        assert_eq!(<u8 as UnsignedField>::to_raw(0xA5), 0xA5);
        assert_eq!(<u16 as UnsignedField>::from_raw(0x1_2345), 0x2345);
        assert_eq!(<u64 as UnsignedField>::BITS, 64);
        assert_eq!(<i8 as SignedField>::BITS, 8);
    }
}
