//! Conversions between the parity-padded 1's-complement word format and
//! host integers.
//!
//! A single word keeps its 15-bit value in bits 15..1 and leaves bit 0 for
//! parity. A double word keeps sign + 14 data bits in the high word and 14
//! data bits in the low word.

/// Largest single-precision magnitude.
pub const INT15_MAX: i32 = 16383;
pub const INT15_MIN: i32 = -16383;

/// Largest double-precision magnitude.
pub const INT29_MAX: i32 = 268_435_455;
pub const INT29_MIN: i32 = -268_435_455;

pub const SIGN_BIT: u16 = 0x8000;

/// The doubled -0 word. Unpacks to `i16::MIN`.
pub const MINUS_ZERO: u16 = 0xFFFE;

/// The doubled +1 and -1 words.
pub const PLUS_ONE: u16 = 0x0002;
pub const MINUS_ONE: u16 = 0xFFFC;

#[inline]
pub fn is_negative(word: u16) -> bool {
    word & SIGN_BIT != 0
}

/// True for both +0 and -0.
#[inline]
pub fn is_zero(word: u16) -> bool {
    word == 0 || word == MINUS_ZERO
}

/// Magnitude of a doubled single word, as a doubled positive word.
#[inline]
pub fn magnitude(word: u16) -> u16 {
    if is_negative(word) { !word & 0x7FFE } else { word }
}

/// Unpack a doubled single word.
pub fn to_signed(word: u16) -> i16 {
    let sign = word & SIGN_BIT;
    let mut v = word >> 1;
    if sign != 0 {
        v = v.wrapping_add(1);
    }
    (v | sign) as i16
}

/// Pack a host value into a doubled single word. Values outside
/// [`INT15_MIN`]..=[`INT15_MAX`] wrap.
pub fn from_signed(value: i16) -> u16 {
    let raw = value as u16;
    let sign = raw & SIGN_BIT;
    let v = raw << 1;
    if sign != 0 { v.wrapping_sub(2) } else { v }
}

/// Unpack the double word `hi:lo`. The sign comes from `hi`.
pub fn to_signed32(hi: u16, lo: u16) -> i32 {
    let raw = ((hi as u32) << 16) | lo as u32;
    let sign = raw & 0x8000_0000;
    let shifted = raw >> 1;
    let high = ((shifted & 0x7FFF_0000) >> 2) | sign | (sign >> 1) | (sign >> 2);
    let low = shifted & 0x3FFF;
    let mut v = high | low;
    if sign != 0 {
        v = v.wrapping_add(1);
    }
    v as i32
}

/// Pack a host value into a double word, returned as `(hi, lo)`. Both
/// halves carry the sign.
pub fn from_signed32(value: i32) -> (u16, u16) {
    let sign = (((value as u32) & 0x8000_0000) >> 16) as u16;
    let mut v = value.wrapping_shl(1);
    if sign != 0 {
        v = v.wrapping_sub(2);
    }
    let lo = ((v & 0x7FFE) as u16) | sign;
    let hi = (((v >> 14) & 0x7FFE) as u16) | sign;
    (hi, lo)
}
