use agc_core::cpu::agc::word::{
    INT29_MAX, INT29_MIN, MINUS_ONE, MINUS_ZERO, from_signed, from_signed32, is_zero, magnitude,
    to_signed, to_signed32,
};
use proptest::prelude::*;

// =============================================================================
// Single precision
// =============================================================================

#[test]
fn test_every_even_word_round_trips() {
    for word in (0..=u16::MAX).step_by(2) {
        assert_eq!(from_signed(to_signed(word)), word, "word {word:#06x}");
    }
}

#[test]
fn test_zeros() {
    assert_eq!(to_signed(0), 0);
    assert!(is_zero(0));
    assert!(is_zero(MINUS_ZERO));
    assert!(!is_zero(MINUS_ONE));
}

#[test]
fn test_negative_values() {
    assert_eq!(to_signed(MINUS_ONE), -1);
    assert_eq!(to_signed(from_signed(-100)), -100);
    assert_eq!(from_signed(-16383), 0x8000);
}

#[test]
fn test_magnitude() {
    assert_eq!(magnitude(from_signed(5)), from_signed(5));
    assert_eq!(magnitude(from_signed(-5)), from_signed(5));
    assert_eq!(magnitude(MINUS_ZERO), 0);
}

// =============================================================================
// Double precision
// =============================================================================

#[test]
fn test_double_word_halves_share_sign() {
    let (hi, lo) = from_signed32(-12345);
    assert_eq!(hi & 0x8000, 0x8000);
    assert_eq!(lo & 0x8000, 0x8000);
    let (hi, lo) = from_signed32(12345);
    assert_eq!(hi & 0x8000, 0);
    assert_eq!(lo & 0x8000, 0);
}

#[test]
fn test_double_word_extremes() {
    assert_eq!(to_signed32(0x7FFE, 0x7FFE), INT29_MAX);
    let (hi, lo) = from_signed32(INT29_MIN);
    assert_eq!(to_signed32(hi, lo), INT29_MIN);
}

proptest! {
    #[test]
    fn double_word_round_trip(value in INT29_MIN..=INT29_MAX) {
        let (hi, lo) = from_signed32(value);
        prop_assert_eq!(to_signed32(hi, lo), value);
        prop_assert_eq!(hi & 1, 0);
        prop_assert_eq!(lo & 1, 0);
    }
}
