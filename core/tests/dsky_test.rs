use agc_core::device::dsky::{BLINKER_PERIOD, Lamp, STROBE_PERIOD};
use agc_core::device::Dsky;

/// Channel 8 word for a digit pair, in the doubled form the CPU writes.
fn digits_word(position: u16, sign: bool, first: u16, second: u16) -> u16 {
    ((position << 11) | ((sign as u16) << 10) | (first << 5) | second) << 1
}

const ONE: u16 = 0b00011;
const TWO: u16 = 0b11001;
const FIVE: u16 = 0b11110;

// =============================================================================
// Digits
// =============================================================================

#[test]
fn test_prog_digits() {
    let mut dsky = Dsky::new();
    dsky.write_digits(digits_word(11, false, ONE, FIVE));
    assert_eq!(dsky.status().register(0), "15");
}

#[test]
fn test_verb_and_noun_digits() {
    let mut dsky = Dsky::new();
    dsky.write_digits(digits_word(10, false, TWO, ONE));
    dsky.write_digits(digits_word(9, false, FIVE, TWO));
    let status = dsky.status();
    assert_eq!(status.register(1), "21");
    assert_eq!(status.register(2), "52");
}

#[test]
fn test_register_sign_plus() {
    let mut dsky = Dsky::new();
    dsky.write_digits(digits_word(7, true, ONE, TWO));
    assert_eq!(dsky.status().register(3), "+01200");
}

#[test]
fn test_register_sign_minus() {
    let mut dsky = Dsky::new();
    dsky.write_digits(digits_word(6, true, FIVE, FIVE));
    assert_eq!(dsky.status().register(3), "-00055");
}

#[test]
fn test_both_sign_bits_blank_the_sign() {
    let mut dsky = Dsky::new();
    dsky.write_digits(digits_word(7, true, 0, 0));
    dsky.write_digits(digits_word(6, true, 0, 0));
    assert!(dsky.status().register(3).starts_with(' '));
}

#[test]
fn test_unknown_bitmap_shows_e() {
    let mut dsky = Dsky::new();
    dsky.write_digits(digits_word(11, false, 0b00001, ONE));
    assert_eq!(dsky.status().register(0), "e1");
}

#[test]
fn test_unknown_position_changes_nothing() {
    let mut dsky = Dsky::new();
    let before = dsky.status();
    dsky.write_digits(digits_word(15, true, ONE, ONE));
    dsky.write_digits(digits_word(0, true, ONE, ONE));
    assert_eq!(dsky.status(), before);
}

// =============================================================================
// Lamps
// =============================================================================

#[test]
fn test_channel9_lamps() {
    let mut dsky = Dsky::new();
    dsky.write_lamps((0x02 | 0x20) << 1);
    assert!(dsky.lamp(Lamp::CompActy));
    assert!(dsky.lamp(Lamp::Verb));
    assert!(dsky.lamp(Lamp::Noun));
    assert!(!dsky.lamp(Lamp::Temp));

    dsky.write_lamps(0);
    assert!(!dsky.lamp(Lamp::Verb));
}

#[test]
fn test_position_12_drives_status_lamps() {
    let mut dsky = Dsky::new();
    dsky.write_digits(((12 << 11) | 0x004 | 0x400) << 1);
    let status = dsky.status();
    assert!(status.lamp(Lamp::Vel));
    assert!(status.lamp(Lamp::Restart));
    assert!(!status.lamp(Lamp::Prog));
    assert_eq!(status.register(0), "00");
}

#[test]
fn test_key_rel_follows_blinker() {
    let mut dsky = Dsky::new();
    dsky.write_lamps(0x10 << 1);
    assert!(dsky.status().lamp(Lamp::KeyRel));
    for _ in 0..=BLINKER_PERIOD {
        dsky.tick();
    }
    assert!(!dsky.status().lamp(Lamp::KeyRel));
    assert!(dsky.lamp(Lamp::KeyRel));
}

#[test]
fn test_comp_acty_strobe_expires() {
    let mut dsky = Dsky::new();
    dsky.write_lamps(0x02 << 1);
    for _ in 0..STROBE_PERIOD {
        dsky.tick();
    }
    assert!(dsky.lamp(Lamp::CompActy));
    dsky.tick();
    assert!(!dsky.lamp(Lamp::CompActy));
}

// =============================================================================
// Blinking
// =============================================================================

#[test]
fn test_verb_blinks_when_enabled() {
    let mut dsky = Dsky::new();
    dsky.write_digits(digits_word(10, false, TWO, ONE));
    dsky.write_blink(0x2);
    assert_eq!(dsky.status().register(1), "21");
    for _ in 0..=BLINKER_PERIOD {
        dsky.tick();
    }
    assert_eq!(dsky.status().register(1), "  ");
    assert_eq!(dsky.status().register(2), "00");
}

#[test]
fn test_noun_blinks_when_enabled() {
    let mut dsky = Dsky::new();
    dsky.write_blink(0x4);
    for _ in 0..=BLINKER_PERIOD {
        dsky.tick();
    }
    assert_eq!(dsky.status().register(2), "  ");
    assert_eq!(dsky.status().register(1), "00");
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn test_status_json_shape() {
    let json = Dsky::new().status().to_json().unwrap();
    assert!(json.starts_with("{\"success\":true,\"lamps\":[{\"id\":\"lamp_1\",\"value\":0}"));
    assert!(json.contains("{\"id\":\"digits_1\",\"value\":\"00\"}"));
    assert!(json.contains("{\"id\":\"disp_lamp_4\",\"value\":0}"));
}
