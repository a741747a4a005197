//! DSKY display logic.
//!
//! The AGC drives the display through three output channels:
//!
//! - channel 8 (`write_digits`): a 4-bit position selects a pair of
//!   digits plus a sign bit; position 12 carries a word of status lamps
//! - channel 9 (`write_lamps`): the remaining indicator lamps
//! - channel 40 (`write_blink`): verb/noun flashing enables
//!
//! Digits arrive as 5-bit segment bitmaps and are stored as ASCII. The
//! blinker and the COMP ACTY strobe are cycle counters advanced by
//! [`Dsky::tick`] once per machine cycle.

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// The display as shared between the CPU thread and status readers.
pub type SharedDsky = Arc<Mutex<Dsky>>;

/// Cycles between blinker phase changes.
pub const BLINKER_PERIOD: u32 = 16666;
/// Cycles COMP ACTY stays lit after being switched on.
pub const STROBE_PERIOD: u32 = 8333;

pub const LAMP_COUNT: usize = 18;
const DIGIT_SLOTS: usize = 31;
/// Scratch slot for positions whose sign bit or first digit is unused.
const SCRATCH: usize = 30;

/// Indicator lamps by slot.
#[repr(usize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lamp {
    UplinkActy = 0,
    NoAtt = 1,
    Stby = 2,
    KeyRel = 3,
    OprErr = 4,
    Temp = 7,
    GimbalLock = 8,
    Prog = 9,
    Restart = 10,
    Tracker = 11,
    Alt = 12,
    Vel = 13,
    CompActy = 14,
    Verb = 15,
    ProgDsp = 16,
    Noun = 17,
}

const LAMP_IDS: [&str; LAMP_COUNT] = [
    "lamp_1",
    "lamp_2",
    "lamp_3",
    "lamp_4",
    "lamp_5",
    "lamp_6",
    "lamp_7",
    "lamp_8",
    "lamp_9",
    "lamp_10",
    "lamp_11",
    "lamp_12",
    "lamp_13",
    "lamp_14",
    "disp_lamp_1",
    "disp_lamp_2",
    "disp_lamp_3",
    "disp_lamp_4",
];

const DIGIT_IDS: [&str; 6] = [
    "digits_1", "digits_2", "digits_3", "digits_4", "digits_5", "digits_6",
];

/// Channel 8 bit -> lamp, for the position 12 lamp word. Bits 0x1
/// (PRIO DISP) and 0x2 (NO DAP) have no lamp.
const CHANNEL8_LAMPS: [(u16, Lamp); 8] = [
    (0x004, Lamp::Vel),
    (0x008, Lamp::NoAtt),
    (0x010, Lamp::Alt),
    (0x020, Lamp::GimbalLock),
    (0x080, Lamp::Tracker),
    (0x100, Lamp::Prog),
    (0x200, Lamp::Stby),
    (0x400, Lamp::Restart),
];

/// Channel 9 bit -> lamps.
const CHANNEL9_LAMPS: [(u16, &[Lamp]); 7] = [
    (0x02, &[Lamp::CompActy]),
    (0x04, &[Lamp::UplinkActy]),
    (0x08, &[Lamp::Temp]),
    (0x10, &[Lamp::KeyRel]),
    (0x20, &[Lamp::Verb, Lamp::Noun]),
    (0x40, &[Lamp::OprErr]),
    (0x80, &[Lamp::ProgDsp]),
];

/// Digit slots written by a channel 8 position: (sign, first, second).
fn position_slots(position: u16) -> Option<(usize, usize, usize)> {
    let slots = match position {
        11 => (SCRATCH, 0, 1),
        10 => (SCRATCH, 2, 3),
        9 => (SCRATCH, 4, 5),
        8 => (SCRATCH, SCRATCH, 7),
        7 => (24, 8, 9),
        6 => (25, 10, 11),
        5 => (26, 13, 14),
        4 => (27, 15, 16),
        3 => (SCRATCH, 17, 19),
        2 => (28, 20, 21),
        1 => (29, 22, 23),
        _ => return None,
    };
    Some(slots)
}

/// Decode a 5-bit segment bitmap. Unknown patterns show as 'e'.
pub fn bitmap_to_digit(bitmap: u8) -> u8 {
    match bitmap & 0x1F {
        0b00000 => b' ',
        0b10101 => b'0',
        0b00011 => b'1',
        0b11001 => b'2',
        0b11011 => b'3',
        0b01111 => b'4',
        0b11110 => b'5',
        0b11100 => b'6',
        0b10011 => b'7',
        0b11101 => b'8',
        0b11111 => b'9',
        _ => b'e',
    }
}

pub struct Dsky {
    lamps: [bool; LAMP_COUNT],
    digits: [u8; DIGIT_SLOTS],
    verb_blink: bool,
    noun_blink: bool,
    blinker: bool,
    blinker_count: u32,
    strobe_count: u32,
}

impl Dsky {
    pub fn new() -> Self {
        let mut digits = [b'0'; DIGIT_SLOTS];
        digits[6] = b' ';
        digits[12] = b' ';
        digits[18] = b' ';
        Self {
            lamps: [false; LAMP_COUNT],
            digits,
            verb_blink: false,
            noun_blink: false,
            blinker: true,
            blinker_count: 0,
            strobe_count: 0,
        }
    }

    pub fn shared() -> SharedDsky {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn lamp(&self, lamp: Lamp) -> bool {
        self.lamps[lamp as usize]
    }

    /// Channel 8: a digit pair with its sign bit, or the lamp word.
    pub fn write_digits(&mut self, word: u16) {
        let word = word >> 1;
        let position = (word >> 11) & 0xF;

        if position == 12 {
            for (bit, lamp) in CHANNEL8_LAMPS {
                self.lamps[lamp as usize] = word & bit != 0;
            }
            return;
        }

        let Some((sign, first, second)) = position_slots(position) else {
            log::warn!("DSKY: no display position {} (word {:#06x})", position, word);
            return;
        };
        self.digits[sign] = if (word >> 10) & 1 == 1 { b'1' } else { b'0' };
        self.digits[first] = bitmap_to_digit(((word >> 5) & 0x1F) as u8);
        self.digits[second] = bitmap_to_digit((word & 0x1F) as u8);

        self.digits[6] = self.sign_char(24, 25);
        self.digits[12] = self.sign_char(26, 27);
        self.digits[18] = self.sign_char(28, 29);
    }

    fn sign_char(&self, plus: usize, minus: usize) -> u8 {
        match (self.digits[plus], self.digits[minus]) {
            (b'1', b'0') => b'+',
            (b'0', b'1') => b'-',
            _ => b' ',
        }
    }

    /// Channel 9: indicator lamps.
    pub fn write_lamps(&mut self, word: u16) {
        let word = word >> 1;
        for (bit, lamps) in CHANNEL9_LAMPS {
            for lamp in lamps {
                self.lamps[*lamp as usize] = word & bit != 0;
            }
        }
    }

    /// Channel 40: verb and noun flashing. Takes the raw doubled word.
    pub fn write_blink(&mut self, word: u16) {
        self.noun_blink = word & 0x4 != 0;
        self.verb_blink = word & 0x2 != 0;
    }

    /// Advance the blinker and the COMP ACTY strobe by one cycle.
    pub fn tick(&mut self) {
        self.blinker_count += 1;
        if self.blinker_count > BLINKER_PERIOD {
            self.blinker = !self.blinker;
            self.blinker_count = 0;
        }

        if self.lamps[Lamp::CompActy as usize] {
            self.strobe_count += 1;
            if self.strobe_count > STROBE_PERIOD {
                self.lamps[Lamp::CompActy as usize] = false;
                self.strobe_count = 0;
            }
        }
    }

    fn register(&self, start: usize, len: usize) -> String {
        String::from_utf8_lossy(&self.digits[start..start + len]).into_owned()
    }

    /// What a viewer sees right now, blinking applied.
    pub fn status(&self) -> DskyStatus {
        let lamps = self
            .lamps
            .iter()
            .enumerate()
            .map(|(i, &lit)| {
                let gated = i == Lamp::KeyRel as usize || i == Lamp::OprErr as usize;
                let on = if gated { lit && self.blinker } else { lit };
                Indicator {
                    id: LAMP_IDS[i],
                    value: on as u8,
                }
            })
            .collect();

        let verb = if !self.verb_blink || self.blinker {
            self.register(2, 2)
        } else {
            "  ".to_string()
        };
        let noun = if !self.noun_blink || self.blinker {
            self.register(4, 2)
        } else {
            "  ".to_string()
        };
        let registers = [
            self.register(0, 2),
            verb,
            noun,
            self.register(6, 6),
            self.register(12, 6),
            self.register(18, 6),
        ];
        let digits = registers
            .into_iter()
            .zip(DIGIT_IDS)
            .map(|(value, id)| Indicator { id, value })
            .collect();

        DskyStatus {
            success: true,
            lamps,
            digits,
        }
    }
}

impl Default for Dsky {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator<T> {
    pub id: &'static str,
    pub value: T,
}

/// Display snapshot as served to pollers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DskyStatus {
    pub success: bool,
    /// 1 or 0 per lamp.
    pub lamps: Vec<Indicator<u8>>,
    /// PROG, VERB, NOUN, R1, R2, R3.
    pub digits: Vec<Indicator<String>>,
}

impl DskyStatus {
    /// Contents of display register `n` (0 = PROG .. 5 = R3).
    pub fn register(&self, n: usize) -> &str {
        &self.digits[n].value
    }

    pub fn lamp(&self, lamp: Lamp) -> bool {
        self.lamps[lamp as usize].value != 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
