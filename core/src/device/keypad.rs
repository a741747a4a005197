//! DSKY keypad codes and the channels keys are delivered on.

/// Channel that receives the 5-bit key code (bits 5..1 of the doubled word).
pub const KEY_CHANNEL: usize = 12;
/// Channel holding the PRO key level.
pub const PRO_CHANNEL: usize = 25;
/// PRO key bit in [`PRO_CHANNEL`].
pub const PRO_BIT: u16 = 0x4000;

/// Keypad keys by the code the keyboard hardware sends.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Zero = 16,
    Verb = 17,
    Reset = 18,
    KeyRel = 25,
    Plus = 26,
    Minus = 27,
    Enter = 28,
    Clear = 30,
    Noun = 31,
}

impl Key {
    pub const ALL: [Key; 18] = [
        Key::Zero,
        Key::One,
        Key::Two,
        Key::Three,
        Key::Four,
        Key::Five,
        Key::Six,
        Key::Seven,
        Key::Eight,
        Key::Nine,
        Key::Verb,
        Key::Noun,
        Key::Plus,
        Key::Minus,
        Key::Clear,
        Key::Enter,
        Key::Reset,
        Key::KeyRel,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Key> {
        Key::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Legend printed on the key.
    pub fn name(self) -> &'static str {
        match self {
            Key::Zero => "0",
            Key::One => "1",
            Key::Two => "2",
            Key::Three => "3",
            Key::Four => "4",
            Key::Five => "5",
            Key::Six => "6",
            Key::Seven => "7",
            Key::Eight => "8",
            Key::Nine => "9",
            Key::Verb => "VERB",
            Key::Reset => "RSET",
            Key::KeyRel => "KEY REL",
            Key::Plus => "+",
            Key::Minus => "-",
            Key::Enter => "ENTR",
            Key::Clear => "CLR",
            Key::Noun => "NOUN",
        }
    }

    /// New key channel contents with this key's code in bits 5..1.
    pub fn latch(self, channel: u16) -> u16 {
        (channel & 0xFFC1) | ((self.code() as u16) << 1)
    }
}
