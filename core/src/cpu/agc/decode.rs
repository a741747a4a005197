use std::fmt;

use crate::core::Fault;

/// Operand space an instruction's address must fall in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressClass {
    /// Below doubled 2048: erasable memory.
    Erasable,
    /// Doubled 2048 and above: fixed memory.
    Fixed,
    /// Below doubled 1024: I/O channels.
    Io,
}

impl AddressClass {
    fn check(self, addr: u16) -> Result<(), Fault> {
        match self {
            AddressClass::Erasable if addr >= 2048 => Err(Fault::InvalidErasableAddress { addr }),
            AddressClass::Fixed if addr < 2048 => Err(Fault::InvalidFixedAddress { addr }),
            AddressClass::Io if addr >= 1024 => Err(Fault::InvalidIoAddress { addr }),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    // Non-extended space
    Xxalq,
    Xlq,
    Return,
    Relint,
    Inhint,
    Extend,
    Tc,
    Ccs,
    Tcf,
    Das,
    Lxch,
    Incr,
    Ads,
    Ca,
    Cs,
    Resume,
    Index,
    Dxch,
    Ts,
    Xch,
    Ad,
    Mask,
    // Extended space
    Read,
    Write,
    Rand,
    Wand,
    Ror,
    Wor,
    Rxor,
    Alt,
    Dv,
    Bzf,
    Msu,
    Qxch,
    Aug,
    Dim,
    Dca,
    Dcs,
    IndexExtended,
    Su,
    Bzmf,
    Mp,
}

/// (opcode, MCT) for every instruction, in declaration order.
const CYCLE_TABLE: [(Opcode, u8); 42] = [
    (Opcode::Xxalq, 1),
    (Opcode::Xlq, 1),
    (Opcode::Return, 2),
    (Opcode::Relint, 1),
    (Opcode::Inhint, 1),
    (Opcode::Extend, 1),
    (Opcode::Tc, 1),
    (Opcode::Ccs, 2),
    (Opcode::Tcf, 1),
    (Opcode::Das, 3),
    (Opcode::Lxch, 2),
    (Opcode::Incr, 2),
    (Opcode::Ads, 2),
    (Opcode::Ca, 2),
    (Opcode::Cs, 2),
    (Opcode::Resume, 2),
    (Opcode::Index, 2),
    (Opcode::Dxch, 3),
    (Opcode::Ts, 2),
    (Opcode::Xch, 2),
    (Opcode::Ad, 2),
    (Opcode::Mask, 2),
    (Opcode::Read, 2),
    (Opcode::Write, 2),
    (Opcode::Rand, 2),
    (Opcode::Wand, 2),
    (Opcode::Ror, 2),
    (Opcode::Wor, 2),
    (Opcode::Rxor, 2),
    (Opcode::Alt, 3),
    (Opcode::Dv, 6),
    (Opcode::Bzf, 1),
    (Opcode::Msu, 2),
    (Opcode::Qxch, 2),
    (Opcode::Aug, 2),
    (Opcode::Dim, 2),
    (Opcode::Dca, 3),
    (Opcode::Dcs, 3),
    (Opcode::IndexExtended, 2),
    (Opcode::Su, 2),
    (Opcode::Bzmf, 1),
    (Opcode::Mp, 3),
];

impl Opcode {
    /// Cost in machine cycles.
    pub fn cycles(self) -> u8 {
        CYCLE_TABLE[self as usize].1
    }

    pub fn is_extended(self) -> bool {
        self as usize >= Opcode::Read as usize
    }

    /// 3-bit primary opcode this instruction decodes from.
    pub fn primary(self) -> u16 {
        use Opcode::*;
        match self {
            Xxalq | Xlq | Return | Relint | Inhint | Extend | Tc => 0,
            Ccs | Tcf => 1,
            Das | Lxch | Incr | Ads => 2,
            Ca => 3,
            Cs => 4,
            Resume | Index | Dxch | Ts | Xch => 5,
            Ad => 6,
            Mask => 7,
            Read | Write | Rand | Wand | Ror | Wor | Rxor | Alt => 0,
            Dv | Bzf => 1,
            Msu | Qxch | Aug | Dim => 2,
            Dca => 3,
            Dcs => 4,
            IndexExtended => 5,
            Su | Bzmf => 6,
            Mp => 7,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Xxalq => "XXALQ",
            Xlq => "XLQ",
            Return => "RETURN",
            Relint => "RELINT",
            Inhint => "INHINT",
            Extend => "EXTEND",
            Tc => "TC",
            Ccs => "CCS",
            Tcf => "TCF",
            Das => "DAS",
            Lxch => "LXCH",
            Incr => "INCR",
            Ads => "ADS",
            Ca => "CA",
            Cs => "CS",
            Resume => "RESUME",
            Index => "INDEX",
            Dxch => "DXCH",
            Ts => "TS",
            Xch => "XCH",
            Ad => "AD",
            Mask => "MASK",
            Read => "READ",
            Write => "WRITE",
            Rand => "RAND",
            Wand => "WAND",
            Ror => "ROR",
            Wor => "WOR",
            Rxor => "RXOR",
            Alt => "ALT",
            Dv => "DV",
            Bzf => "BZF",
            Msu => "MSU",
            Qxch => "QXCH",
            Aug => "AUG",
            Dim => "DIM",
            Dca => "DCA",
            Dcs => "DCS",
            IndexExtended => "INDEX",
            Su => "SU",
            Bzmf => "BZMF",
            Mp => "MP",
        }
    }
}

/// A decoded instruction. `addr` is doubled and already carries any
/// INDEX offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub addr: u16,
    pub cycles: u8,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:#06x}", self.op.mnemonic(), self.addr)
    }
}

const ADDR_FULL: u16 = 0x1FFE;
const ADDR_ERASABLE: u16 = 0x07FE;
const ADDR_IO: u16 = 0x03FE;

/// Decode `word` in the extended or basic instruction space.
///
/// `offset` is the INDEX bias for this instruction (0 when none is
/// pending). It is added to the address field before the address class
/// is checked.
pub fn decode(word: u16, extended: bool, offset: u16) -> Result<Instruction, Fault> {
    let primary = (word >> 13) & 7;
    let quarter = (word & 0x1800) >> 11;

    let (op, field, class) = if extended {
        match primary {
            0 => {
                let op = match (word & 0x1C00) >> 10 {
                    0 => Opcode::Read,
                    1 => Opcode::Write,
                    2 => Opcode::Rand,
                    3 => Opcode::Wand,
                    4 => Opcode::Ror,
                    5 => Opcode::Wor,
                    6 => Opcode::Rxor,
                    _ => Opcode::Alt,
                };
                (op, word & ADDR_IO, Some(AddressClass::Io))
            }
            1 if quarter == 0 => (Opcode::Dv, word & ADDR_ERASABLE, Some(AddressClass::Erasable)),
            1 => (Opcode::Bzf, word & ADDR_FULL, Some(AddressClass::Fixed)),
            2 => {
                let op = match quarter {
                    0 => Opcode::Msu,
                    1 => Opcode::Qxch,
                    2 => Opcode::Aug,
                    _ => Opcode::Dim,
                };
                (op, word & ADDR_ERASABLE, Some(AddressClass::Erasable))
            }
            3 => (Opcode::Dca, word & ADDR_FULL, None),
            4 => (Opcode::Dcs, word & ADDR_FULL, None),
            5 => (Opcode::IndexExtended, word & ADDR_FULL, None),
            6 if quarter == 0 => (Opcode::Su, word & ADDR_ERASABLE, Some(AddressClass::Erasable)),
            6 => (Opcode::Bzmf, word & ADDR_FULL, Some(AddressClass::Fixed)),
            7 => (Opcode::Mp, word & ADDR_FULL, None),
            _ => return Err(Fault::NoValidOperand { opcode: primary }),
        }
    } else {
        match primary {
            0 => {
                let field = word & ADDR_FULL;
                let op = match field >> 1 {
                    0 => Opcode::Xxalq,
                    1 => Opcode::Xlq,
                    2 => Opcode::Return,
                    3 => Opcode::Relint,
                    4 => Opcode::Inhint,
                    6 => Opcode::Extend,
                    _ => Opcode::Tc,
                };
                (op, field, None)
            }
            1 if quarter == 0 => (Opcode::Ccs, word & ADDR_ERASABLE, Some(AddressClass::Erasable)),
            1 => (Opcode::Tcf, word & ADDR_FULL, Some(AddressClass::Fixed)),
            2 => {
                let op = match quarter {
                    0 => Opcode::Das,
                    1 => Opcode::Lxch,
                    2 => Opcode::Incr,
                    _ => Opcode::Ads,
                };
                (op, word & ADDR_ERASABLE, Some(AddressClass::Erasable))
            }
            3 => (Opcode::Ca, word & ADDR_FULL, None),
            4 => (Opcode::Cs, word & ADDR_FULL, None),
            5 => {
                let field = word & ADDR_ERASABLE;
                let op = match quarter {
                    0 if field >> 1 == 17 => Opcode::Resume,
                    0 => Opcode::Index,
                    1 => Opcode::Dxch,
                    2 => Opcode::Ts,
                    _ => Opcode::Xch,
                };
                (op, field, Some(AddressClass::Erasable))
            }
            6 => (Opcode::Ad, word & ADDR_FULL, None),
            7 => (Opcode::Mask, word & ADDR_FULL, None),
            _ => return Err(Fault::NoValidOperand { opcode: primary }),
        }
    };

    let addr = field.wrapping_add(offset);
    if let Some(class) = class {
        class.check(addr)?;
    }
    Ok(Instruction {
        op,
        addr,
        cycles: op.cycles(),
    })
}
