//! CPU state snapshot types and traits

use std::fmt;

use crate::core::Bus;
use crate::cpu::agc::Opcode;
use crate::cpu::agc::word::to_signed;

/// Trait for CPU types that can provide state snapshots.
///
/// AGC registers live in erasable memory, so the snapshot reads them
/// through the bus.
pub trait CpuStateTrait {
    type Snapshot;
    fn snapshot<B: Bus + ?Sized>(&self, bus: &B) -> Self::Snapshot;
}

/// AGC register and flag snapshot, printed when the machine faults.
#[derive(Debug, Clone, PartialEq)]
pub struct AgcState {
    pub opcode: Option<Opcode>, // Last decoded instruction
    pub addr: u16,              // Its resolved operand (doubled)
    pub overflow: bool,
    pub extended: bool,
    pub index: bool,
    pub mask: bool,
    pub interrupt: bool,
    pub a: u16,  // Accumulator
    pub l: u16,  // Low accumulator
    pub q: u16,  // Return address
    pub z: u16,  // Program counter
    pub bb: u16, // Both banks
    pub arupt: u16,
    pub lrupt: u16,
    pub qrupt: u16,
    pub zrupt: u16,
    pub bbrupt: u16,
    pub brupt: u16,
    pub mct: u64, // Machine cycles since boot
}

fn reg(f: &mut fmt::Formatter<'_>, name: &str, value: u16) -> fmt::Result {
    writeln!(f, "{:<7}{:#06x} ({})", name, value, to_signed(value))
}

impl fmt::Display for AgcState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode {
            Some(op) => writeln!(f, "OPCODE {} {:#06x}", op.mnemonic(), self.addr)?,
            None => writeln!(f, "OPCODE -")?,
        }
        writeln!(
            f,
            "FLAGS  OW={} EXT={} INX={} MASK={} INTR={}",
            self.overflow as u8, self.extended as u8, self.index as u8, self.mask as u8,
            self.interrupt as u8
        )?;
        reg(f, "A", self.a)?;
        reg(f, "L", self.l)?;
        reg(f, "Q", self.q)?;
        reg(f, "Z", self.z)?;
        reg(f, "BB", self.bb)?;
        reg(f, "ARUPT", self.arupt)?;
        reg(f, "LRUPT", self.lrupt)?;
        reg(f, "QRUPT", self.qrupt)?;
        reg(f, "ZRUPT", self.zrupt)?;
        reg(f, "BBRUPT", self.bbrupt)?;
        reg(f, "BRUPT", self.brupt)?;
        write!(f, "MCT    {}", self.mct)
    }
}
