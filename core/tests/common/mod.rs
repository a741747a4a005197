#![allow(dead_code)]

use agc_core::core::{Bus, Fault, Register};
use agc_core::cpu::Agc;
use agc_core::memory::AgcMemory;

/// Undoubled fixed address test programs are loaded at. Above the vector
/// table and outside the banked window.
pub const ORIGIN: u16 = 0x0C00;

/// Minimal rig for testing: a CPU with plain memory, no DSKY, no boot
/// image.
pub struct TestAgc {
    pub cpu: Agc,
    pub memory: AgcMemory,
}

impl TestAgc {
    pub fn new() -> Self {
        Self {
            cpu: Agc::new(),
            memory: AgcMemory::new(),
        }
    }

    /// Load `words` at [`ORIGIN`] and point Z at the first one.
    pub fn with_program(words: &[u16]) -> Self {
        let mut rig = Self::new();
        rig.memory.load_rom(ORIGIN as usize, words);
        rig.set(Register::Z, ORIGIN << 1);
        rig
    }

    pub fn step(&mut self) -> Result<u8, Fault> {
        self.cpu.step(&mut self.memory)
    }

    /// Step `n` times, panicking on the first fault.
    pub fn run(&mut self, n: usize) {
        for i in 0..n {
            if let Err(fault) = self.step() {
                panic!("step {i} faulted: {fault}");
            }
        }
    }

    pub fn get(&self, reg: Register) -> u16 {
        self.memory.register(reg)
    }

    pub fn set(&mut self, reg: Register, value: u16) {
        self.memory.set_register(reg, value);
    }

    /// Erasable word at an undoubled address, through banking.
    pub fn peek(&mut self, addr: u16) -> u16 {
        self.memory.read(addr << 1).unwrap()
    }

    pub fn poke(&mut self, addr: u16, value: u16) {
        self.memory.write(addr << 1, value).unwrap();
    }

    /// Z as an undoubled address relative to [`ORIGIN`].
    pub fn pc(&self) -> u16 {
        (self.get(Register::Z) >> 1) - ORIGIN
    }
}

// =============================================================================
// Instruction encoders. Addresses are undoubled.
// =============================================================================

pub const EXTEND: u16 = 0x000C;
pub const RELINT: u16 = 0x0006;
pub const INHINT: u16 = 0x0008;
pub const RESUME: u16 = 0xA022;
pub const XXALQ: u16 = 0x0000;
pub const XLQ: u16 = 0x0002;
pub const RETURN: u16 = 0x0004;

pub const fn tc(addr: u16) -> u16 {
    addr << 1
}
pub const fn ccs(addr: u16) -> u16 {
    0x2000 | (addr << 1)
}
pub const fn tcf(addr: u16) -> u16 {
    0x2000 | (addr << 1)
}
pub const fn das(addr: u16) -> u16 {
    0x4000 | (addr << 1)
}
pub const fn lxch(addr: u16) -> u16 {
    0x4800 | (addr << 1)
}
pub const fn incr(addr: u16) -> u16 {
    0x5000 | (addr << 1)
}
pub const fn ads(addr: u16) -> u16 {
    0x5800 | (addr << 1)
}
pub const fn ca(addr: u16) -> u16 {
    0x6000 | (addr << 1)
}
pub const fn cs(addr: u16) -> u16 {
    0x8000 | (addr << 1)
}
pub const fn index(addr: u16) -> u16 {
    0xA000 | (addr << 1)
}
pub const fn dxch(addr: u16) -> u16 {
    0xA800 | (addr << 1)
}
pub const fn ts(addr: u16) -> u16 {
    0xB000 | (addr << 1)
}
pub const fn xch(addr: u16) -> u16 {
    0xB800 | (addr << 1)
}
pub const fn ad(addr: u16) -> u16 {
    0xC000 | (addr << 1)
}
pub const fn mask(addr: u16) -> u16 {
    0xE000 | (addr << 1)
}

// Extended space: each must follow EXTEND.

pub const fn read(channel: u16) -> u16 {
    channel << 1
}
pub const fn write(channel: u16) -> u16 {
    0x0400 | (channel << 1)
}
pub const fn rand(channel: u16) -> u16 {
    0x0800 | (channel << 1)
}
pub const fn wand(channel: u16) -> u16 {
    0x0C00 | (channel << 1)
}
pub const fn ror(channel: u16) -> u16 {
    0x1000 | (channel << 1)
}
pub const fn wor(channel: u16) -> u16 {
    0x1400 | (channel << 1)
}
pub const fn rxor(channel: u16) -> u16 {
    0x1800 | (channel << 1)
}
pub const ALT: u16 = 0x1C00;
pub const fn dv(addr: u16) -> u16 {
    0x2000 | (addr << 1)
}
pub const fn bzf(addr: u16) -> u16 {
    0x2000 | (addr << 1)
}
pub const fn msu(addr: u16) -> u16 {
    0x4000 | (addr << 1)
}
pub const fn qxch(addr: u16) -> u16 {
    0x4800 | (addr << 1)
}
pub const fn aug(addr: u16) -> u16 {
    0x5000 | (addr << 1)
}
pub const fn dim(addr: u16) -> u16 {
    0x5800 | (addr << 1)
}
pub const fn dca(addr: u16) -> u16 {
    0x6000 | (addr << 1)
}
pub const fn dcs(addr: u16) -> u16 {
    0x8000 | (addr << 1)
}
pub const fn index_ext(addr: u16) -> u16 {
    0xA000 | (addr << 1)
}
pub const fn su(addr: u16) -> u16 {
    0xC000 | (addr << 1)
}
pub const fn bzmf(addr: u16) -> u16 {
    0xC000 | (addr << 1)
}
pub const fn mp(addr: u16) -> u16 {
    0xE000 | (addr << 1)
}
