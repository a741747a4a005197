use crate::core::{Bus, Fault, Register, Space};
use crate::device::dsky::SharedDsky;

pub const RAM_SIZE: usize = 2048;
pub const ROM_SIZE: usize = 36 * 1024;
pub const IO_SIZE: usize = 512;

/// Erasable words below this are never banked.
const UNBANKED_RAM: usize = 768;
/// Fixed words from here up are never banked.
const UNBANKED_ROM: usize = 2048;
/// Addressable words in the erasable + fixed space.
const ADDRESS_SPACE: usize = 4096;

/// Channel 7, the fixed extension bits.
const FEB_CHANNEL: usize = 7;
const FEB_SUPERBANK: u16 = 0x80;

/// Display channels forwarded to the DSKY.
const DSKY_DIGITS: usize = 8;
const DSKY_LAMPS: usize = 9;
const DSKY_BLINK: usize = 40;

/// Erasable, fixed and channel storage with AGC banking.
///
/// Registers are the low erasable words; there is no separate register
/// file.
pub struct AgcMemory {
    ram: Box<[u16; RAM_SIZE]>,
    rom: Box<[u16; ROM_SIZE]>,
    io: Box<[u16; IO_SIZE]>,
    display: Option<SharedDsky>,
}

impl AgcMemory {
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; RAM_SIZE]),
            rom: Box::new([0; ROM_SIZE]),
            io: Box::new([0; IO_SIZE]),
            display: None,
        }
    }

    /// Memory whose display channels drive `dsky`.
    pub fn with_display(dsky: SharedDsky) -> Self {
        let mut memory = Self::new();
        memory.display = Some(dsky);
        memory
    }

    /// Zero every word. The display connection is kept.
    pub fn clear(&mut self) {
        self.ram.fill(0);
        self.rom.fill(0);
        self.io.fill(0);
    }

    /// Copy `words` into fixed memory starting at physical word `offset`.
    /// Words that would land past the end are dropped.
    pub fn load_rom(&mut self, offset: usize, words: &[u16]) {
        if offset >= ROM_SIZE {
            return;
        }
        let len = words.len().min(ROM_SIZE - offset);
        self.rom[offset..offset + len].copy_from_slice(&words[..len]);
    }

    /// Physical erasable word, bypassing banking.
    pub fn ram(&self, index: usize) -> u16 {
        self.ram[index]
    }

    pub fn rom(&self, index: usize) -> u16 {
        self.rom[index]
    }

    /// Raw channel value (undoubled channel number).
    pub fn channel(&self, channel: usize) -> u16 {
        self.io[channel]
    }

    /// Set a channel without the display side effects of a program write.
    pub fn set_channel(&mut self, channel: usize, value: u16) {
        self.io[channel] = value;
    }

    /// Physical erasable index for an undoubled erasable address.
    fn erasable_index(&self, addr: usize) -> usize {
        if addr < UNBANKED_RAM {
            addr
        } else {
            let bank = ((self.ram[Register::Eb.index()] & 0x0E00) >> 9) as usize;
            bank * 256 + (addr & 0xFF)
        }
    }

    fn fixed_word(&self, addr: usize) -> u16 {
        if addr >= UNBANKED_ROM {
            return self.rom[addr];
        }
        let bank = ((self.ram[Register::Fb.index()] & 0xF800) >> 11) as usize;
        if bank >= 24 && self.io[FEB_CHANNEL] & FEB_SUPERBANK != 0 {
            if bank < 28 {
                self.rom[(bank + 8) * 1024 + (addr & 0x3FF)]
            } else {
                0
            }
        } else {
            self.rom[bank * 1024 + (addr & 0x3FF)]
        }
    }

    /// Keep EB, FB and BB consistent after a write to one of them.
    fn mirror_bank_registers(&mut self, index: usize, value: u16) {
        match index {
            i if i == Register::Eb.index() => {
                self.ram[Register::Bb.index()] = (value >> 8) & 0x7;
            }
            i if i == Register::Fb.index() => {
                self.ram[Register::Bb.index()] = value & 0xF800;
            }
            i if i == Register::Bb.index() => {
                self.ram[Register::Eb.index()] = (value << 8) & 0x0E00;
                self.ram[Register::Fb.index()] = value & 0xF800;
            }
            _ => {}
        }
    }

    fn forward_to_display(&self, channel: usize, value: u16) {
        let Some(display) = &self.display else {
            return;
        };
        let mut dsky = display.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match channel {
            DSKY_DIGITS => dsky.write_digits(value),
            DSKY_LAMPS => dsky.write_lamps(value),
            DSKY_BLINK => dsky.write_blink(value),
            _ => {}
        }
    }
}

impl Default for AgcMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for AgcMemory {
    fn read(&mut self, addr: u16) -> Result<u16, Fault> {
        let word = (addr >> 1) as usize;
        if word >= ADDRESS_SPACE {
            return Err(Fault::OutOfRange {
                space: Space::Fixed,
                addr,
            });
        }
        if word < RAM_SIZE / 2 {
            Ok(self.ram[self.erasable_index(word)])
        } else {
            Ok(self.fixed_word(word))
        }
    }

    fn write(&mut self, addr: u16, data: u16) -> Result<(), Fault> {
        let word = (addr >> 1) as usize;
        if word >= RAM_SIZE / 2 {
            return Err(Fault::OutOfRange {
                space: Space::Erasable,
                addr,
            });
        }
        let index = self.erasable_index(word);
        self.ram[index] = data;
        self.mirror_bank_registers(index, data);
        Ok(())
    }

    fn io_read(&mut self, addr: u16) -> Result<u16, Fault> {
        let channel = (addr >> 1) as usize;
        if channel >= IO_SIZE {
            return Err(Fault::OutOfRange {
                space: Space::Io,
                addr,
            });
        }
        Ok(self.io[channel])
    }

    fn io_write(&mut self, addr: u16, data: u16) -> Result<(), Fault> {
        let channel = (addr >> 1) as usize;
        if channel >= IO_SIZE {
            return Err(Fault::OutOfRange {
                space: Space::Io,
                addr,
            });
        }
        self.io[channel] = data;
        self.forward_to_display(channel, data);
        Ok(())
    }

    fn register(&self, reg: Register) -> u16 {
        self.ram[reg.index()]
    }

    fn set_register(&mut self, reg: Register, value: u16) {
        self.ram[reg.index()] = value;
    }
}
