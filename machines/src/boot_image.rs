//! Fixed-memory contents installed at power-on.
//!
//! A boot image is an optional program (big-endian 16-bit words, loaded
//! from physical fixed word 0) plus the resident code every image gets:
//! an idle loop at the BIOS entry, the T4RUPT and KEYRUPT1 handlers, and
//! the interrupt vector table. A program covering the resident addresses
//! replaces that code; the vector table is written last and always wins.

use std::path::Path;

use agc_core::cpu::agc::{BIOS, KEYRUPT1_HANDLER, T4RUPT_HANDLER, VECTOR_TABLE};
use agc_core::memory::{AgcMemory, ROM_SIZE};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a ROM image.
#[derive(Debug, Error)]
pub enum RomLoadError {
    /// Underlying I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image does not hold a whole number of 16-bit words.
    #[error("ROM {file}: {len} bytes is not a whole number of words")]
    OddLength { file: String, len: usize },

    /// The image is larger than fixed memory.
    #[error("ROM {file}: {words} words do not fit in fixed memory")]
    TooLarge { file: String, words: usize },
}

// ---------------------------------------------------------------------------
// Resident code
// ---------------------------------------------------------------------------

const EXTEND: u16 = 0x000C;
const RESUME: u16 = 0xA022;

/// `READ 12`: fetch the keypad code (extended).
const READ_KEYS: u16 = 0x0018;
/// `TS BRUPT`: keep the key code where the epilogue's RSET check sees it.
const TS_BRUPT: u16 = 0xB022;

/// `TCF addr`, `addr` an undoubled fixed address.
const fn tcf(addr: u16) -> u16 {
    0x2000 | (addr << 1)
}

/// (fixed word, code) pairs present in every image.
fn resident() -> [(u16, Vec<u16>); 3] {
    [
        (BIOS, vec![tcf(BIOS)]),
        (T4RUPT_HANDLER, vec![RESUME]),
        (KEYRUPT1_HANDLER, vec![EXTEND, READ_KEYS, TS_BRUPT, RESUME]),
    ]
}

// ---------------------------------------------------------------------------
// BootImage
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct BootImage {
    program: Vec<u16>,
}

impl BootImage {
    /// Resident code and vector table only.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Image with `program` loaded from fixed word 0.
    pub fn from_words(program: Vec<u16>) -> Result<Self, RomLoadError> {
        if program.len() > ROM_SIZE {
            return Err(RomLoadError::TooLarge {
                file: "<memory>".to_string(),
                words: program.len(),
            });
        }
        Ok(Self { program })
    }

    /// Parse big-endian words. `name` only labels errors.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, RomLoadError> {
        if bytes.len() % 2 != 0 {
            return Err(RomLoadError::OddLength {
                file: name.to_string(),
                len: bytes.len(),
            });
        }
        let words: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        if words.len() > ROM_SIZE {
            return Err(RomLoadError::TooLarge {
                file: name.to_string(),
                words: words.len(),
            });
        }
        Ok(Self { program: words })
    }

    pub fn from_file(path: &Path) -> Result<Self, RomLoadError> {
        let bytes = std::fs::read(path)?;
        let image = Self::from_bytes(&path.display().to_string(), &bytes)?;
        log::info!("loaded {} words from {}", image.program.len(), path.display());
        Ok(image)
    }

    /// Undoubled address execution starts from.
    pub fn entry(&self) -> u16 {
        BIOS
    }

    pub fn program_len(&self) -> usize {
        self.program.len()
    }

    /// Write resident code, the program and the vector table into fixed
    /// memory, in that order.
    pub fn install(&self, memory: &mut AgcMemory) {
        for (addr, code) in resident() {
            memory.load_rom(addr as usize, &code);
        }
        memory.load_rom(0, &self.program);
        for entry in VECTOR_TABLE {
            memory.load_rom(entry.rom_offset(), &entry.words());
        }
    }
}
