use std::sync::{MutexGuard, PoisonError};

use agc_core::core::machine::{InputButton, Machine};
use agc_core::core::{Bus, Fault};
use agc_core::cpu::agc::InterruptKind;
use agc_core::cpu::{Agc, AgcState, CpuStateTrait};
use agc_core::device::keypad::{KEY_CHANNEL, Key, PRO_BIT, PRO_CHANNEL};
use agc_core::device::{Dsky, DskyStatus, SharedDsky};
use agc_core::memory::AgcMemory;

use crate::boot_image::BootImage;

/// Input id of the PRO key, which the hardware reads as a level rather
/// than as a key code.
pub const PRO_BUTTON: u8 = 101;

const INPUT_MAP: &[InputButton] = &[
    InputButton { id: 16, name: "0" },
    InputButton { id: 1, name: "1" },
    InputButton { id: 2, name: "2" },
    InputButton { id: 3, name: "3" },
    InputButton { id: 4, name: "4" },
    InputButton { id: 5, name: "5" },
    InputButton { id: 6, name: "6" },
    InputButton { id: 7, name: "7" },
    InputButton { id: 8, name: "8" },
    InputButton { id: 9, name: "9" },
    InputButton { id: 17, name: "VERB" },
    InputButton { id: 31, name: "NOUN" },
    InputButton { id: 26, name: "+" },
    InputButton { id: 27, name: "-" },
    InputButton { id: 30, name: "CLR" },
    InputButton { id: 28, name: "ENTR" },
    InputButton { id: 18, name: "RSET" },
    InputButton { id: 25, name: "KEY REL" },
    InputButton {
        id: PRO_BUTTON,
        name: "PRO",
    },
];

/// AGC with its memory, boot image and DSKY.
///
/// The DSKY is shared: clone [`AgcSystem::display`] to read it from
/// another thread while this one runs.
pub struct AgcSystem {
    cpu: Agc,
    memory: AgcMemory,
    dsky: SharedDsky,
    image: BootImage,
}

impl Default for AgcSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AgcSystem {
    pub fn new() -> Self {
        Self::with_image(BootImage::standard())
    }

    pub fn with_image(image: BootImage) -> Self {
        let dsky = Dsky::shared();
        let mut sys = Self {
            cpu: Agc::new(),
            memory: AgcMemory::with_display(dsky.clone()),
            dsky,
            image,
        };
        sys.boot();
        sys
    }

    /// Power-on sequence: zero memory, install the image, clear the CPU
    /// and start at the BIOS entry. Also used for every restart.
    pub fn boot(&mut self) {
        self.memory.clear();
        self.image.install(&mut self.memory);
        self.cpu.power_on(&mut self.memory, self.image.entry());
        *self.lock_dsky() = Dsky::new();
        log::info!("booted, Z={:#06x}", self.image.entry() << 1);
    }

    /// Execute one instruction and advance the DSKY timers.
    pub fn step(&mut self) -> Result<u8, Fault> {
        let cycles = self.cpu.step(&mut self.memory)?;
        self.lock_dsky().tick();
        Ok(cycles)
    }

    /// Latch a key code on the keypad channel and raise KEYRUPT1.
    pub fn press_key(&mut self, key: Key) {
        let latched = key.latch(self.memory.channel(KEY_CHANNEL));
        self.memory.set_channel(KEY_CHANNEL, latched);
        self.cpu.request_interrupt(InterruptKind::Keyrupt1);
        log::debug!("key {} ({})", key.name(), key.code());
    }

    /// Track the PRO key level.
    pub fn set_pro(&mut self, pressed: bool) {
        let channel = self.memory.channel(PRO_CHANNEL);
        let value = if pressed {
            channel | PRO_BIT
        } else {
            channel & !PRO_BIT
        };
        self.memory.set_channel(PRO_CHANNEL, value);
    }

    pub fn display(&self) -> SharedDsky {
        self.dsky.clone()
    }

    pub fn cpu(&self) -> &Agc {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Agc {
        &mut self.cpu
    }

    pub fn memory(&self) -> &AgcMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut AgcMemory {
        &mut self.memory
    }

    /// Load a word through the CPU's view of memory (doubled address).
    pub fn read(&mut self, addr: u16) -> Result<u16, Fault> {
        self.memory.read(addr)
    }

    fn lock_dsky(&self) -> MutexGuard<'_, Dsky> {
        self.dsky.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Machine for AgcSystem {
    fn run_cycle(&mut self) -> Result<u8, Fault> {
        self.step()
    }

    fn cycles(&self) -> u64 {
        self.cpu.mct
    }

    fn status(&self) -> DskyStatus {
        self.lock_dsky().status()
    }

    fn snapshot(&self) -> AgcState {
        self.cpu.snapshot(&self.memory)
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        if button == PRO_BUTTON {
            self.set_pro(pressed);
            return;
        }
        if !pressed {
            return;
        }
        match Key::from_code(button) {
            Some(key) => self.press_key(key),
            None => log::warn!("ignoring unknown key code {}", button),
        }
    }

    fn input_map(&self) -> &[InputButton] {
        INPUT_MAP
    }

    fn reset(&mut self) {
        self.boot();
    }
}
