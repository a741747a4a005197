use super::{Agc, Flag, TIMER4_PERIOD};
use crate::core::{Bus, Fault, Register};

/// Doubled address of the interrupt vector table (fixed word 2048).
pub const IDT_BASE: u16 = 0x1000;

/// Interrupt sources. The discriminant is the type tag, which is also the
/// entry's word offset inside the vector table.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptKind {
    Boot = 0,
    T6rupt = 4,
    T5rupt = 8,
    T3rupt = 12,
    T4rupt = 16,
    Keyrupt1 = 20,
    Keyrupt2 = 24,
    Uprupt = 28,
    Downrupt = 32,
    Radarrupt = 36,
    Handrupt = 40,
}

impl InterruptKind {
    /// Type tag in doubled form, as stored in the vector table.
    #[inline]
    pub fn tag(self) -> u16 {
        (self as u16) << 1
    }
}

/// One vector table entry: presence, type tag and target, four words long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorEntry {
    pub kind: InterruptKind,
    pub present: bool,
    /// Undoubled fixed-memory address of the handler.
    pub target: u16,
}

impl VectorEntry {
    /// Word offset of this entry in fixed memory.
    pub fn rom_offset(&self) -> usize {
        (IDT_BASE >> 1) as usize + self.kind as usize
    }

    /// Entry contents in doubled form: presence, tag, unused, target.
    pub fn words(&self) -> [u16; 4] {
        [
            (self.present as u16) << 1,
            self.kind.tag(),
            0,
            self.target << 1,
        ]
    }
}

pub const BIOS: u16 = 0x082C;
pub const T4RUPT_HANDLER: u16 = 0x0BBA;
pub const KEYRUPT1_HANDLER: u16 = 0x0935;

pub const VECTOR_TABLE: [VectorEntry; 11] = [
    VectorEntry { kind: InterruptKind::Boot, present: true, target: BIOS },
    VectorEntry { kind: InterruptKind::T6rupt, present: false, target: 1 },
    VectorEntry { kind: InterruptKind::T5rupt, present: false, target: 5 },
    VectorEntry { kind: InterruptKind::T3rupt, present: false, target: 1 },
    VectorEntry { kind: InterruptKind::T4rupt, present: true, target: T4RUPT_HANDLER },
    VectorEntry { kind: InterruptKind::Keyrupt1, present: true, target: KEYRUPT1_HANDLER },
    VectorEntry { kind: InterruptKind::Keyrupt2, present: false, target: 1 },
    VectorEntry { kind: InterruptKind::Uprupt, present: false, target: 1 },
    VectorEntry { kind: InterruptKind::Downrupt, present: false, target: 1 },
    VectorEntry { kind: InterruptKind::Radarrupt, present: false, target: 1 },
    VectorEntry { kind: InterruptKind::Handrupt, present: false, target: 1 },
];

const GATES: u8 = Flag::Index as u8 | Flag::Overflow as u8 | Flag::Extended as u8 | Flag::Mask as u8;

impl Agc {
    /// Latch an interrupt request. A later request replaces an earlier
    /// one that has not been admitted yet.
    pub fn request_interrupt(&mut self, kind: InterruptKind) {
        self.interrupt = kind;
        self.set_flag(Flag::Interrupt, true);
    }

    /// INHINT; also drops any pending request.
    pub(crate) fn mask_interrupts(&mut self) {
        self.set_flag(Flag::Mask, true);
        self.set_flag(Flag::Interrupt, false);
    }

    pub(crate) fn op_resume<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        bus.set_register(Register::A, bus.register(Register::Arupt));
        bus.set_register(Register::L, bus.register(Register::Lrupt));
        bus.set_register(Register::Q, bus.register(Register::Qrupt));
        bus.set_register(Register::Bb, bus.register(Register::Bbrupt));
        bus.set_register(Register::Z, bus.register(Register::Zrupt));
        self.set_flag(Flag::Mask, false);
    }

    /// TIME4 advances once per 10 ms of machine time; wrapping to zero
    /// raises T4RUPT.
    pub(crate) fn tick_timer<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        if self.mct / TIMER4_PERIOD <= self.timer4_ticks {
            return;
        }
        self.timer4_ticks += 1;
        let time4 = bus.register(Register::Time4).wrapping_add(2);
        bus.set_register(Register::Time4, time4);
        if time4 >> 1 == 0 {
            self.request_interrupt(InterruptKind::T4rupt);
        }
    }

    /// Admit the pending interrupt when nothing gates it: save the live
    /// registers into the RUPT shadows and vector through the table.
    pub(crate) fn admit_interrupt<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<(), Fault> {
        if self.flags & GATES != 0 || !self.flag(Flag::Interrupt) {
            return Ok(());
        }

        for (shadow, live) in [
            (Register::Arupt, Register::A),
            (Register::Lrupt, Register::L),
            (Register::Qrupt, Register::Q),
            (Register::Zrupt, Register::Z),
            (Register::Bbrupt, Register::Bb),
        ] {
            bus.set_register(shadow, bus.register(live));
        }

        let tag = self.interrupt.tag();
        let entry = IDT_BASE | tag;
        let present = bus.read(entry)?;
        let kind = bus.read(entry + 2)?;
        if present != 0 && kind != tag {
            return Err(Fault::NoMatchingInterrupt {
                int_type: self.interrupt as u16,
            });
        }

        self.mask_interrupts();
        let target = bus.read(entry + 6)?;
        self.jump(bus, target);
        log::debug!("{:?} admitted, handler at {:#06x}", self.interrupt, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_by_tag() {
        for (i, entry) in VECTOR_TABLE.iter().enumerate() {
            assert_eq!(entry.kind as usize, i * 4);
        }
    }

    #[test]
    fn entry_words_are_doubled() {
        let keyrupt = VECTOR_TABLE[5];
        assert_eq!(keyrupt.rom_offset(), 2048 + 20);
        assert_eq!(keyrupt.words(), [2, 40, 0, 0x0935 << 1]);
    }
}
