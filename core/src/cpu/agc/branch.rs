use super::word::{MINUS_ZERO, is_negative, is_zero, magnitude};
use super::{Agc, Flag};
use crate::core::{Bus, Fault, Register};

// Z is advanced by 2 in the epilogue of every cycle, so every jump stores
// its target minus 2.

impl Agc {
    pub(super) fn jump<B: Bus + ?Sized>(&mut self, bus: &mut B, target: u16) {
        bus.set_register(Register::Z, target.wrapping_sub(2));
    }

    /// Advance Z past `words` following instructions.
    pub(super) fn skip<B: Bus + ?Sized>(&mut self, bus: &mut B, words: u16) {
        let z = bus.register(Register::Z);
        bus.set_register(Register::Z, z.wrapping_add(words << 1));
    }

    /// XXALQ: call the instruction held in A.
    pub(crate) fn op_xxalq<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        bus.set_register(Register::Q, bus.register(Register::Z));
        self.jump(bus, Register::A.addr());
    }

    /// XLQ: call the instruction held in L.
    pub(crate) fn op_xlq<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        bus.set_register(Register::Q, bus.register(Register::Z));
        self.jump(bus, Register::L.addr());
    }

    pub(crate) fn op_return<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        bus.set_register(Register::Z, bus.register(Register::Q));
    }

    pub(crate) fn op_tc<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) {
        bus.set_register(Register::Q, bus.register(Register::Z));
        self.jump(bus, addr);
    }

    pub(crate) fn op_tcf<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) {
        self.jump(bus, addr);
    }

    /// Count, compare and skip. A receives the diminished absolute value
    /// of the operand; the following 0, 1, 2 or 3 instructions are skipped
    /// for positive, +0, negative and -0 operands.
    pub(crate) fn op_ccs<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        self.set_flag(Flag::Overflow, false);
        let value = bus.read(addr)?;
        let (a, skip) = match value {
            0 => (0, 1),
            MINUS_ZERO => (0, 3),
            v if is_negative(v) => (magnitude(v).wrapping_sub(2), 2),
            v => (v.wrapping_sub(2), 0),
        };
        bus.set_register(Register::A, a);
        self.skip(bus, skip);
        Ok(())
    }

    /// Branch if A is +0 or -0.
    pub(crate) fn op_bzf<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) {
        if is_zero(bus.register(Register::A)) {
            self.jump(bus, addr);
        }
    }

    /// Branch if A is zero or negative.
    pub(crate) fn op_bzmf<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) {
        let a = bus.register(Register::A);
        if is_zero(a) || is_negative(a) {
            self.jump(bus, addr);
        }
    }

    /// INDEX: the word at `addr` biases the next instruction's address.
    pub(crate) fn op_index<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        self.index = bus.read(addr)?;
        self.set_flag(Flag::Index, true);
        Ok(())
    }

    /// Extended INDEX: as INDEX, and the next instruction stays in the
    /// extended space.
    pub(crate) fn op_index_extended<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        addr: u16,
    ) -> Result<(), Fault> {
        self.op_index(bus, addr)?;
        self.set_flag(Flag::Extended, true);
        Ok(())
    }
}
