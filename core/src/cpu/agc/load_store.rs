use super::word::{MINUS_ONE, PLUS_ONE};
use super::{Agc, Flag};
use crate::core::{Bus, Fault, Register};

/// 1's complement of a doubled word, keeping the parity slot clear.
#[inline]
fn complement(word: u16) -> u16 {
    !word & 0xFFFE
}

impl Agc {
    // CA (CA 0 is NOOP)
    pub(crate) fn op_ca<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        if addr == 0 {
            return Ok(());
        }
        self.set_flag(Flag::Overflow, false);
        let value = bus.read(addr)?;
        bus.set_register(Register::A, value);
        Ok(())
    }

    // CS (CS 0 is COM)
    pub(crate) fn op_cs<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        self.set_flag(Flag::Overflow, false);
        let value = if addr == 0 {
            bus.register(Register::A)
        } else {
            bus.read(addr)?
        };
        bus.set_register(Register::A, complement(value));
        Ok(())
    }

    pub(crate) fn op_dca<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        self.set_flag(Flag::Overflow, false);
        let high = bus.read(addr)?;
        bus.set_register(Register::A, high);
        let low = bus.read(addr.wrapping_add(2))?;
        bus.set_register(Register::L, low);
        Ok(())
    }

    // DCS (DCS 0 is DCOM)
    pub(crate) fn op_dcs<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        self.set_flag(Flag::Overflow, false);
        let (high, low) = if addr == 0 {
            (bus.register(Register::A), bus.register(Register::L))
        } else {
            (bus.read(addr)?, bus.read(addr.wrapping_add(2))?)
        };
        bus.set_register(Register::A, complement(high));
        bus.set_register(Register::L, complement(low));
        Ok(())
    }

    /// Transfer to storage.
    ///
    /// With overflow pending, the corrected value is stored, A becomes +1
    /// or -1 after the latched sign and the next instruction is skipped.
    /// TS A is OVSK (skip only) and TS Z is TCAA (jump to A).
    pub(crate) fn op_ts<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let overflow = self.flag(Flag::Overflow);
        let unit = if self.sign == 0 { PLUS_ONE } else { MINUS_ONE };
        let a = bus.register(Register::A);

        if addr == Register::A.addr() {
            if overflow {
                self.skip(bus, 1);
            }
        } else if addr == Register::Z.addr() {
            self.jump(bus, a & 0x1FFE);
            if overflow {
                bus.set_register(Register::A, unit);
                self.skip(bus, 1);
            }
        } else if overflow {
            self.store(bus, addr, self.sign | (a & 0x7FFE))?;
            bus.set_register(Register::A, unit);
            self.skip(bus, 1);
        } else {
            self.store(bus, addr, a)?;
        }

        self.set_flag(Flag::Overflow, false);
        Ok(())
    }

    /// Swap `reg` with memory through the erasable store path. The loaded
    /// word lands in `reg` after the store, so a corrected A is replaced.
    fn exchange<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        reg: Register,
        addr: u16,
    ) -> Result<(), Fault> {
        let held = bus.register(reg);
        let value = bus.read(addr)?;
        self.store(bus, addr, held)?;
        bus.set_register(reg, value);
        Ok(())
    }

    pub(crate) fn op_xch<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        self.exchange(bus, Register::A, addr)
    }

    // LXCH (LXCH 7 is ZL)
    pub(crate) fn op_lxch<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        if addr == Register::Zr.addr() {
            bus.set_register(Register::L, bus.register(Register::Zr));
            return Ok(());
        }
        self.exchange(bus, Register::L, addr)
    }

    // QXCH (QXCH 7 is ZQ)
    pub(crate) fn op_qxch<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        if addr == Register::Zr.addr() {
            bus.set_register(Register::Q, bus.register(Register::Zr));
            return Ok(());
        }
        self.exchange(bus, Register::Q, addr)
    }

    /// Double exchange of A:L with a register pair or memory.
    ///
    /// DXCH L rotates Q, L and A. DXCH FB (DTCF) and DXCH Z (DTCB) are
    /// jumps: the incoming Z lands exactly on its target.
    pub(crate) fn op_dxch<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let a = bus.register(Register::A);
        let l = bus.register(Register::L);
        match addr >> 1 {
            1 => {
                let q = bus.register(Register::Q);
                bus.set_register(Register::Q, l);
                bus.set_register(Register::L, a);
                bus.set_register(Register::A, q);
            }
            4 => {
                let fb = bus.register(Register::Fb);
                let z = bus.register(Register::Z);
                bus.set_register(Register::A, fb);
                bus.set_register(Register::Fb, a);
                bus.set_register(Register::L, z);
                self.jump(bus, l);
            }
            5 => {
                let z = bus.register(Register::Z);
                let bb = bus.register(Register::Bb);
                bus.set_register(Register::A, z);
                self.jump(bus, a);
                bus.set_register(Register::L, bb);
                bus.set_register(Register::Bb, l);
            }
            _ => {
                self.exchange(bus, Register::A, addr)?;
                self.exchange(bus, Register::L, addr.wrapping_add(2))?;
            }
        }
        Ok(())
    }
}
