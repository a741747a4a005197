use super::Agc;
use crate::core::{Bus, Fault, Register};

impl Agc {
    pub(crate) fn op_read<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.io_read(addr)?;
        bus.set_register(Register::A, value);
        Ok(())
    }

    pub(crate) fn op_write<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let a = bus.register(Register::A);
        self.store_io(bus, addr, a)
    }

    pub(crate) fn op_rand<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.io_read(addr)? & bus.register(Register::A);
        bus.set_register(Register::A, value);
        Ok(())
    }

    pub(crate) fn op_wand<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.io_read(addr)? & bus.register(Register::A);
        bus.set_register(Register::A, value);
        self.store_io(bus, addr, value)
    }

    pub(crate) fn op_ror<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.io_read(addr)? | bus.register(Register::A);
        bus.set_register(Register::A, value);
        Ok(())
    }

    /// WOR leaves A untouched; only the channel receives the OR.
    pub(crate) fn op_wor<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.io_read(addr)? | bus.register(Register::A);
        self.store_io(bus, addr, value)
    }

    pub(crate) fn op_rxor<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.io_read(addr)? ^ bus.register(Register::A);
        bus.set_register(Register::A, value);
        Ok(())
    }
}
