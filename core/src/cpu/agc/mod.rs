mod alu;
mod branch;
mod decode;
mod interrupt;
mod io;
mod load_store;
pub mod word;

use crate::core::{Bus, Fault, Register};
use crate::cpu::{
    Cpu,
    state::{AgcState, CpuStateTrait},
};

pub use decode::{AddressClass, Instruction, Opcode, decode};
pub use interrupt::{
    BIOS, IDT_BASE, InterruptKind, KEYRUPT1_HANDLER, T4RUPT_HANDLER, VECTOR_TABLE, VectorEntry,
};

#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum Flag {
    Overflow = 0x01,  // Result left the 15-bit range, correction pending
    Extended = 0x02,  // Next instruction decodes in the extended space
    Index = 0x04,     // Offset in `index` applies to the next address
    Mask = 0x08,      // Interrupts inhibited
    Interrupt = 0x10, // Interrupt request pending
}

/// Wall-clock length of one machine cycle, in microseconds.
pub const CYCLE_US: u64 = 12;

/// Machine cycles between TIME4 increments (10 ms).
pub const TIMER4_PERIOD: u64 = 10_000 / CYCLE_US;

/// Key code the KEYRUPT handler leaves in BRUPT when RSET is pressed.
pub const RESTART_KEY: u16 = 18;

pub struct Agc {
    pub flags: u8,
    /// Sign latched by the last overflowing operation (0 or 0x8000).
    pub sign: u16,
    /// Operand loaded by INDEX, added to the next address.
    pub index: u16,
    /// Interrupt type awaiting admission.
    pub interrupt: InterruptKind,
    /// Machine cycles since boot.
    pub mct: u64,
    /// TIME4 increments performed since boot.
    pub timer4_ticks: u64,

    pub(crate) last: Option<Instruction>,
}

impl Agc {
    pub fn new() -> Self {
        Self {
            flags: 0,
            sign: 0,
            index: 0,
            interrupt: InterruptKind::Boot,
            mct: 0,
            timer4_ticks: 0,
            last: None,
        }
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        self.flags & flag as u8 != 0
    }

    #[inline]
    pub(crate) fn set_flag(&mut self, flag: Flag, set: bool) {
        if set {
            self.flags |= flag as u8
        } else {
            self.flags &= !(flag as u8)
        }
    }

    /// Last instruction decoded, if any.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last
    }

    /// Clear CPU state and point Z at `entry` (an undoubled fixed address).
    /// Memory must already hold the boot image.
    pub fn power_on<B: Bus + ?Sized>(&mut self, bus: &mut B, entry: u16) {
        self.reset();
        bus.set_register(Register::Time4, 0xFFFE);
        bus.set_register(Register::Z, entry << 1);
    }

    /// Run one full machine cycle: fetch, decode, execute, timer,
    /// interrupt admission and the per-cycle epilogue.
    ///
    /// Returns the number of MCTs the instruction cost.
    pub fn step<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<u8, Fault> {
        let z = bus.register(Register::Z);
        let word = bus.read(z)?;
        let instruction = self.decode_next(word)?;
        self.mct += instruction.cycles as u64;

        self.execute(instruction, bus)?;
        self.tick_timer(bus);
        self.admit_interrupt(bus)?;
        self.epilogue(bus)?;
        Ok(instruction.cycles)
    }

    /// Decode `word` in the current instruction space, consuming a pending
    /// INDEX offset.
    pub fn decode_next(&mut self, word: u16) -> Result<Instruction, Fault> {
        let offset = if self.flag(Flag::Index) {
            self.set_flag(Flag::Index, false);
            self.index
        } else {
            0
        };
        let instruction = decode(word, self.flag(Flag::Extended), offset)?;
        log::trace!("{:#06x}: {}", word, instruction);
        self.last = Some(instruction);
        Ok(instruction)
    }

    /// Apply one decoded instruction.
    pub fn execute<B: Bus + ?Sized>(
        &mut self,
        instruction: Instruction,
        bus: &mut B,
    ) -> Result<(), Fault> {
        let extended = self.flag(Flag::Extended);
        if extended {
            self.set_flag(Flag::Extended, false);
        }
        if instruction.op.is_extended() != extended {
            return Err(Fault::NoValidOperand {
                opcode: instruction.op.primary(),
            });
        }

        let addr = instruction.addr;
        match instruction.op {
            // ===== Control transfer =====
            Opcode::Xxalq => self.op_xxalq(bus),
            Opcode::Xlq => self.op_xlq(bus),
            Opcode::Return => self.op_return(bus),
            Opcode::Tc => self.op_tc(bus, addr),
            Opcode::Tcf => self.op_tcf(bus, addr),
            Opcode::Ccs => self.op_ccs(bus, addr)?,
            Opcode::Bzf => self.op_bzf(bus, addr),
            Opcode::Bzmf => self.op_bzmf(bus, addr),
            Opcode::Extend => self.set_flag(Flag::Extended, true),
            Opcode::Index => self.op_index(bus, addr)?,
            Opcode::IndexExtended => self.op_index_extended(bus, addr)?,

            // ===== Interrupt control =====
            Opcode::Relint => self.set_flag(Flag::Mask, false),
            Opcode::Inhint => self.mask_interrupts(),
            Opcode::Resume => self.op_resume(bus),

            // ===== Load / store / exchange =====
            Opcode::Ca => self.op_ca(bus, addr)?,
            Opcode::Cs => self.op_cs(bus, addr)?,
            Opcode::Dca => self.op_dca(bus, addr)?,
            Opcode::Dcs => self.op_dcs(bus, addr)?,
            Opcode::Ts => self.op_ts(bus, addr)?,
            Opcode::Xch => self.op_xch(bus, addr)?,
            Opcode::Lxch => self.op_lxch(bus, addr)?,
            Opcode::Qxch => self.op_qxch(bus, addr)?,
            Opcode::Dxch => self.op_dxch(bus, addr)?,

            // ===== Arithmetic =====
            Opcode::Ad => self.op_ad(bus, addr)?,
            Opcode::Su => self.op_su(bus, addr)?,
            Opcode::Ads => self.op_ads(bus, addr)?,
            Opcode::Das => self.op_das(bus, addr)?,
            Opcode::Incr => self.op_incr(bus, addr)?,
            Opcode::Aug => self.op_aug(bus, addr)?,
            Opcode::Dim => self.op_dim(bus, addr)?,
            Opcode::Msu => self.op_msu(bus, addr)?,
            Opcode::Mask => self.op_mask(bus, addr)?,
            Opcode::Mp => self.op_mp(bus, addr)?,
            Opcode::Dv => self.op_dv(bus, addr)?,

            // ===== I/O channels =====
            Opcode::Read => self.op_read(bus, addr)?,
            Opcode::Write => self.op_write(bus, addr)?,
            Opcode::Rand => self.op_rand(bus, addr)?,
            Opcode::Wand => self.op_wand(bus, addr)?,
            Opcode::Ror => self.op_ror(bus, addr)?,
            Opcode::Wor => self.op_wor(bus, addr)?,
            Opcode::Rxor => self.op_rxor(bus, addr)?,
            Opcode::Alt => return Err(Fault::Halt),
        }
        Ok(())
    }

    /// Store through the erasable bus, applying any pending overflow
    /// correction to both the value and A first.
    pub(crate) fn store<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        addr: u16,
        value: u16,
    ) -> Result<(), Fault> {
        let value = self.correct_overflow(bus, value);
        bus.write(addr, value)
    }

    /// Channel counterpart of [`Agc::store`].
    pub(crate) fn store_io<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        addr: u16,
        value: u16,
    ) -> Result<(), Fault> {
        let value = self.correct_overflow(bus, value);
        bus.io_write(addr, value)
    }

    /// Lazy overflow correction: reapply the latched sign to the value and
    /// to A, step both by one unit towards the latched sign, clear overflow.
    fn correct_overflow<B: Bus + ?Sized>(&mut self, bus: &mut B, value: u16) -> u16 {
        if !self.flag(Flag::Overflow) {
            return value;
        }
        let value = (value & 0x7FFF) | self.sign;
        let a = (bus.register(Register::A) & 0x7FFF) | self.sign;
        let (value, a) = if self.sign == 0 {
            (value.wrapping_add(2), a.wrapping_add(2))
        } else {
            (value.wrapping_sub(2), a.wrapping_sub(2))
        };
        bus.set_register(Register::A, a);
        self.set_flag(Flag::Overflow, false);
        value
    }

    /// Per-cycle epilogue: editing register shifts, Z advance and the
    /// restart check.
    fn epilogue<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<(), Fault> {
        let cyr = bus.register(Register::Cyr);
        bus.set_register(Register::Cyr, (cyr >> 1) | ((cyr & 1) << 14));
        let cyl = bus.register(Register::Cyl);
        bus.set_register(Register::Cyl, (cyl << 1) | ((cyl & 0x8000) >> 14));
        let sr = bus.register(Register::Sr);
        bus.set_register(Register::Sr, sr >> 1);
        bus.set_register(Register::Zr, 0);

        let z = bus.register(Register::Z);
        bus.set_register(Register::Z, z.wrapping_add(2));

        if !self.flag(Flag::Mask) && bus.register(Register::Brupt) >> 1 == RESTART_KEY {
            log::debug!("RSET seen in BRUPT, restarting");
            return Err(Fault::Restart);
        }
        Ok(())
    }
}

impl Default for Agc {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu for Agc {
    fn reset(&mut self) {
        *self = Self::new();
    }

    fn signal_interrupt(&mut self, kind: InterruptKind) {
        self.request_interrupt(kind);
    }

    fn cycles(&self) -> u64 {
        self.mct
    }
}

impl CpuStateTrait for Agc {
    type Snapshot = AgcState;

    fn snapshot<B: Bus + ?Sized>(&self, bus: &B) -> AgcState {
        let last = self.last;
        AgcState {
            opcode: last.map(|i| i.op),
            addr: last.map_or(0, |i| i.addr),
            overflow: self.flag(Flag::Overflow),
            extended: self.flag(Flag::Extended),
            index: self.flag(Flag::Index),
            mask: self.flag(Flag::Mask),
            interrupt: self.flag(Flag::Interrupt),
            a: bus.register(Register::A),
            l: bus.register(Register::L),
            q: bus.register(Register::Q),
            z: bus.register(Register::Z),
            bb: bus.register(Register::Bb),
            arupt: bus.register(Register::Arupt),
            lrupt: bus.register(Register::Lrupt),
            qrupt: bus.register(Register::Qrupt),
            zrupt: bus.register(Register::Zrupt),
            bbrupt: bus.register(Register::Bbrupt),
            brupt: bus.register(Register::Brupt),
            mct: self.mct,
        }
    }
}
