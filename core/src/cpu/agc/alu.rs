use super::word::{
    INT15_MAX, INT15_MIN, INT29_MAX, INT29_MIN, SIGN_BIT, from_signed, from_signed32,
    is_negative, is_zero, to_signed, to_signed32,
};
use super::{Agc, Flag};
use crate::core::{Bus, Fault, Register};

/// CYR, SR, CYL and EDOP: shifting registers that MP and DV refuse.
fn is_editing(addr: u16) -> bool {
    (20..=23).contains(&(addr >> 1))
}

/// Overflow test for `x * y` against the double-precision range, done with
/// divisions so that the product is never formed before it is trusted.
fn product_overflows(x: i32, y: i32) -> bool {
    let low = (y > 0 && x < INT29_MIN / y)
        || (y < -1 && x > INT29_MIN / y)
        || (y == -1 && x == INT29_MIN);
    let high = (y > 0 && x > INT29_MAX / y) || (y < 0 && x < INT29_MAX / y);
    low || high
}

impl Agc {
    fn latch_overflow(&mut self, result: i32) {
        self.set_flag(Flag::Overflow, true);
        self.sign = if result < 0 { SIGN_BIT } else { 0 };
    }

    /// Single-precision add. Sets overflow and latches the result's sign
    /// when the sum leaves the 15-bit range.
    pub(crate) fn add(&mut self, a: u16, b: u16) -> u16 {
        let sum = to_signed(a) as i32 + to_signed(b) as i32;
        if !(INT15_MIN..=INT15_MAX).contains(&sum) {
            self.latch_overflow(sum);
        }
        from_signed(sum as i16)
    }

    /// Single-precision subtract, same overflow rules as [`Agc::add`].
    pub(crate) fn sub(&mut self, a: u16, b: u16) -> u16 {
        let diff = to_signed(a) as i32 - to_signed(b) as i32;
        if !(INT15_MIN..=INT15_MAX).contains(&diff) {
            self.latch_overflow(diff);
        }
        from_signed(diff as i16)
    }

    /// A:L = a * b.
    pub(crate) fn multiply<B: Bus + ?Sized>(&mut self, bus: &mut B, a: u16, b: u16) {
        let x = to_signed(a) as i32;
        let y = to_signed(b) as i32;
        let product = x.wrapping_mul(y);
        if product_overflows(x, y) {
            self.latch_overflow(if (x < 0) != (y < 0) { -1 } else { 1 });
        }
        let (hi, lo) = from_signed32(product);
        bus.set_register(Register::A, hi);
        bus.set_register(Register::L, lo);
    }

    /// A:L = (A:L / divisor) packed with the remainder.
    ///
    /// A zero divisor fails before anything is touched.
    pub(crate) fn divide<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        divisor: u16,
    ) -> Result<(), Fault> {
        let d = to_signed(divisor) as i32;
        if d == 0 {
            return Err(Fault::DivisionByZero);
        }
        self.set_flag(Flag::Overflow, false);

        let n = to_signed32(bus.register(Register::A), bus.register(Register::L));
        if n == INT29_MIN && d == -1 {
            self.latch_overflow(INT29_MAX);
        }
        let quotient = n.wrapping_div(d);
        let remainder = n.wrapping_rem(d) & 0xEFFF;
        let (hi, lo) = from_signed32(quotient.wrapping_shl(14) | remainder);
        bus.set_register(Register::A, hi);
        bus.set_register(Register::L, lo);
        Ok(())
    }

    // AD (AD 0 is DOUBLE)
    pub(crate) fn op_ad<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let a = bus.register(Register::A);
        let operand = if addr == 0 { a } else { bus.read(addr)? };
        let sum = self.add(a, operand);
        bus.set_register(Register::A, sum);
        Ok(())
    }

    pub(crate) fn op_su<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let operand = bus.read(addr)?;
        let diff = self.sub(bus.register(Register::A), operand);
        bus.set_register(Register::A, diff);
        Ok(())
    }

    pub(crate) fn op_ads<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let operand = bus.read(addr)?;
        let sum = self.add(bus.register(Register::A), operand);
        bus.set_register(Register::A, sum);
        self.store(bus, addr, sum)
    }

    /// Double add to storage: the high words first, then the low words.
    pub(crate) fn op_das<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        self.set_flag(Flag::Overflow, false);
        let high = bus.read(addr)?;
        let a = self.add(bus.register(Register::A), high);
        bus.set_register(Register::A, a);
        self.store(bus, addr, a)?;

        let low_addr = addr.wrapping_add(2);
        let low = bus.read(low_addr)?;
        let l = self.add(bus.register(Register::L), low);
        bus.set_register(Register::L, l);
        self.store(bus, low_addr, l)
    }

    pub(crate) fn op_incr<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.read(addr)?;
        let incremented = self.add(value, from_signed(1));
        self.store(bus, addr, incremented)
    }

    /// Increment the magnitude of a memory word.
    pub(crate) fn op_aug<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.read(addr)?;
        let one = from_signed(1);
        let result = if is_negative(value) {
            self.sub(value, one)
        } else {
            self.add(value, one)
        };
        self.store(bus, addr, result)
    }

    /// Diminish the magnitude of a memory word, leaving either zero alone.
    pub(crate) fn op_dim<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let value = bus.read(addr)?;
        if is_zero(value) {
            return Ok(());
        }
        let one = from_signed(1);
        let result = if is_negative(value) {
            self.add(value, one)
        } else {
            self.sub(value, one)
        };
        self.store(bus, addr, result)
    }

    /// Modular subtract: the raw difference of the unsigned fields.
    pub(crate) fn op_msu<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        self.set_flag(Flag::Overflow, false);
        let operand = bus.read(addr)?;
        let a = bus.register(Register::A);
        let diff = ((a >> 1) as i32 - (operand >> 1) as i32) as i16;
        bus.set_register(Register::A, from_signed(diff));
        Ok(())
    }

    pub(crate) fn op_mask<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        let operand = bus.read(addr)?;
        let a = bus.register(Register::A);
        bus.set_register(Register::A, a & operand);
        Ok(())
    }

    // MP (MP 0 is SQUARE)
    pub(crate) fn op_mp<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        if is_editing(addr) {
            return Err(Fault::UsedEditingRegister {
                addr,
                mnemonic: "MP",
            });
        }
        self.set_flag(Flag::Overflow, false);
        let a = bus.register(Register::A);
        let operand = if addr == 0 { a } else { bus.read(addr)? };
        self.multiply(bus, a, operand);
        Ok(())
    }

    pub(crate) fn op_dv<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16) -> Result<(), Fault> {
        if is_editing(addr) {
            return Err(Fault::UsedEditingRegister {
                addr,
                mnemonic: "DV",
            });
        }
        let divisor = bus.read(addr)?;
        self.divide(bus, divisor)
    }
}
