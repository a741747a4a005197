use crate::core::fault::Fault;

/// Registers that live in the low erasable words.
///
/// The discriminant is the undoubled RAM index, so `Z` and RAM word 5
/// are the same storage.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    A = 0,
    L = 1,
    Q = 2,
    Eb = 3,
    Fb = 4,
    Z = 5,
    Bb = 6,
    Zr = 7,
    Arupt = 10,
    Lrupt = 11,
    Qrupt = 12,
    SampTime = 13,
    Zrupt = 15,
    Bbrupt = 16,
    Brupt = 17,
    Cyr = 20,
    Sr = 21,
    Cyl = 22,
    Edop = 23,
    Time1 = 24,
    Time2 = 25,
    Time3 = 26,
    Time4 = 27,
    Time5 = 30,
    Time6 = 31,
}

impl Register {
    /// RAM index (undoubled).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Operand address as it appears in an instruction word.
    #[inline]
    pub fn addr(self) -> u16 {
        (self as u16) << 1
    }
}

/// Memory interface seen by the AGC.
///
/// Every address is in doubled form (bit 0 is the parity slot) and is
/// halved by the implementation before indexing. Out-of-range accesses
/// return [`Fault::OutOfRange`].
///
/// `read`/`write` resolve banking; `register`/`set_register` touch the
/// register slot directly, without banking or aliasing side effects.
pub trait Bus {
    /// Fetch a word from erasable or fixed memory.
    fn read(&mut self, addr: u16) -> Result<u16, Fault>;

    /// Store a word into erasable memory. Lazy overflow correction has
    /// already been applied by the CPU.
    fn write(&mut self, addr: u16, data: u16) -> Result<(), Fault>;

    /// Read an I/O channel.
    fn io_read(&mut self, addr: u16) -> Result<u16, Fault>;

    /// Write an I/O channel. Display channels are forwarded to the DSKY.
    fn io_write(&mut self, addr: u16, data: u16) -> Result<(), Fault>;

    fn register(&self, reg: Register) -> u16;

    fn set_register(&mut self, reg: Register, value: u16);
}
