use thiserror::Error;

/// Memory space a bus access was aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Space {
    Erasable,
    Fixed,
    Io,
}

impl std::fmt::Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Space::Erasable => f.write_str("erasable"),
            Space::Fixed => f.write_str("fixed"),
            Space::Io => f.write_str("I/O"),
        }
    }
}

/// Everything that can stop the machine mid-cycle.
///
/// Addresses are reported in the doubled (parity-padded) form the
/// instruction stream uses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("I/O channel address {addr:#06x} out of the channel window")]
    InvalidIoAddress { addr: u16 },
    #[error("erasable operand required, got {addr:#06x}")]
    InvalidErasableAddress { addr: u16 },
    #[error("fixed operand required, got {addr:#06x}")]
    InvalidFixedAddress { addr: u16 },
    #[error("division by zero")]
    DivisionByZero,
    #[error("no interrupt vector matches type {int_type}")]
    NoMatchingInterrupt { int_type: u16 },
    #[error("opcode {opcode} not valid in the current instruction space")]
    NoValidOperand { opcode: u16 },
    #[error("editing register {addr:#06x} used as {mnemonic} operand")]
    UsedEditingRegister { addr: u16, mnemonic: &'static str },
    #[error("program halted (ALT)")]
    Halt,
    #[error("{space} access at {addr:#06x} beyond the end of memory")]
    OutOfRange { space: Space, addr: u16 },
    #[error("restart requested")]
    Restart,
}

impl Fault {
    /// True when the run loop should reboot rather than terminate.
    pub fn is_restart(&self) -> bool {
        matches!(self, Fault::Restart)
    }
}
