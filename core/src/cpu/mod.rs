/// Generic CPU interface
pub trait Cpu: CpuStateTrait {
    /// Return to the power-on state. Memory is left alone.
    fn reset(&mut self);

    /// Latch an interrupt request for admission at the end of a cycle.
    fn signal_interrupt(&mut self, kind: agc::InterruptKind);

    /// Machine cycles executed since the last reset.
    fn cycles(&self) -> u64;
}

// Re-export state types
pub mod state;
pub use state::{AgcState, CpuStateTrait};

pub mod agc;
pub use agc::Agc;

