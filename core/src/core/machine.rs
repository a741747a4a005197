use crate::core::fault::Fault;
use crate::cpu::state::AgcState;
use crate::device::dsky::DskyStatus;

/// Describes a single keypad input that a machine accepts.
pub struct InputButton {
    /// Machine-defined button identifier, passed to `set_input()`.
    pub id: u8,
    /// Human-readable name printed on the key (e.g., "VERB", "ENTR").
    pub name: &'static str,
}

/// Machine-agnostic interface for emulated systems.
///
/// The frontend drives a machine one instruction at a time, paces it
/// against the wall clock and forwards keypad events. It never touches
/// registers or channels directly.
pub trait Machine {
    /// Run one instruction, including the timer, interrupt and epilogue
    /// steps that follow it. Returns the instruction's cost in machine
    /// cycles (MCT).
    fn run_cycle(&mut self) -> Result<u8, Fault>;

    /// Total machine cycles executed since the last boot.
    fn cycles(&self) -> u64;

    /// Current display contents.
    fn status(&self) -> DskyStatus;

    /// Register and flag snapshot for diagnostics.
    fn snapshot(&self) -> AgcState;

    /// Handle an input event. `button` is a machine-defined ID from `input_map()`.
    /// `pressed` is true for key-down, false for key-up.
    ///
    /// Most keys act on key-down only; keys that the hardware samples as a
    /// level (PRO) track both edges.
    fn set_input(&mut self, button: u8, pressed: bool);

    /// Get the list of input buttons this machine accepts.
    fn input_map(&self) -> &[InputButton];

    /// Reboot to the initial power-on state.
    fn reset(&mut self);
}
