pub mod core;
pub mod cpu;
pub mod device;
pub mod memory;

pub mod prelude {
    pub use crate::core::machine::{InputButton, Machine};
    pub use crate::core::{Bus, Fault, Register};
    pub use crate::cpu::{Agc, Cpu, CpuStateTrait};
    pub use crate::device::{Dsky, DskyStatus, Key, SharedDsky};
    pub use crate::memory::AgcMemory;
}
