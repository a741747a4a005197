pub mod bus;
pub mod fault;
pub mod machine;

pub use bus::{Bus, Register};
pub use fault::{Fault, Space};
pub use machine::{InputButton, Machine};
