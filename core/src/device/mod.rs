pub mod dsky;
pub mod keypad;

pub use dsky::{Dsky, DskyStatus, Lamp, SharedDsky};
pub use keypad::Key;
