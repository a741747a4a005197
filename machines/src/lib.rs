pub mod agc;
pub mod boot_image;

pub use agc::AgcSystem;
pub use boot_image::{BootImage, RomLoadError};
