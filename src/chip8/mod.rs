//! The full implementation of the CHIP-8 / SUPER-CHIP interpreter, from the opcodes to the
//! framebuffer they draw into.
mod chipset;
mod display;
mod opcodes;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
pub use display::Display;
