//! A CHIP-8 / SUPER-CHIP interpreter core.
//!
//! The [`chip8::ChipSet`] executes one instruction per [`step`](chip8::ChipSet::step),
//! the [`Runner`] groups the steps into 60Hz frames and talks to the host through
//! the traits in [`devices`].
pub mod chip8;
pub mod config;
pub mod definitions;
pub mod devices;
pub mod opcode;
pub mod resources;
pub mod timer;
mod error;

// reexporting for convinience
mod runner;
pub use error::*;
pub use runner::*;
