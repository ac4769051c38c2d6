use std::{io, path::PathBuf};

use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    UnknownInstruction(Opcode),
    #[error("Pointer location invalid there can not be an opcode at {pointer}, if data len is {len}")]
    MemoryInvalid { pointer: usize, len: usize },
    #[error("The program tried to write into the reserved area at {address:#05X}.")]
    ReservedWrite { address: usize },
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Overflow,
    #[error("Stack is empty!")]
    Underflow,
}

/// Everything that can go wrong while getting a rom into memory.
#[derive(Error, Debug)]
pub enum RomError {
    #[error("The rom is {len} bytes long, but only {max} bytes fit into memory.")]
    TooLarge { len: usize, max: usize },
    #[error("Unable to read the rom at '{path}'.")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid rom archive '{0}'.")]
    Archive(#[from] zip::result::ZipError),
}
