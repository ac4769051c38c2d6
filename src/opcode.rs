//! Opcode abstractions, functionality and constants.
use std::convert::TryFrom;

use crate::{
    definitions::memory,
    OpcodeError,
};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a single byte
const BYTE_SIZE: u16 = 0x8;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// # use chip::OpcodeError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # let pointer = 3;
/// # let err = OpcodeError::MemoryInvalid {pointer, len: SPLIT_OPCODE.len() };
/// # assert_eq!(
/// #    Err(err),
/// #    build_opcode(&SPLIT_OPCODE, pointer)
/// # );
/// # assert_eq!(
/// #   "Pointer location invalid there can not be an opcode at 3, if data len is 4".to_string(),
/// #   format!("{}", err),
/// # );
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, OpcodeError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(OpcodeError::MemoryInvalid {
            pointer,
            len: data.len(),
        })
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// this is an opcode extractor that will return the
    /// opcode type (the top nibble) of any opcode
    fn t(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `NNN` is an address
    fn nnn(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TTNN`
    /// - `NN` is a constant
    fn nn(&self) -> u8;

    /// this is an opcode extractor for the opcode type `TTTN`
    /// - `N` is a constant nibble
    fn n(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TXNN`
    /// - `X` is a register index
    /// - `NN` is a constant
    fn xnn(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `X` is a register index
    /// - `Y` is a register index
    /// - `N` is a constant nibble or an opcode subtype
    fn xyn(&self) -> (usize, usize, usize);

    /// this is an opcode extractor for the opcode type `TXYT`
    fn xy(&self) -> (usize, usize);

    /// this is an opcode extractor for the opcode type `TXTT`
    fn x(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TTYT`
    fn y(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> usize {
        ((self & OPCODE_MASK_F000) >> (3 * BYTE_SIZE / 2)) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> usize {
        (self & OPCODE_MASK_0FFF) as usize
    }

    fn nn(&self) -> u8 {
        (self & OPCODE_MASK_00FF) as u8
    }

    fn n(&self) -> usize {
        (self & OPCODE_MASK_000F) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
    /// ```
    fn xnn(&self) -> (usize, u8) {
        (self.x(), self.nn())
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, usize) {
        let (x, y) = self.xy();
        (x, y, self.n())
    }

    fn xy(&self) -> (usize, usize) {
        (self.x(), self.y())
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> BYTE_SIZE) as usize
    }

    fn y(&self) -> usize {
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        const NIBBLE: u16 = BYTE_SIZE / 2;
        ((self & MASK) >> NIBBLE) as usize
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the program steps that the chip
/// can take.
pub enum ProgramCounterStep {
    /// Will not change the program counter
    None,
    /// Will increment the program counter by 1 instruction
    Next,
    /// Will increment the program counter by 2 instructions
    Skip,
    /// Will simply move the program counter to the given location,
    /// reduced to the 12 bit address space.
    Jump(usize),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Calculates the program counter that follows `pc`.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(0x202, ProgramCounterStep::Next.apply(0x200));
    /// assert_eq!(0x204, ProgramCounterStep::Skip.apply(0x200));
    /// assert_eq!(0x200, ProgramCounterStep::None.apply(0x200));
    /// assert_eq!(0x234, ProgramCounterStep::Jump(0x1234).apply(0x200));
    /// ```
    #[inline]
    pub fn apply(&self, pc: usize) -> usize {
        let next = match *self {
            ProgramCounterStep::Next => pc + memory::opcodes::SIZE,
            ProgramCounterStep::Skip => pc + 2 * memory::opcodes::SIZE,
            ProgramCounterStep::None => pc,
            ProgramCounterStep::Jump(pointer) => pointer,
        };
        memory::mask(next)
    }
}

/// The side effect an executed instruction has on the outside world.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operation {
    /// Nothing visible happened
    None,
    /// The framebuffer was touched
    Draw,
    /// Waiting for a key press, the instruction will be repeated
    Wait,
    /// The program requested the interpreter to stop
    Exit,
}

/// A fully decoded instruction with its operands.
///
/// The table is the union of CHIP-8 and SUPER-CHIP; [`Instruction::is_extended`]
/// marks the instructions only the latter knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00CN - scroll the display n rows down
    ScrollDown { n: usize },
    /// 00E0 - clear the display
    Clear,
    /// 00EE - return from a subroutine
    Return,
    /// 00FB - scroll the display 4 columns right
    ScrollRight,
    /// 00FC - scroll the display 4 columns left
    ScrollLeft,
    /// 00FD - exit the interpreter
    Exit,
    /// 00FE - disable the extended screen mode
    LowRes,
    /// 00FF - enable the extended screen mode
    HighRes,
    /// 1NNN
    Jump { nnn: usize },
    /// 2NNN
    Call { nnn: usize },
    /// 3XNN
    SkipEqual { x: usize, nn: u8 },
    /// 4XNN
    SkipNotEqual { x: usize, nn: u8 },
    /// 5XY0
    SkipRegistersEqual { x: usize, y: usize },
    /// 6XNN
    Load { x: usize, nn: u8 },
    /// 7XNN
    Add { x: usize, nn: u8 },
    /// 8XYN
    Arithmetic { op: ArithmeticOp, x: usize, y: usize },
    /// 9XY0
    SkipRegistersNotEqual { x: usize, y: usize },
    /// ANNN
    LoadIndex { nnn: usize },
    /// BNNN
    JumpOffset { nnn: usize },
    /// CXNN
    Random { x: usize, nn: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: usize },
    /// EX9E
    SkipKeyPressed { x: usize },
    /// EXA1
    SkipKeyNotPressed { x: usize },
    /// FX07
    GetDelayTimer { x: usize },
    /// FX0A
    AwaitKeyPress { x: usize },
    /// FX15
    SetDelayTimer { x: usize },
    /// FX18
    SetSoundTimer { x: usize },
    /// FX1E
    AddToIndex { x: usize },
    /// FX29
    SetIToSprite { x: usize },
    /// FX30
    SetIToLargeSprite { x: usize },
    /// FX33
    StoreBcd { x: usize },
    /// FX55
    StoreRegisters { x: usize },
    /// FX65
    LoadRegisters { x: usize },
    /// FX75
    StoreFlags { x: usize },
    /// FX85
    LoadFlags { x: usize },
}

/// The register to register operations of the `8XYN` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// 8XY0
    Move,
    /// 8XY1
    Or,
    /// 8XY2
    And,
    /// 8XY3
    Xor,
    /// 8XY4
    Add,
    /// 8XY5
    Sub,
    /// 8XY6
    ShiftRight,
    /// 8XY7
    SubN,
    /// 8XYE
    ShiftLeft,
}

impl TryFrom<usize> for ArithmeticOp {
    type Error = ();

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        let op = match n {
            0x0 => ArithmeticOp::Move,
            0x1 => ArithmeticOp::Or,
            0x2 => ArithmeticOp::And,
            0x3 => ArithmeticOp::Xor,
            0x4 => ArithmeticOp::Add,
            0x5 => ArithmeticOp::Sub,
            0x6 => ArithmeticOp::ShiftRight,
            0x7 => ArithmeticOp::SubN,
            0xE => ArithmeticOp::ShiftLeft,
            _ => return Err(()),
        };
        Ok(op)
    }
}

impl Instruction {
    /// Does only the SUPER-CHIP know this instruction
    ///
    /// # Example
    /// ```rust
    /// # use std::convert::TryFrom;
    /// # use chip::opcode::Instruction;
    /// assert!(Instruction::try_from(0x00FF).unwrap().is_extended());
    /// assert!(!Instruction::try_from(0x00E0).unwrap().is_extended());
    /// ```
    pub fn is_extended(&self) -> bool {
        matches!(
            self,
            Instruction::ScrollDown { .. }
                | Instruction::ScrollRight
                | Instruction::ScrollLeft
                | Instruction::Exit
                | Instruction::LowRes
                | Instruction::HighRes
                | Instruction::SetIToLargeSprite { .. }
                | Instruction::StoreFlags { .. }
                | Instruction::LoadFlags { .. }
        )
    }
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    /// Will decode the opcode.
    ///
    /// # Example
    /// ```rust
    /// # use std::convert::TryFrom;
    /// # use chip::opcode::{Instruction, ArithmeticOp};
    /// # use chip::OpcodeError;
    /// assert_eq!(
    ///     Ok(Instruction::Arithmetic { op: ArithmeticOp::Add, x: 0x1, y: 0x2 }),
    ///     Instruction::try_from(0x8124)
    /// );
    /// assert_eq!(
    ///     Err(OpcodeError::UnknownInstruction(0x8128)),
    ///     Instruction::try_from(0x8128)
    /// );
    /// ```
    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let unknown = || OpcodeError::UnknownInstruction(value);

        let (x, y, n) = value.xyn();
        let nn = value.nn();
        let nnn = value.nnn();

        let instruction = match value.t() {
            0x0 => match value {
                _ if nn & 0xF0 == 0xC0 && x == 0 => Instruction::ScrollDown { n },
                0x00E0 => Instruction::Clear,
                0x00EE => Instruction::Return,
                0x00FB => Instruction::ScrollRight,
                0x00FC => Instruction::ScrollLeft,
                0x00FD => Instruction::Exit,
                0x00FE => Instruction::LowRes,
                0x00FF => Instruction::HighRes,
                _ => return Err(unknown()),
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipEqual { x, nn },
            0x4 => Instruction::SkipNotEqual { x, nn },
            0x5 if n == 0 => Instruction::SkipRegistersEqual { x, y },
            0x6 => Instruction::Load { x, nn },
            0x7 => Instruction::Add { x, nn },
            0x8 => {
                let op = ArithmeticOp::try_from(n).map_err(|_| unknown())?;
                Instruction::Arithmetic { op, x, y }
            }
            0x9 if n == 0 => Instruction::SkipRegistersNotEqual { x, y },
            0xA => Instruction::LoadIndex { nnn },
            0xB => Instruction::JumpOffset { nnn },
            0xC => Instruction::Random { x, nn },
            0xD => Instruction::Draw { x, y, n },
            0xE => match nn {
                0x9E => Instruction::SkipKeyPressed { x },
                0xA1 => Instruction::SkipKeyNotPressed { x },
                _ => return Err(unknown()),
            },
            0xF => match nn {
                0x07 => Instruction::GetDelayTimer { x },
                0x0A => Instruction::AwaitKeyPress { x },
                0x15 => Instruction::SetDelayTimer { x },
                0x18 => Instruction::SetSoundTimer { x },
                0x1E => Instruction::AddToIndex { x },
                0x29 => Instruction::SetIToSprite { x },
                0x30 => Instruction::SetIToLargeSprite { x },
                0x33 => Instruction::StoreBcd { x },
                0x55 => Instruction::StoreRegisters { x },
                0x65 => Instruction::LoadRegisters { x },
                0x75 => Instruction::StoreFlags { x },
                0x85 => Instruction::LoadFlags { x },
                _ => return Err(unknown()),
            },
            _ => return Err(unknown()),
        };

        Ok(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_extraction() {
        let opcode: Opcode = 0xD7A5;
        assert_eq!(0xD, opcode.t());
        assert_eq!(0x7, opcode.x());
        assert_eq!(0xA, opcode.y());
        assert_eq!(0x5, opcode.n());
        assert_eq!(0xA5, opcode.nn());
        assert_eq!(0x7A5, opcode.nnn());
        assert_eq!((0x7, 0xA), opcode.xy());
    }

    #[test]
    fn test_decode_zero_family() {
        let data = [
            (0x00E0, Instruction::Clear),
            (0x00EE, Instruction::Return),
            (0x00C0, Instruction::ScrollDown { n: 0 }),
            (0x00C7, Instruction::ScrollDown { n: 7 }),
            (0x00FB, Instruction::ScrollRight),
            (0x00FC, Instruction::ScrollLeft),
            (0x00FD, Instruction::Exit),
            (0x00FE, Instruction::LowRes),
            (0x00FF, Instruction::HighRes),
        ];
        for (opcode, instruction) in data.iter() {
            assert_eq!(Ok(*instruction), Instruction::try_from(*opcode));
        }

        // machine code routines (0NNN) are not supported
        for opcode in [0x0000, 0x00EA, 0x01C0, 0x0123].iter() {
            assert_eq!(
                Err(OpcodeError::UnknownInstruction(*opcode)),
                Instruction::try_from(*opcode)
            );
        }
    }

    #[test]
    fn test_decode_register_families() {
        assert_eq!(
            Ok(Instruction::SkipRegistersEqual { x: 0x1, y: 0x2 }),
            Instruction::try_from(0x5120)
        );
        assert_eq!(
            Ok(Instruction::SkipRegistersNotEqual { x: 0x1, y: 0x2 }),
            Instruction::try_from(0x9120)
        );
        for n in 1..16 {
            let five = 0x5120 | n;
            let nine = 0x9120 | n;
            assert_eq!(
                Err(OpcodeError::UnknownInstruction(five)),
                Instruction::try_from(five)
            );
            assert_eq!(
                Err(OpcodeError::UnknownInstruction(nine)),
                Instruction::try_from(nine)
            );
        }
    }

    #[test]
    fn test_decode_arithmetic_table() {
        let valid = [0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0xE];
        for n in 0..16u16 {
            let opcode = 0x8AB0 | n;
            let res = Instruction::try_from(opcode);
            if valid.contains(&n) {
                assert!(matches!(
                    res,
                    Ok(Instruction::Arithmetic { x: 0xA, y: 0xB, .. })
                ));
            } else {
                assert_eq!(Err(OpcodeError::UnknownInstruction(opcode)), res);
            }
        }
    }

    #[test]
    fn test_decode_f_family() {
        assert_eq!(
            Ok(Instruction::AwaitKeyPress { x: 0x3 }),
            Instruction::try_from(0xF30A)
        );
        assert_eq!(
            Ok(Instruction::LoadFlags { x: 0x9 }),
            Instruction::try_from(0xF985)
        );
        assert_eq!(
            Err(OpcodeError::UnknownInstruction(0xF045)),
            Instruction::try_from(0xF045)
        );
        assert_eq!(
            Err(OpcodeError::UnknownInstruction(0xE0A2)),
            Instruction::try_from(0xE0A2)
        );
    }

    #[test]
    fn test_extended_marker() {
        let extended = [0x00C1, 0x00FB, 0x00FC, 0x00FD, 0x00FE, 0x00FF, 0xF030, 0xF075, 0xF085];
        for opcode in extended.iter() {
            assert!(Instruction::try_from(*opcode).unwrap().is_extended());
        }
        let basic = [0x00E0, 0x00EE, 0x1200, 0xD120, 0xF029, 0xF055];
        for opcode in basic.iter() {
            assert!(!Instruction::try_from(*opcode).unwrap().is_extended());
        }
    }
}
