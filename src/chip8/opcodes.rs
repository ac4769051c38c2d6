use std::convert::TryFrom;

use crate::{
    config::Variant,
    definitions::{cpu, display, memory},
    opcode::{ArithmeticOp, Instruction, Opcode, Operation, ProgramCounterStep},
    timer::Timed,
    OpcodeError, ProcessError,
};

use super::ChipSet;

/// The largest sprite, `16` rows of `2` bytes.
const MAX_SPRITE: usize = 32;

/// Will make sure none of the `len` bytes starting at `index` lie in the
/// interpreter area, where the fonts live.
fn check_writable(index: usize, len: usize) -> Result<(), OpcodeError> {
    match (0..len)
        .map(|offset| memory::mask(index + offset))
        .find(|&address| address < cpu::PROGRAM_COUNTER)
    {
        Some(address) => Err(OpcodeError::ReservedWrite { address }),
        None => Ok(()),
    }
}

impl ChipSet {
    /// Will decode and execute the given opcode and move the program counter.
    pub(super) fn calc(&mut self, opcode: Opcode) -> Result<Operation, ProcessError> {
        log::trace!("opcode {:#06X} at {:#05X}", opcode, self.program_counter);

        let instruction = Instruction::try_from(opcode)?;
        if self.variant == Variant::Chip8 && instruction.is_extended() {
            return Err(OpcodeError::UnknownInstruction(opcode).into());
        }

        let (step, operation) = match instruction {
            Instruction::ScrollDown { .. }
            | Instruction::Clear
            | Instruction::Return
            | Instruction::ScrollRight
            | Instruction::ScrollLeft
            | Instruction::Exit
            | Instruction::LowRes
            | Instruction::HighRes => self.zero(instruction)?,
            Instruction::Jump { nnn } => (ProgramCounterStep::Jump(nnn), Operation::None),
            Instruction::Call { nnn } => {
                // 2NNN
                // the return address is the instruction after the call
                let ret = ProgramCounterStep::Next.apply(self.program_counter);
                self.push_stack(ret)?;
                log::debug!("call {:#05X}, return to {:#05X}", nnn, ret);
                (ProgramCounterStep::Jump(nnn), Operation::None)
            }
            Instruction::SkipEqual { x, nn } => {
                (ProgramCounterStep::cond(self.registers[x] == nn), Operation::None)
            }
            Instruction::SkipNotEqual { x, nn } => {
                (ProgramCounterStep::cond(self.registers[x] != nn), Operation::None)
            }
            Instruction::SkipRegistersEqual { x, y } => (
                ProgramCounterStep::cond(self.registers[x] == self.registers[y]),
                Operation::None,
            ),
            Instruction::Load { x, nn } => {
                self.registers[x] = nn;
                (ProgramCounterStep::Next, Operation::None)
            }
            Instruction::Add { x, nn } => {
                // carry flag is not changed
                self.registers[x] = self.registers[x].wrapping_add(nn);
                (ProgramCounterStep::Next, Operation::None)
            }
            Instruction::Arithmetic { op, x, y } => {
                self.eight(op, x, y);
                (ProgramCounterStep::Next, Operation::None)
            }
            Instruction::SkipRegistersNotEqual { x, y } => (
                ProgramCounterStep::cond(self.registers[x] != self.registers[y]),
                Operation::None,
            ),
            Instruction::LoadIndex { nnn } => {
                self.index_register = nnn;
                (ProgramCounterStep::Next, Operation::None)
            }
            Instruction::JumpOffset { nnn } => {
                // the step masks the target to the address space
                let v0 = self.registers[0] as usize;
                (ProgramCounterStep::Jump(nnn + v0), Operation::None)
            }
            Instruction::Random { x, nn } => {
                // using a fill bytes call here, as the trait RngCore does not
                // support random u8.
                let mut rand: [u8; 1] = [0];
                self.rng.fill_bytes(&mut rand);
                self.registers[x] = nn & rand[0];
                (ProgramCounterStep::Next, Operation::None)
            }
            Instruction::Draw { x, y, n } => self.d(x, y, n),
            Instruction::SkipKeyPressed { x } => (
                ProgramCounterStep::cond(self.keyboard.is_pressed(self.registers[x])),
                Operation::None,
            ),
            Instruction::SkipKeyNotPressed { x } => (
                ProgramCounterStep::cond(!self.keyboard.is_pressed(self.registers[x])),
                Operation::None,
            ),
            Instruction::GetDelayTimer { .. }
            | Instruction::AwaitKeyPress { .. }
            | Instruction::SetDelayTimer { .. }
            | Instruction::SetSoundTimer { .. }
            | Instruction::AddToIndex { .. }
            | Instruction::SetIToSprite { .. }
            | Instruction::SetIToLargeSprite { .. }
            | Instruction::StoreBcd { .. }
            | Instruction::StoreRegisters { .. }
            | Instruction::LoadRegisters { .. }
            | Instruction::StoreFlags { .. }
            | Instruction::LoadFlags { .. } => self.f(instruction)?,
        };

        self.step_program_counter(step);
        Ok(operation)
    }

    fn zero(
        &mut self,
        instruction: Instruction,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let res = match instruction {
            Instruction::ScrollDown { n } => {
                // 00CN
                self.display.scroll_down(n);
                (ProgramCounterStep::Next, Operation::Draw)
            }
            Instruction::Clear => {
                // 00E0
                self.display.clear();
                (ProgramCounterStep::Next, Operation::Draw)
            }
            Instruction::Return => {
                // 00EE
                // Return from sub routine => pop from stack
                let pc = self.pop_stack()?;
                log::debug!("return to {:#05X}", pc);
                (ProgramCounterStep::Jump(pc), Operation::None)
            }
            Instruction::ScrollRight => {
                // 00FB
                self.display.scroll_right();
                (ProgramCounterStep::Next, Operation::Draw)
            }
            Instruction::ScrollLeft => {
                // 00FC
                self.display.scroll_left();
                (ProgramCounterStep::Next, Operation::Draw)
            }
            Instruction::Exit => {
                // 00FD
                log::debug!("exit requested by the program");
                (ProgramCounterStep::Next, Operation::Exit)
            }
            Instruction::LowRes | Instruction::HighRes => {
                // 00FE / 00FF
                let extended = instruction == Instruction::HighRes;
                log::debug!("extended mode {}", extended);
                self.display.set_extended(extended);
                (ProgramCounterStep::Next, Operation::None)
            }
            _ => return Err(OpcodeError::UnknownInstruction(self.opcode).into()),
        };
        Ok(res)
    }

    fn eight(&mut self, op: ArithmeticOp, x: usize, y: usize) {
        // both operands are read before anything is written, VF goes last
        let vx = self.registers[x];
        let vy = self.registers[y];

        let (res, flag) = match op {
            ArithmeticOp::Move => (vy, None),
            ArithmeticOp::Or => (vx | vy, None),
            ArithmeticOp::And => (vx & vy, None),
            ArithmeticOp::Xor => (vx ^ vy, None),
            ArithmeticOp::Add => {
                // 8XY4
                let carry = vy > u8::MAX - vx;
                (vx.wrapping_add(vy), Some(carry as u8))
            }
            ArithmeticOp::Sub => {
                // 8XY5
                let res = vx.wrapping_sub(vy);
                (res, Some((vy <= res) as u8))
            }
            ArithmeticOp::ShiftRight => (vx >> 1, Some(vx & 1)),
            ArithmeticOp::SubN => {
                // 8XY7
                let res = vy.wrapping_sub(vx);
                (res, Some((vy >= res) as u8))
            }
            ArithmeticOp::ShiftLeft => (vx << 1, Some(vx >> 7)),
        };

        self.registers[x] = res;
        if let Some(flag) = flag {
            self.registers[cpu::register::LAST] = flag;
        }
    }

    fn d(&mut self, x: usize, y: usize, n: usize) -> (ProgramCounterStep, Operation) {
        // DXYN
        // Draws a sprite at coordinate (VX, VY), every row is read bit-coded
        // starting from memory location I; I doesn't change. VF is set if any
        // lit pixel got turned off.
        let coorx = self.registers[x] as usize;
        let coory = self.registers[y] as usize;

        let (len, bytes_per_row) = match n {
            0 if self.display.is_extended() => (MAX_SPRITE, 2),
            // nothing to draw in the normal mode
            0 => {
                self.registers[cpu::register::LAST] = 0;
                return (ProgramCounterStep::Next, Operation::None);
            }
            n => (n, 1),
        };

        let mut sprite = [0u8; MAX_SPRITE];
        for (offset, byte) in sprite[..len].iter_mut().enumerate() {
            *byte = self.memory[memory::mask(self.index_register + offset)];
        }

        let collision = self
            .display
            .draw(coorx, coory, &sprite[..len], bytes_per_row);
        self.registers[cpu::register::LAST] = collision as u8;

        (ProgramCounterStep::Next, Operation::Draw)
    }

    fn f(
        &mut self,
        instruction: Instruction,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let mut op = Operation::None;
        let mut pcs = ProgramCounterStep::Next;

        match instruction {
            Instruction::GetDelayTimer { x } => {
                // FX07
                self.registers[x] = self.get_delay_timer();
            }
            Instruction::AwaitKeyPress { x } => {
                // FX0A
                // don't move the counter until a key shows up in the latch,
                // the instruction is simply executed again on the next step
                match self.keyboard.first_pressed() {
                    Some(key) => self.registers[x] = key,
                    None => {
                        op = Operation::Wait;
                        pcs = ProgramCounterStep::None;
                    }
                }
            }
            Instruction::SetDelayTimer { x } => {
                // FX15
                self.delay_timer.set_value(self.registers[x]);
            }
            Instruction::SetSoundTimer { x } => {
                // FX18
                self.sound_timer.set_value(self.registers[x]);
            }
            Instruction::AddToIndex { x } => {
                // FX1E
                // VF is set to 1 when there is a range overflow (I+VX>0xFFF)
                let sum = self.index_register + self.registers[x] as usize;
                self.registers[cpu::register::LAST] = (sum > memory::ADDRESS_MASK) as u8;
                self.index_register = memory::mask(sum);
            }
            Instruction::SetIToSprite { x } => {
                // FX29
                let glyph = (self.registers[x] & 0xF) as usize;
                self.index_register =
                    display::fontset::LOCATION + display::fontset::GLYPH_SIZE * glyph;
            }
            Instruction::SetIToLargeSprite { x } => {
                // FX30
                let glyph = (self.registers[x] & 0xF) as usize;
                self.index_register =
                    display::superfont::LOCATION + display::superfont::GLYPH_SIZE * glyph;
            }
            Instruction::StoreBcd { x } => {
                // FX33
                let i = self.index_register;
                let r = self.registers[x];
                check_writable(i, 3)?;

                self.memory[memory::mask(i)] = r / 100; // 246u8 / 100 => 2
                self.memory[memory::mask(i + 1)] = r / 10 % 10; // 246u8 / 10 => 24 % 10 => 4
                self.memory[memory::mask(i + 2)] = r % 10; // 246u8 % 10 => 6
            }
            Instruction::StoreRegisters { x } => {
                // FX55
                let index = self.index_register;
                check_writable(index, x + 1)?;
                for (offset, value) in self.registers[..=x].iter().enumerate() {
                    self.memory[memory::mask(index + offset)] = *value;
                }
                self.index_register = memory::mask(index + x + 1);
            }
            Instruction::LoadRegisters { x } => {
                // FX65
                let index = self.index_register;
                for (offset, value) in self.registers[..=x].iter_mut().enumerate() {
                    *value = self.memory[memory::mask(index + offset)];
                }
                self.index_register = memory::mask(index + x + 1);
            }
            Instruction::StoreFlags { x } => {
                // FX75
                let x = x.min(cpu::rpl::LAST);
                self.rpl_flags[..=x].copy_from_slice(&self.registers[..=x]);
            }
            Instruction::LoadFlags { x } => {
                // FX85
                let x = x.min(cpu::rpl::LAST);
                self.registers[..=x].copy_from_slice(&self.rpl_flags[..=x]);
            }
            _ => return Err(OpcodeError::UnknownInstruction(self.opcode).into()),
        }

        Ok((pcs, op))
    }
}
