use std::path::Path;

use {
    super::display::Display,
    crate::{
        config::{Config, Variant},
        definitions::{cpu, display, memory},
        devices::Keyboard,
        opcode::{self, Opcode, Operation, ProgramCounterStep},
        resources::Rom,
        timer::{Timed, Timer},
        OpcodeError, ProcessError, RomError, StackError,
    },
    rand::{rngs::SmallRng, RngCore, SeedableRng},
    tinyvec::ArrayVec,
};

/// The state the machine is in after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    /// Instructions are executed normally.
    Running,
    /// `FX0A` is spinning until a key shows up in the latch.
    AwaitingKey,
    /// `00FD` was executed (or the host asked to stop), no further
    /// instruction will run.
    Halted,
}

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// CHIP-8 / SUPER-CHIP CPU.
pub struct ChipSet {
    /// which instruction set is accepted
    pub(super) variant: Variant,
    /// unknown instructions are stepped over
    pub(super) skip_unknown: bool,
    /// the last fetched opcode, all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x04F` - Built in `4x5` pixel font set (`0-F`)
    /// - `0x050-0x0EF` - Built in `8x10` pixel font set (`0-F`), SUPER-CHIP only
    /// - `0x000-0x1FF` - Reserved for the interpreter
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Box<[u8; memory::SIZE]>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: usize,
    /// The program counter is a CPU register in the computer processor which has the address of the
    /// next instruction to be executed from memory.
    pub(super) program_counter: usize,
    /// The stack is only used to store return addresses when subroutines are called.
    /// (here we are using `16` levels of nesting)
    pub(super) stack: ArrayVec<[usize; cpu::stack::SIZE]>,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    pub(super) sound_timer: Timer,
    /// The framebuffer with its normal and extended mode.
    pub(super) display: Display,
    /// The key latch the host fills once per frame.
    pub(super) keyboard: Keyboard,
    /// SUPER-CHIP user flags, they survive a rom reload.
    pub(super) rpl_flags: [u8; cpu::rpl::SIZE],
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
    /// Where the driver is at.
    pub(super) state: MachineState,
}

impl ChipSet {
    /// will create a new chipset object with no program loaded
    pub fn new(config: &Config) -> Self {
        let rng: Box<dyn RngCore + Send> = match config.seed {
            Some(seed) => Box::new(SmallRng::seed_from_u64(seed)),
            None => Box::new(SmallRng::from_entropy()),
        };
        Self::with_rng(config, rng)
    }

    /// will create a new chipset object that draws its random numbers from `rng`
    pub fn with_rng(config: &Config, rng: Box<dyn RngCore + Send>) -> Self {
        // initialize all the memory with 0
        let mut ram = Box::new([0; memory::SIZE]);

        // load fonts
        ram[display::fontset::LOCATION
            ..(display::fontset::LOCATION + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        if config.variant == Variant::SuperChip {
            ram[display::superfont::LOCATION
                ..(display::superfont::LOCATION + display::superfont::FONTSET.len())]
                .copy_from_slice(&display::superfont::FONTSET);
        }

        Self {
            variant: config.variant,
            skip_unknown: config.skip_unknown_instructions,
            opcode: 0,
            memory: ram,
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: ArrayVec::new(),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            display: Display::new(),
            keyboard: Keyboard::new(),
            rpl_flags: [0; cpu::rpl::SIZE],
            rng,
            state: MachineState::Running,
        }
    }

    /// Will bring the machine back to the state right before a program
    /// is loaded. The fonts and the RPL user flags survive.
    pub fn reset(&mut self) {
        self.memory[cpu::PROGRAM_COUNTER..].iter_mut().for_each(|byte| *byte = 0);
        self.opcode = 0;
        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER;
        self.stack.clear();
        self.delay_timer.set_value(0);
        self.sound_timer.set_value(0);
        self.display.set_extended(false);
        self.display.clear();
        self.display.reset_redraw();
        self.keyboard.clear();
        self.state = MachineState::Running;
    }

    /// Will reset the machine and write the rom behind the reserved area.
    pub fn load_rom(&mut self, rom: &Rom) {
        self.reset();

        // the rom type guarantees the data fits
        let data = rom.get_data();
        self.memory[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + data.len())]
            .copy_from_slice(data);

        log::info!("loaded rom '{}' ({} bytes)", rom.get_name(), data.len());
    }

    /// Will read the rom at `path` and load it. If the rom cannot be read the
    /// machine is left in its reset state and the error is handed back.
    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RomError> {
        self.reset();
        let rom = Rom::from_path(path)?;
        self.load_rom(&rom);
        Ok(())
    }

    /// will get the next opcode from memory
    pub(super) fn set_opcode(&mut self) -> Result<(), OpcodeError> {
        // will build the opcode given from the pointer
        self.opcode = opcode::build_opcode(&self.memory[..], self.program_counter)?;
        Ok(())
    }

    /// will fetch and run the opcode at the program counter
    fn execute_next(&mut self) -> Result<Operation, ProcessError> {
        self.set_opcode()?;
        self.calc(self.opcode)
    }

    /// Will run a single fetch, decode, execute cycle.
    ///
    /// The display changed flag is reset at the start of every step. When an
    /// error is returned the program counter still points at the offending
    /// instruction.
    pub fn step(&mut self) -> Result<MachineState, ProcessError> {
        self.display.reset_redraw();

        if self.state == MachineState::Halted {
            return Ok(self.state);
        }

        let pc = self.program_counter;

        match self.execute_next() {
            Ok(operation) => {
                self.state = match operation {
                    Operation::Wait => MachineState::AwaitingKey,
                    Operation::Exit => MachineState::Halted,
                    Operation::None | Operation::Draw => MachineState::Running,
                };
                Ok(self.state)
            }
            Err(ProcessError::Opcode(OpcodeError::UnknownInstruction(unknown))) if self.skip_unknown => {
                log::warn!("skipping unknown instruction {:#06X} at {:#05X}", unknown, pc);
                self.step_program_counter(ProgramCounterStep::Next);
                Ok(self.state)
            }
            Err(err) => {
                log::error!("execution failed at {:#05X}: {}", pc, err);
                Err(err)
            }
        }
    }

    /// Will count both timers down by one, to be called once per frame.
    pub fn decay_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    /// Will stop the machine, every following step is a no-op.
    pub fn halt(&mut self) {
        self.state = MachineState::Halted;
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Are unknown instructions stepped over.
    pub fn skips_unknown_instructions(&self) -> bool {
        self.skip_unknown
    }

    /// Will replace the key latch, bit `i` is key `i`.
    pub fn set_keys(&mut self, keys: u16) {
        self.keyboard.set_latch(keys);
    }

    /// Will write keyboard data into internal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool]) {
        self.keyboard.set_mult(keys);
    }

    pub fn clear_keys(&mut self) {
        self.keyboard.clear();
    }

    /// Will get the current state of the keyboard
    pub fn get_keys(&self) -> u16 {
        self.keyboard.get_latch()
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    /// Should the host be beeping right now.
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    /// Will return the active frame, `width() * height()` colours
    pub fn get_display(&self) -> &[u32] {
        self.display.frame()
    }

    /// Gives access to the display engine, e.g. to render it as text.
    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn width(&self) -> usize {
        self.display.width()
    }

    pub fn height(&self) -> usize {
        self.display.height()
    }

    pub fn is_extended(&self) -> bool {
        self.display.is_extended()
    }

    /// Has the last step changed the display.
    pub fn redraw(&self) -> bool {
        self.display.redraw()
    }

    pub fn get_registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn get_index_register(&self) -> usize {
        self.index_register
    }

    pub fn get_program_counter(&self) -> usize {
        self.program_counter
    }

    pub fn get_memory(&self) -> &[u8] {
        &self.memory[..]
    }

    pub fn get_rpl_flags(&self) -> &[u8] {
        &self.rpl_flags
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Will push the current pointer to the stack
    pub(super) fn push_stack(&mut self, pointer: usize) -> Result<(), StackError> {
        match self.stack.try_push(pointer) {
            None => Ok(()),
            Some(_) => Err(StackError::Overflow),
        }
    }

    /// Will pop from the stack
    pub(super) fn pop_stack(&mut self) -> Result<usize, StackError> {
        self.stack.pop().ok_or(StackError::Underflow)
    }

    /// Will move the program counter according to the step
    pub(super) fn step_program_counter(&mut self, step: ProgramCounterStep) {
        self.program_counter = step.apply(self.program_counter);
    }
}
