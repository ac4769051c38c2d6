use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{
    chip8::{ChipSet, MachineState},
    config::Config,
    definitions::timer,
    devices::{DisplayCommands, KeyboardCommands},
    resources::Rom,
    ProcessError,
};

/// Drives a [`ChipSet`] one frame at a time.
///
/// A frame latches the keys, runs the configured amount of steps, decays the
/// timers once and presents the frame if anything was drawn. The host is
/// expected to call [`run_frame`](Runner::run_frame) every
/// [`frame_interval`](Runner::frame_interval).
pub struct Runner {
    chip: ChipSet,
    config: Config,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self {
            chip: ChipSet::new(&config),
            config,
        }
    }

    /// Will drive the given chipset, e.g. one with an injected random
    /// generator. The config is taken over from the chip.
    pub fn with_chip(chip: ChipSet, steps_per_frame: usize) -> Self {
        let config = Config::new()
            .with_variant(chip.variant())
            .with_steps_per_frame(steps_per_frame)
            .skip_unknown_instructions(chip.skips_unknown_instructions());
        Self { chip, config }
    }

    pub fn load_rom(&mut self, rom: &Rom) {
        self.chip.load_rom(rom);
    }

    /// Will run a single frame.
    ///
    /// Returns the state the machine ended the frame in, or the first fault.
    /// A faulting frame neither ticks the timers nor presents the frame.
    pub fn run_frame<D, K>(
        &mut self,
        display: &mut D,
        keyboard: &mut K,
    ) -> Result<MachineState, ProcessError>
    where
        D: DisplayCommands,
        K: KeyboardCommands,
    {
        if keyboard.exit_requested() {
            log::info!("exit requested by the host");
            self.chip.halt();
            return Ok(MachineState::Halted);
        }

        self.chip.set_keys(keyboard.keys());

        let mut redraw = false;
        let mut state = self.chip.state();
        for _ in 0..self.config.steps_per_frame {
            state = self.chip.step()?;
            redraw |= self.chip.redraw();

            if state == MachineState::Halted {
                break;
            }
        }

        self.chip.decay_timers();
        self.chip.clear_keys();

        if redraw {
            display.display(self.chip.get_display(), self.chip.width(), self.chip.height());
        }

        Ok(state)
    }

    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The time between two frames for the timers to run at 60Hz.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(timer::INTERVAL)
    }
}

/// A presented frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub pixels: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Default)]
struct FrameState {
    frame: Frame,
    pending: bool,
}

/// Hands frames from the emulation thread to a render thread.
///
/// The `SharedFrame` itself is the writing side and is handed to
/// [`Runner::run_frame`], the [`FrameReader`] takes every frame at most once.
#[derive(Debug, Default)]
pub struct SharedFrame {
    state: Arc<Mutex<FrameState>>,
}

impl SharedFrame {
    pub fn new() -> Self {
        Default::default()
    }

    /// Will create the reading side of the hand-off.
    pub fn reader(&self) -> FrameReader {
        FrameReader {
            state: self.state.clone(),
        }
    }
}

impl DisplayCommands for SharedFrame {
    fn display(&mut self, pixels: &[u32], width: usize, height: usize) {
        log::trace!("handing off a {}x{} frame", width, height);

        let mut state = self.state.lock();
        let FrameState { frame, pending } = &mut *state;

        frame.pixels.clear();
        frame.pixels.extend_from_slice(pixels);
        frame.width = width;
        frame.height = height;
        *pending = true;
    }
}

/// The reading side of a [`SharedFrame`].
#[derive(Debug, Clone)]
pub struct FrameReader {
    state: Arc<Mutex<FrameState>>,
}

impl FrameReader {
    /// Will take the latest frame, if one was presented since the last call.
    pub fn take(&self) -> Option<Frame> {
        let mut state = self.state.lock();
        if !state.pending {
            return None;
        }
        state.pending = false;
        Some(state.frame.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Variant,
        definitions::display,
        devices::{MockDisplayCommands, MockKeyboardCommands},
        opcode::Opcode,
    };
    use rand::rngs::mock::StepRng;

    fn runner_with(program: &[Opcode]) -> Runner {
        let mut runner = Runner::new(Config::new().with_seed(1));
        let data: Vec<u8> = program.iter().flat_map(|op| op.to_be_bytes()).collect();
        runner.load_rom(&Rom::new("runner", data).unwrap());
        runner
    }

    fn idle_keyboard() -> MockKeyboardCommands {
        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_exit_requested().return_const(false);
        keyboard.expect_keys().return_const(0u16);
        keyboard
    }

    #[test]
    fn test_steps_per_frame() {
        let mut runner = runner_with(&[0x7001, 0x7001, 0x7001, 0x7001, 0x7001, 0x7001, 0x7001]);
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut keyboard = idle_keyboard();

        assert_eq!(
            Ok(MachineState::Running),
            runner.run_frame(&mut display, &mut keyboard)
        );
        assert_eq!(5, runner.chip().get_registers()[0]);
        assert_eq!(0x20A, runner.chip().get_program_counter());
    }

    #[test]
    fn test_draw_is_presented() {
        // the clear happens on the first step only
        let mut runner = runner_with(&[0x00E0, 0x1202]);
        let mut display = MockDisplayCommands::new();
        display
            .expect_display()
            .withf(|pixels, width, height| {
                pixels.len() == display::WIDTH * display::HEIGHT
                    && *width == display::WIDTH
                    && *height == display::HEIGHT
            })
            .times(1)
            .return_const(());
        let mut keyboard = idle_keyboard();

        runner.run_frame(&mut display, &mut keyboard).unwrap();
    }

    #[test]
    fn test_exit_request() {
        let mut runner = runner_with(&[0x7001]);
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_exit_requested().return_const(true);
        keyboard.expect_keys().times(0);

        assert_eq!(
            Ok(MachineState::Halted),
            runner.run_frame(&mut display, &mut keyboard)
        );
        assert_eq!(0, runner.chip().get_registers()[0]);
        assert_eq!(MachineState::Halted, runner.chip().state());
    }

    #[test]
    fn test_keys_are_latched_per_frame() {
        let mut runner = runner_with(&[0xF00A, 0xF10A, 0x1204]);
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);

        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_exit_requested().return_const(false);
        keyboard.expect_keys().times(1).return_const(0b0100u16);

        // both waits are served by the same latch
        assert_eq!(
            Ok(MachineState::Running),
            runner.run_frame(&mut display, &mut keyboard)
        );
        assert_eq!(&[2, 2], &runner.chip().get_registers()[..2]);
        assert_eq!(0, runner.chip().get_keys());
    }

    #[test]
    fn test_awaiting_key() {
        let mut runner = runner_with(&[0xF00A]);
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut keyboard = idle_keyboard();

        assert_eq!(
            Ok(MachineState::AwaitingKey),
            runner.run_frame(&mut display, &mut keyboard)
        );
        assert_eq!(0x200, runner.chip().get_program_counter());
    }

    #[test]
    fn test_timers_tick_once_per_frame() {
        let mut runner = runner_with(&[0x6005, 0xF015, 0xF018, 0x1206]);
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut keyboard = idle_keyboard();

        runner.run_frame(&mut display, &mut keyboard).unwrap();
        assert_eq!(4, runner.chip().get_delay_timer());
        assert_eq!(4, runner.chip().get_sound_timer());

        runner.run_frame(&mut display, &mut keyboard).unwrap();
        assert_eq!(3, runner.chip().get_delay_timer());
    }

    #[test]
    fn test_halt_stops_the_frame() {
        let mut runner = runner_with(&[0x00FD, 0x7001]);
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut keyboard = idle_keyboard();

        assert_eq!(
            Ok(MachineState::Halted),
            runner.run_frame(&mut display, &mut keyboard)
        );
        assert_eq!(0, runner.chip().get_registers()[0]);
        assert_eq!(
            Ok(MachineState::Halted),
            runner.run_frame(&mut display, &mut keyboard)
        );
    }

    #[test]
    fn test_fault_is_returned() {
        let mut runner = runner_with(&[0x6105, 0xF115, 0x00EE]);
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut keyboard = idle_keyboard();

        assert_eq!(
            Err(ProcessError::Stack(crate::StackError::Underflow)),
            runner.run_frame(&mut display, &mut keyboard)
        );
        // the faulting frame does not tick
        assert_eq!(5, runner.chip().get_delay_timer());
    }

    #[test]
    fn test_with_chip_takes_over_the_chip_settings() {
        let config = Config::new()
            .with_variant(Variant::Chip8)
            .skip_unknown_instructions(true);
        let chip = ChipSet::with_rng(&config, Box::new(StepRng::new(0x3C, 0)));
        let mut runner = Runner::with_chip(chip, 2);

        assert_eq!(Variant::Chip8, runner.config().variant);
        assert_eq!(2, runner.config().steps_per_frame);
        assert!(runner.config().skip_unknown_instructions);

        // 00FF is unknown to CHIP-8 and stepped over, the random byte is injected
        runner.load_rom(&Rom::new("injected", vec![0x00, 0xFF, 0xC2, 0x0F]).unwrap());
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut keyboard = idle_keyboard();

        assert_eq!(
            Ok(MachineState::Running),
            runner.run_frame(&mut display, &mut keyboard)
        );
        assert!(!runner.chip().is_extended());
        assert_eq!(0x0C, runner.chip().get_registers()[0x2]);
    }

    #[test]
    fn test_host_halt_through_chip_mut() {
        let mut runner = runner_with(&[0x7001]);
        runner.chip_mut().halt();
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut keyboard = idle_keyboard();

        assert_eq!(
            Ok(MachineState::Halted),
            runner.run_frame(&mut display, &mut keyboard)
        );
        assert_eq!(0, runner.chip().get_registers()[0]);
    }

    #[test]
    fn test_frame_interval() {
        let runner = Runner::new(Config::new());
        assert_eq!(Duration::from_millis(16), runner.frame_interval());
    }

    #[test]
    fn test_shared_frame_hand_off() {
        let mut runner = runner_with(&[0x6000, 0xA000, 0xD005, 0x1206]);
        let mut writer = SharedFrame::new();
        let reader = writer.reader();
        assert_eq!(None, reader.take());

        let handle = std::thread::spawn(move || {
            let mut keyboard = idle_keyboard();
            runner.run_frame(&mut writer, &mut keyboard).unwrap();
        });
        handle.join().unwrap();

        let frame = reader.take().unwrap();
        assert_eq!((display::WIDTH, display::HEIGHT), (frame.width, frame.height));
        // the glyph `0` is drawn from the font at the top left
        let lit = frame
            .pixels
            .iter()
            .filter(|&&pixel| pixel == display::PIXEL_ON)
            .count();
        assert_eq!(14, lit);
        assert_eq!(display::PIXEL_ON, frame.pixels[0]);

        // every frame is taken at most once
        assert_eq!(None, reader.take());
    }
}
