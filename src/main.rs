//! Headless front end of the interpreter.
//!
//! Runs a rom for a fixed amount of frames with a constant key mask and prints
//! the last frame to the terminal.
//!
//! ```bash
//! schip8 roms/games.zip --entry PONG --frames 600 --keys 0x0010
//! ```
use std::{path::PathBuf, thread};

use anyhow::Context;
use chip::{
    chip8::MachineState,
    config::{Config, Variant},
    devices::KeyboardCommands,
    resources::{Rom, RomArchives},
    Runner, SharedFrame,
};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Chip8,
    SuperChip,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Chip8 => Variant::Chip8,
            VariantArg::SuperChip => Variant::SuperChip,
        }
    }
}

#[doc(hidden)]
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(help = "Path to the rom file, or to a zip archive when --entry is given")]
    rom: PathBuf,

    #[arg(short, long, help = "Name of the rom inside of the zip archive")]
    entry: Option<String>,

    #[arg(long, value_enum, default_value_t = VariantArg::SuperChip, help = "The emulated machine")]
    variant: VariantArg,

    #[arg(short, long, default_value_t = 600, help = "Amount of frames to run")]
    frames: u64,

    #[arg(short, long, default_value_t = chip::definitions::cpu::STEPS_PER_FRAME, help = "Instructions per frame")]
    steps_per_frame: usize,

    #[arg(long, help = "Seed for the random number generator")]
    seed: Option<u64>,

    #[arg(short, long, value_parser = parse_mask, default_value = "0", help = "Keys held down during every frame, bit i is key i")]
    keys: u16,

    #[arg(long, help = "Step over unknown instructions instead of stopping")]
    skip_unknown: bool,

    #[arg(long, help = "Sleep between frames to run at 60Hz")]
    realtime: bool,
}

fn parse_mask(value: &str) -> Result<u16, std::num::ParseIntError> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    }
}

/// Reports the same keys on every frame.
struct FixedKeys(u16);

impl KeyboardCommands for FixedKeys {
    fn keys(&mut self) -> u16 {
        self.0
    }

    fn exit_requested(&self) -> bool {
        false
    }
}

fn load_rom(args: &Args) -> anyhow::Result<Rom> {
    let rom = match &args.entry {
        Some(entry) => RomArchives::open(&args.rom)?
            .get_file_data(entry)
            .with_context(|| format!("unable to extract '{}'", entry))?,
        None => Rom::from_path(&args.rom)?,
    };
    Ok(rom)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = Config::new()
        .with_variant(args.variant.into())
        .with_steps_per_frame(args.steps_per_frame)
        .skip_unknown_instructions(args.skip_unknown);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let rom = load_rom(&args)?;
    let mut runner = Runner::new(config);
    runner.load_rom(&rom);

    let mut display = SharedFrame::new();
    let frames = display.reader();
    let mut keyboard = FixedKeys(args.keys);

    let mut presented = 0u64;
    for frame in 0..args.frames {
        let state = runner
            .run_frame(&mut display, &mut keyboard)
            .with_context(|| format!("the machine faulted during frame {}", frame))?;

        if frames.take().is_some() {
            presented += 1;
        }

        if state == MachineState::Halted {
            log::info!("the program exited after {} frames", frame + 1);
            break;
        }

        if args.realtime {
            thread::sleep(runner.frame_interval());
        }
    }

    log::info!("{} frames were presented", presented);
    print!("{}", runner.chip().display());

    Ok(())
}
