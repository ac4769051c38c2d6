//! Runtime configuration of the interpreter.
use crate::definitions::cpu;

/// The machine that is emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// The original instruction set with the 64x32 display.
    Chip8,
    /// The high resolution extension with scrolling, 16x16 sprites,
    /// the big font and the RPL user flags.
    SuperChip,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::SuperChip
    }
}

/// Everything the host can tune about a [`ChipSet`](crate::chip8::ChipSet).
///
/// # Example
/// ```rust
/// # use chip::config::{Config, Variant};
/// let config = Config::new()
///     .with_variant(Variant::Chip8)
///     .with_steps_per_frame(10)
///     .with_seed(42);
/// assert_eq!(config.variant, Variant::Chip8);
/// assert_eq!(config.steps_per_frame, 10);
/// assert_eq!(config.seed, Some(42));
/// assert!(!config.skip_unknown_instructions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Which instruction set is accepted.
    pub variant: Variant,
    /// The amount of instructions executed between two timer ticks.
    pub steps_per_frame: usize,
    /// Seed of the random generator used by `CXNN`, `None` seeds from the os.
    pub seed: Option<u64>,
    /// Unknown instructions are logged and stepped over instead of
    /// stopping the machine.
    pub skip_unknown_instructions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            steps_per_frame: cpu::STEPS_PER_FRAME,
            seed: None,
            skip_unknown_instructions: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_steps_per_frame(mut self, steps: usize) -> Self {
        self.steps_per_frame = steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn skip_unknown_instructions(mut self, skip: bool) -> Self {
        self.skip_unknown_instructions = skip;
        self
    }
}
