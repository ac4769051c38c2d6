/// The definitions

pub mod memory {
    /// The size of the chipset ram
    pub const SIZE: usize = 0x1000; // 4096

    /// Every address the interpreter derives is reduced to 12 bits.
    pub const ADDRESS_MASK: usize = SIZE - 1;

    /// Will reduce the given address to a valid memory index.
    #[inline]
    pub const fn mask(address: usize) -> usize {
        address & ADDRESS_MASK
    }

    /// opcode information
    pub mod opcodes {
        /// The step used for calculating the program counter increments
        pub const SIZE: usize = 2;
    }
}

/// The definitions for the cpu
pub mod cpu {
    /// The starting point for the program
    pub const PROGRAM_COUNTER: usize = 0x0200;
    /// The largest rom that fits behind the reserved area.
    pub const PROGRAM_SIZE: usize = super::memory::SIZE - PROGRAM_COUNTER; // 3584
    /// The amount of instructions executed per timer tick, if not configured otherwise.
    pub const STEPS_PER_FRAME: usize = 5;

    /// The definitions needed for the register
    pub mod register {
        /// The size of the chip set registers
        pub const SIZE: usize = 16;
        /// The last entry of the registers
        pub const LAST: usize = SIZE - 1;
    }

    /// The stack definitions
    pub mod stack {
        /// The count of nesting entries
        pub const SIZE: usize = 16;
    }

    /// SUPER-CHIP RPL user flags
    pub mod rpl {
        /// The amount of persisted bytes
        pub const SIZE: usize = 8;
        /// The largest register index that can be persisted
        pub const LAST: usize = SIZE - 1;
    }
}

/// The timer definitions
pub mod timer {
    /// The amount of hertz the timers are expected to be ticked at by the host
    pub const HERZ: u8 = 60;
    /// The interval between two ticks in milliseconds
    pub const INTERVAL: u64 = 1000 / HERZ as u64;
}

/// The display definitions
pub mod display {
    /// The amount of pixels width in the normal mode
    pub const WIDTH: usize = 64;
    /// The amount of pixels height in the normal mode
    pub const HEIGHT: usize = 32;
    /// The amount of pixels width in the extended mode
    pub const EXTENDED_WIDTH: usize = 128;
    /// The amount of pixels height in the extended mode
    pub const EXTENDED_HEIGHT: usize = 64;
    /// The amount of pixels the backing buffer holds (largest mode)
    pub const RESOLUTION: usize = EXTENDED_WIDTH * EXTENDED_HEIGHT;

    /// Colour of a lit pixel
    pub const PIXEL_ON: u32 = 0xFFFF_FFFF;
    /// Colour of a dark pixel
    pub const PIXEL_OFF: u32 = 0x0000_00FF;

    /// The columns moved by the horizontal scroll opcodes
    pub const SCROLL_STEP: usize = 4;

    /// The fontset information
    pub mod fontset {
        /// Is the location of the beginning to the font in memory
        pub const LOCATION: usize = 0x00;
        /// The bytes used per glyph
        pub const GLYPH_SIZE: usize = 5;
        /// The font set character to be rendered on the screen
        pub const FONTSET: [u8; 80] = [
            0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
            0x20, 0x60, 0x20, 0x20, 0x70, // 1
            0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
            0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
            0x90, 0x90, 0xF0, 0x10, 0x10, // 4
            0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
            0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
            0xF0, 0x10, 0x20, 0x40, 0x40, // 7
            0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
            0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
            0xF0, 0x90, 0xF0, 0x90, 0x90, // A
            0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
            0xF0, 0x80, 0x80, 0x80, 0xF0, // C
            0xE0, 0x90, 0x90, 0x90, 0xE0, // D
            0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
            0xF0, 0x80, 0xF0, 0x80, 0x80, // F
        ];
    }

    /// The 8x10 SUPER-CHIP font, stored right after the small one.
    pub mod superfont {
        /// Is the location of the beginning to the font in memory
        pub const LOCATION: usize = super::fontset::LOCATION + super::fontset::FONTSET.len();
        /// The bytes used per glyph
        pub const GLYPH_SIZE: usize = 10;
        /// The font set character to be rendered on the screen in extended mode
        pub const FONTSET: [u8; 160] = [
            0xFF, 0xFF, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, // 0
            0x18, 0x78, 0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0xFF, 0xFF, // 1
            0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // 2
            0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 3
            0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0x03, 0x03, 0x03, 0x03, // 4
            0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 5
            0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, // 6
            0xFF, 0xFF, 0x03, 0x03, 0x06, 0x0C, 0x18, 0x18, 0x18, 0x18, // 7
            0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, // 8
            0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 9
            0x7E, 0xFF, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xC3, // A
            0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, // B
            0x3C, 0xFF, 0xC3, 0xC0, 0xC0, 0xC0, 0xC0, 0xC3, 0xFF, 0x3C, // C
            0xFC, 0xFE, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFE, 0xFC, // D
            0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // E
            0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xC0, 0xC0, // F
        ];
    }
}

/// The definitions needed for correct keyboard definitions.
pub mod keyboard {
    /// all the different keyboard entries
    pub const SIZE: usize = 16;
}
