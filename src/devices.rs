use crate::definitions::keyboard;

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will display all from the pixels, `pixels` holds `width * height`
    /// colours row after row.
    fn display(&mut self, pixels: &[u32], width: usize, height: usize);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data
pub trait KeyboardCommands {
    /// The keys currently held down, bit `i` stands for key `i`.
    fn keys(&mut self) -> u16;

    /// Has the user asked to stop the emulation.
    fn exit_requested(&self) -> bool;
}

/// Will store the keys the host reported for the current frame.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
///
/// The chip only ever reads the latch, clearing it is up to the host.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyboard {
    latch: u16,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    /// Will replace the latch with the given bitmask.
    pub fn set_latch(&mut self, keys: u16) {
        self.latch = keys;
    }

    /// Will copy the given key states into the latch.
    ///
    /// # Example
    /// ```rust
    /// # use chip::devices::Keyboard;
    /// let mut keys = [false; 16];
    /// keys[0x3] = true;
    /// let mut keyboard = Keyboard::new();
    /// keyboard.set_mult(&keys);
    /// assert_eq!(0b1000, keyboard.get_latch());
    /// ```
    pub fn set_mult(&mut self, keys: &[bool]) {
        assert!(keys.len() == keyboard::SIZE);
        self.latch = keys
            .iter()
            .enumerate()
            .filter(|(_, pressed)| **pressed)
            .fold(0, |latch, (index, _)| latch | 1 << index);
    }

    pub fn clear(&mut self) {
        self.latch = 0;
    }

    pub fn get_latch(&self) -> u16 {
        self.latch
    }

    /// Is the given key pressed, only the low nibble of `key` is used.
    pub fn is_pressed(&self, key: u8) -> bool {
        let key = key as usize % keyboard::SIZE;
        (self.latch >> key) & 1 == 1
    }

    /// The lowest key that is currently pressed.
    pub fn first_pressed(&self) -> Option<u8> {
        if self.latch == 0 {
            None
        } else {
            Some(self.latch.trailing_zeros() as u8)
        }
    }
}
