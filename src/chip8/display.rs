//! The framebuffer and every algorithm that writes into it: the xor blit with
//! collision detection, clearing and the SUPER-CHIP scrolls.
use std::fmt;

use crate::definitions::display::{
    EXTENDED_HEIGHT, EXTENDED_WIDTH, HEIGHT, PIXEL_OFF, PIXEL_ON, RESOLUTION, SCROLL_STEP, WIDTH,
};

/// The size of a sprite row segment in pixels
const BYTE: usize = 8;

/// The graphics of the chip are black and white. The backing buffer is always
/// large enough for the extended `128 x 64` mode, the normal `64 x 32` mode
/// uses the first `64 * 32` cells with its own stride.
///
/// Switching modes neither clears nor moves pixels, cells that fall outside
/// the active mode simply keep whatever they held.
pub struct Display {
    pixels: Box<[u32; RESOLUTION]>,
    extended: bool,
    redraw: bool,
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    pub fn new() -> Self {
        Self {
            pixels: Box::new([PIXEL_OFF; RESOLUTION]),
            extended: false,
            redraw: false,
        }
    }

    /// The width of the active mode
    pub fn width(&self) -> usize {
        if self.extended {
            EXTENDED_WIDTH
        } else {
            WIDTH
        }
    }

    /// The height of the active mode
    pub fn height(&self) -> usize {
        if self.extended {
            EXTENDED_HEIGHT
        } else {
            HEIGHT
        }
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// Will switch the addressing mode, the pixels stay untouched.
    pub fn set_extended(&mut self, extended: bool) {
        self.extended = extended;
    }

    /// Has anything been drawn since the last [`reset_redraw`](Display::reset_redraw).
    pub fn redraw(&self) -> bool {
        self.redraw
    }

    pub fn reset_redraw(&mut self) {
        self.redraw = false;
    }

    /// The active frame, `width * height` colours row after row.
    pub fn frame(&self) -> &[u32] {
        &self.pixels[..self.width() * self.height()]
    }

    /// Is the pixel at the given coordinates of the active mode lit.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.pixels[self.index(x, y)] == PIXEL_ON
    }

    /// Will turn off every pixel of the backing buffer.
    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|pixel| *pixel = PIXEL_OFF);
        self.redraw = true;
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width()
    }

    /// Will xor the sprite onto the screen starting at `(x, y)`.
    ///
    /// Every `bytes_per_row` bytes of `sprite` make up one row, each byte
    /// covers 8 pixels with the most significant bit on the left. Coordinates
    /// wrap around both axes of the active mode.
    ///
    /// Returns `true` if any lit pixel got turned off.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8], bytes_per_row: usize) -> bool {
        let (width, height) = (self.width(), self.height());
        let mut collision = false;

        for (row_index, row) in sprite.chunks(bytes_per_row).enumerate() {
            let py = (y + row_index) % height;

            for (segment, byte) in row.iter().enumerate() {
                for bit in 0..BYTE {
                    let mask = 0x80u8 >> bit;
                    if *byte & mask == 0 {
                        continue;
                    }

                    let px = (x + segment * BYTE + bit) % width;
                    let index = px + py * width;

                    if self.pixels[index] == PIXEL_ON {
                        self.pixels[index] = PIXEL_OFF;
                        collision = true;
                    } else {
                        self.pixels[index] = PIXEL_ON;
                    }
                }
            }
        }

        self.redraw = true;
        collision
    }

    /// Will move every row of the active frame `n` rows down, the top rows
    /// are turned off.
    pub fn scroll_down(&mut self, n: usize) {
        let (width, height) = (self.width(), self.height());

        // bottom-up so a row is read before it gets overwritten
        for y in (0..height).rev() {
            for x in 0..width {
                self.pixels[x + y * width] = if y >= n {
                    self.pixels[x + (y - n) * width]
                } else {
                    PIXEL_OFF
                };
            }
        }
        self.redraw = true;
    }

    /// Will move every column of the active frame 4 pixels to the right.
    pub fn scroll_right(&mut self) {
        let (width, height) = (self.width(), self.height());

        for y in 0..height {
            let row = y * width;
            // the leading (right) edge first
            for x in (0..width).rev() {
                self.pixels[row + x] = if x >= SCROLL_STEP {
                    self.pixels[row + x - SCROLL_STEP]
                } else {
                    PIXEL_OFF
                };
            }
        }
        self.redraw = true;
    }

    /// Will move every column of the active frame 4 pixels to the left.
    pub fn scroll_left(&mut self) {
        let (width, height) = (self.width(), self.height());

        for y in 0..height {
            let row = y * width;
            // the leading (left) edge first
            for x in 0..width {
                self.pixels[row + x] = if x + SCROLL_STEP < width {
                    self.pixels[row + x + SCROLL_STEP]
                } else {
                    PIXEL_OFF
                };
            }
        }
        self.redraw = true;
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.frame().chunks(self.width()) {
            for &pixel in row {
                let cell = if pixel == PIXEL_ON { '█' } else { ' ' };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(display: &Display) -> usize {
        display.frame().iter().filter(|&&p| p == PIXEL_ON).count()
    }

    #[test]
    fn test_draw_and_collision() {
        let mut display = Display::new();
        assert!(!display.draw(0, 0, &[0b1010_0000], 1));
        assert!(display.is_set(0, 0));
        assert!(!display.is_set(1, 0));
        assert!(display.is_set(2, 0));
        assert!(display.redraw());

        // overlap on (2, 0) only
        assert!(display.draw(2, 0, &[0b1000_0000], 1));
        assert!(!display.is_set(2, 0));
        assert!(display.is_set(0, 0));
    }

    #[test]
    fn test_draw_wraps_both_axes() {
        let mut display = Display::new();
        display.draw(WIDTH - 1, HEIGHT - 1, &[0b1100_0000, 0b1100_0000], 1);

        assert!(display.is_set(WIDTH - 1, HEIGHT - 1));
        assert!(display.is_set(0, HEIGHT - 1));
        assert!(display.is_set(WIDTH - 1, 0));
        assert!(display.is_set(0, 0));
        assert_eq!(4, lit(&display));
    }

    #[test]
    fn test_wide_sprite() {
        let mut display = Display::new();
        display.set_extended(true);
        let sprite = [0xFF, 0xFF, 0x80, 0x01];
        display.draw(10, 5, &sprite, 2);

        for x in 10..26 {
            assert!(display.is_set(x, 5));
        }
        assert!(display.is_set(10, 6));
        assert!(display.is_set(25, 6));
        assert_eq!(18, lit(&display));
    }

    #[test]
    fn test_mode_switch_keeps_pixels() {
        let mut display = Display::new();
        display.set_extended(true);
        display.draw(100, 50, &[0x80], 1);
        assert_eq!(EXTENDED_WIDTH * EXTENDED_HEIGHT, display.frame().len());

        display.set_extended(false);
        assert_eq!(WIDTH * HEIGHT, display.frame().len());
        assert_eq!(0, lit(&display));

        display.set_extended(true);
        assert!(display.is_set(100, 50));
    }

    #[test]
    fn test_clear() {
        let mut display = Display::new();
        display.draw(3, 3, &[0xFF; 4], 1);
        display.reset_redraw();

        display.clear();
        assert_eq!(0, lit(&display));
        assert!(display.redraw());
    }

    #[test]
    fn test_scroll_down() {
        let mut display = Display::new();
        display.draw(0, 0, &[0x80], 1);
        display.draw(5, HEIGHT - 1, &[0x80], 1);

        display.scroll_down(3);
        assert!(display.is_set(0, 3));
        assert!(!display.is_set(0, 0));
        // pushed past the bottom edge
        assert_eq!(1, lit(&display));

        display.scroll_down(0);
        assert!(display.is_set(0, 3));
    }

    #[test]
    fn test_scroll_horizontal() {
        let mut display = Display::new();
        display.set_extended(true);
        display.draw(0, 7, &[0x80], 1);
        display.draw(EXTENDED_WIDTH - 2, 7, &[0x80], 1);

        display.scroll_right();
        assert!(display.is_set(4, 7));
        assert!(!display.is_set(0, 7));
        assert_eq!(1, lit(&display));

        display.scroll_left();
        assert!(display.is_set(0, 7));
        display.scroll_left();
        assert_eq!(0, lit(&display));
    }

    #[test]
    fn test_text_render() {
        let mut display = Display::new();
        display.draw(1, 0, &[0x80], 1);
        let text = display.to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(WIDTH, first.chars().count());
        assert_eq!(Some('█'), first.chars().nth(1));
        assert_eq!(HEIGHT, text.lines().count());
    }
}
