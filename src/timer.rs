/// Is implemented by anything the host counts down once per frame.
pub trait Timed {
    /// Will create a new timer with the given value.
    fn new(value: u8) -> Self;

    /// Will set the value from which the timer shall count down from.
    fn set_value(&mut self, value: u8);

    /// Will get the value that the counter is currently at.
    fn get_value(&self) -> u8;

    /// Will move the counter one step closer to zero.
    fn tick(&mut self);
}

/// Represents a timer inside of the chip
/// infrastruture, it will count down to
/// zero from what ever number given.
///
/// The chip does not own a clock, the host calls
/// [`tick`](Timed::tick) at the required 60Hz.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    /// will store the value of the timer
    value: u8,
}

impl Timer {
    /// Is the timer still counting down
    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

impl Timed for Timer {
    fn new(value: u8) -> Self {
        Self { value }
    }

    fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    fn get_value(&self) -> u8 {
        self.value
    }

    fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::timer::HERZ;

    #[test]
    fn test_timer() {
        let mut timer = Timer::new(HERZ);
        assert!(timer.is_active());

        for _ in 0..HERZ {
            timer.tick();
        }
        assert_eq!(timer.get_value(), 0);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_timer_never_underflows() {
        let mut timer = Timer::new(1);
        timer.tick();
        timer.tick();
        timer.tick();
        assert_eq!(timer.get_value(), 0);

        timer.set_value(0xFF);
        timer.tick();
        assert_eq!(timer.get_value(), 0xFE);
    }
}
